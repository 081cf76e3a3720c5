//! Flattening of value trees into (path, scalar) entries

use crate::error::Result;
use crate::path::{join_path, validate_path};
use crate::value::{Scalar, ValueNode};

/// Flatten a tree into `(path, scalar)` entries in traversal order.
///
/// Map children extend the path with their key, sequence children with their
/// zero-based index. Absent values produce nothing. Every emitted path is
/// validated; the first invalid one aborts the whole flatten.
///
/// ```
/// use param_tree::{flatten, Scalar, ValueNode};
/// use serde_json::json;
///
/// let tree = ValueNode::from(json!({"a": {"b": 1}, "c": [10, 20]}));
/// let entries = flatten(&tree, "").unwrap();
///
/// assert_eq!(entries, vec![
///     ("a/b".to_string(), Scalar::Integer(1)),
///     ("c/0".to_string(), Scalar::Integer(10)),
///     ("c/1".to_string(), Scalar::Integer(20)),
/// ]);
/// ```
pub fn flatten(tree: &ValueNode, base_path: &str) -> Result<Vec<(String, Scalar)>> {
    let mut entries = Vec::new();
    flatten_into(tree, base_path, &mut entries)?;
    Ok(entries)
}

fn flatten_into(node: &ValueNode, path: &str, entries: &mut Vec<(String, Scalar)>) -> Result<()> {
    match node {
        ValueNode::Absent => {}
        ValueNode::Map(map) => {
            for (key, child) in map.iter() {
                flatten_into(child, &join_path(path, key), entries)?;
            }
        }
        ValueNode::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join_path(path, &index.to_string()), entries)?;
            }
        }
        ValueNode::Scalar(value) => {
            validate_path(path)?;
            entries.push((path.to_string(), value.clone()));
        }
    }
    Ok(())
}
