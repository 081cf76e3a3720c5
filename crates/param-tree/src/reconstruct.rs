//! Rebuilding value trees from flat parameter entries
//!
//! Entries are placed into one tree in a single pass: each key segment walks
//! to (or creates) the child map entry or sequence slot, and the scalar lands
//! in the final slot. Sequences grow to `max(index) + 1` with `Absent`
//! padding, so the result does not depend on the order in which the store
//! lists its parameters.

use crate::error::{Error, Result};
use crate::path::{PathSegment, split_path};
use crate::value::{Mapping, Scalar, ValueNode};

/// Largest sequence index accepted when rebuilding a tree
pub const MAX_SEQUENCE_INDEX: usize = 65_535;

/// The `{prefix}/{environment}/{filename}` part shared by all parameters of
/// one configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    prefix: Vec<String>,
    environment: String,
    filename: String,
}

impl Header {
    /// Create a header. Leading, trailing and doubled slashes in `prefix` are ignored.
    pub fn new(
        prefix: impl AsRef<str>,
        environment: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            prefix: split_path(prefix.as_ref()).map(str::to_string).collect(),
            environment: environment.into(),
            filename: filename.into(),
        }
    }

    pub fn prefix(&self) -> String {
        self.prefix.join("/")
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path under which all parameters of this file live, with trailing slash
    pub fn request_path(&self) -> String {
        let mut path = String::from("/");
        for segment in &self.prefix {
            path.push_str(segment);
            path.push('/');
        }
        format!("{}{}/{}/", path, self.environment, self.filename)
    }

    /// Full parameter name for a key below this header
    pub fn param_name(&self, key: &str) -> String {
        format!("{}{}", self.request_path(), key)
    }

    /// Strip the header from a parameter name and return the remaining key segments.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedPath`] if the name is outside the prefix, has no
    ///   key, or contains an empty segment (`a//b`, a trailing `/`)
    /// - [`Error::HeaderMismatch`] if the environment or filename segment differs
    pub fn strip<'a>(&self, path: &'a str) -> Result<Vec<&'a str>> {
        let relative = path
            .strip_prefix('/')
            .ok_or_else(|| Error::malformed(path, "parameter names start with `/`"))?;
        if relative.split('/').any(str::is_empty) {
            return Err(Error::malformed(path, "empty path segment"));
        }
        let mut segments = relative.split('/');

        for expected in &self.prefix {
            if segments.next() != Some(expected.as_str()) {
                return Err(Error::malformed(
                    path,
                    format!("not below prefix `/{}`", self.prefix()),
                ));
            }
        }

        check_header_segment(path, "environment", &self.environment, segments.next())?;
        check_header_segment(path, "filename", &self.filename, segments.next())?;

        let tail: Vec<&str> = segments.collect();
        if tail.is_empty() {
            return Err(Error::malformed(path, "no key below the file header"));
        }
        Ok(tail)
    }
}

fn check_header_segment(
    path: &str,
    field: &'static str,
    expected: &str,
    actual: Option<&str>,
) -> Result<()> {
    match actual {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Error::HeaderMismatch {
            field,
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        None => Err(Error::malformed(path, format!("missing {field} segment"))),
    }
}

/// Rebuild the tree for one file scope from its parameters.
///
/// ```
/// use param_tree::{reconstruct, Header, Scalar, ValueNode};
/// use serde_json::json;
///
/// let header = Header::new("cfg", "prod", "app.yaml");
/// let entries = vec![
///     ("/cfg/prod/app.yaml/c/1".to_string(), Scalar::from("20")),
///     ("/cfg/prod/app.yaml/a/b".to_string(), Scalar::from("1")),
///     ("/cfg/prod/app.yaml/c/0".to_string(), Scalar::from("10")),
/// ];
///
/// let tree = reconstruct(entries, &header).unwrap();
/// assert_eq!(tree, ValueNode::from(json!({"a": {"b": "1"}, "c": ["10", "20"]})));
/// ```
pub fn reconstruct<I, K>(entries: I, header: &Header) -> Result<ValueNode>
where
    I: IntoIterator<Item = (K, Scalar)>,
    K: AsRef<str>,
{
    let mut tree = ValueNode::Absent;
    for (path, value) in entries {
        let path = path.as_ref();
        let tail = header.strip(path)?;
        place(&mut tree, path, &tail, value)?;
    }

    Ok(match tree {
        ValueNode::Absent => ValueNode::Map(Mapping::new()),
        tree => tree,
    })
}

/// Walk `tail` from `root`, creating maps and sequence slots as needed, and
/// store the scalar in the final slot.
///
/// A slot that already holds a different shape (or a second scalar) is a
/// [`Error::ShapeConflict`] at that slot's key.
fn place(root: &mut ValueNode, path: &str, tail: &[&str], value: Scalar) -> Result<()> {
    let conflict = |depth: usize| Error::ShapeConflict {
        path: tail[..depth].join("/"),
    };

    let mut node = root;
    for (depth, segment) in tail.iter().enumerate() {
        node = match PathSegment::parse(segment) {
            PathSegment::Index(index) if index > MAX_SEQUENCE_INDEX => {
                return Err(Error::malformed(
                    path,
                    format!("sequence index {index} exceeds {MAX_SEQUENCE_INDEX}"),
                ));
            }
            PathSegment::Index(index) => {
                if node.is_absent() {
                    *node = ValueNode::Sequence(Vec::new());
                }
                match node {
                    ValueNode::Sequence(items) => {
                        if items.len() <= index {
                            items.resize(index + 1, ValueNode::Absent);
                        }
                        &mut items[index]
                    }
                    _ => return Err(conflict(depth)),
                }
            }
            PathSegment::Key(key) => {
                if node.is_absent() {
                    *node = ValueNode::Map(Mapping::new());
                }
                match node {
                    ValueNode::Map(map) => map.get_or_absent(&key),
                    _ => return Err(conflict(depth)),
                }
            }
        };
    }

    if !node.is_absent() {
        return Err(conflict(tail.len()));
    }
    *node = ValueNode::Scalar(value);
    Ok(())
}
