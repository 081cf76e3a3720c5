//! Value tree model
//!
//! A [`ValueNode`] is the parsed form of a configuration file: nested maps and
//! sequences whose leaves are [`Scalar`]s. Maps keep their insertion order so
//! flattening is deterministic, but compare equal regardless of key order.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::path::join_path;

/// A leaf value of a configuration tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Canonical string form of the value.
    ///
    /// The parameter store only holds strings, so this is both what gets
    /// written and what gets compared against the remote value.
    ///
    /// ```
    /// use param_tree::Scalar;
    ///
    /// assert_eq!(Scalar::Integer(45).to_param_string(), "45");
    /// assert_eq!(Scalar::Float(3.14).to_param_string(), "3.14");
    /// assert_eq!(Scalar::Float(2.0).to_param_string(), "2.0");
    /// assert_eq!(Scalar::Bool(true).to_param_string(), "true");
    /// ```
    pub fn to_param_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
                format!("{f:.1}")
            }
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// The same value coerced to a string scalar
    pub fn stringified(&self) -> Self {
        Self::String(self.to_param_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param_string())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Insertion-ordered map with string keys
///
/// Lookups go through a key-to-position index, so building a large map one
/// key at a time stays linear.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, ValueNode)>,
    positions: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        self.positions.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ValueNode> {
        self.positions
            .get(key)
            .map(|&position| &mut self.entries[position].1)
    }

    /// The value for `key`, appending an [`ValueNode::Absent`] slot if missing
    pub fn get_or_absent(&mut self, key: &str) -> &mut ValueNode {
        let position = match self.positions.get(key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push((key.to_string(), ValueNode::Absent));
                self.positions.insert(key.to_string(), position);
                position
            }
        };
        &mut self.entries[position].1
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Insert a value, replacing (in place) any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: ValueNode) -> Option<ValueNode> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ValueNode)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(String, ValueNode)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, ValueNode)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, ValueNode);
    type IntoIter = std::vec::IntoIter<(String, ValueNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A node of a configuration tree
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValueNode {
    Scalar(Scalar),
    Map(Mapping),
    Sequence(Vec<ValueNode>),
    /// A null value; contributes nothing when flattened
    #[default]
    Absent,
}

impl ValueNode {
    /// Shorthand for a string leaf
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Nesting depth: leaves are 0, a map of leaves is 1, and so on.
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Absent => 0,
            Self::Map(map) => 1 + map.iter().map(|(_, v)| v.depth()).max().unwrap_or(0),
            Self::Sequence(items) => 1 + items.iter().map(ValueNode::depth).max().unwrap_or(0),
        }
    }

    /// Copy of the tree with every scalar coerced to its string form.
    ///
    /// This is what a tree looks like after a trip through the parameter store.
    pub fn stringify_leaves(&self) -> Self {
        match self {
            Self::Scalar(s) => Self::Scalar(s.stringified()),
            Self::Map(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.stringify_leaves()))
                    .collect(),
            ),
            Self::Sequence(items) => {
                Self::Sequence(items.iter().map(ValueNode::stringify_leaves).collect())
            }
            Self::Absent => Self::Absent,
        }
    }

    /// Deep merge `other` into this tree.
    ///
    /// - map + map merges key by key, recursing on shared keys
    /// - sequence + sequence merges position by position; the result is as
    ///   long as the longer side
    /// - an absent value yields to the other side
    ///
    /// Any other pairing is a [`Error::ShapeConflict`].
    ///
    /// ```
    /// use param_tree::ValueNode;
    /// use serde_json::json;
    ///
    /// let left = ValueNode::from(json!({"a": {"x": 1}, "list": [null, "b"]}));
    /// let right = ValueNode::from(json!({"a": {"y": 2}, "list": ["a"]}));
    ///
    /// let merged = left.deep_merge(right).unwrap();
    /// assert_eq!(merged, ValueNode::from(json!({"a": {"x": 1, "y": 2}, "list": ["a", "b"]})));
    /// ```
    pub fn deep_merge(self, other: ValueNode) -> Result<ValueNode> {
        merge_at(self, other, "")
    }

    /// Convert to a YAML value for serialization
    pub fn to_yaml(&self) -> YamlValue {
        match self {
            Self::Scalar(Scalar::String(s)) => YamlValue::String(s.clone()),
            Self::Scalar(Scalar::Integer(i)) => YamlValue::Number((*i).into()),
            Self::Scalar(Scalar::Float(f)) => YamlValue::Number((*f).into()),
            Self::Scalar(Scalar::Bool(b)) => YamlValue::Bool(*b),
            Self::Map(map) => {
                let mut mapping = serde_yaml::Mapping::new();
                for (key, value) in map.iter() {
                    mapping.insert(YamlValue::String(key.clone()), value.to_yaml());
                }
                YamlValue::Mapping(mapping)
            }
            Self::Sequence(items) => YamlValue::Sequence(items.iter().map(Self::to_yaml).collect()),
            Self::Absent => YamlValue::Null,
        }
    }

    /// Convert a parsed YAML document into a tree.
    ///
    /// Non-string map keys (numbers, booleans) are converted to their string
    /// form; null, sequence or map keys are rejected.
    pub fn from_yaml(value: &YamlValue) -> Result<Self> {
        Ok(match value {
            YamlValue::Null => Self::Absent,
            YamlValue::Bool(b) => Self::Scalar(Scalar::Bool(*b)),
            YamlValue::Number(n) => Self::Scalar(yaml_number(n)),
            YamlValue::String(s) => Self::string(s.clone()),
            YamlValue::Sequence(items) => Self::Sequence(
                items
                    .iter()
                    .map(Self::from_yaml)
                    .collect::<Result<Vec<_>>>()?,
            ),
            YamlValue::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, child) in map {
                    mapping.insert(yaml_key(key)?, Self::from_yaml(child)?);
                }
                Self::Map(mapping)
            }
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value)?,
        })
    }
}

impl From<Scalar> for ValueNode {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Mapping> for ValueNode {
    fn from(value: Mapping) -> Self {
        Self::Map(value)
    }
}

impl From<JsonValue> for ValueNode {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Absent,
            JsonValue::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => Self::Scalar(match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Scalar::Integer(i),
                (None, Some(f)) if n.is_f64() => Scalar::Float(f),
                _ => Scalar::String(n.to_string()),
            }),
            JsonValue::String(s) => Self::string(s),
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else if n.is_f64() {
        n.as_f64().map(Scalar::Float).unwrap_or_else(|| Scalar::String(n.to_string()))
    } else {
        // u64 beyond i64::MAX keeps its exact digits
        Scalar::String(n.to_string())
    }
}

fn yaml_key(key: &YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(yaml_number(n).to_param_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Tagged(tagged) => yaml_key(&tagged.value),
        other => Err(Error::parse(
            "YAML",
            format!("unsupported mapping key {other:?}"),
        )),
    }
}

fn merge_at(left: ValueNode, right: ValueNode, path: &str) -> Result<ValueNode> {
    match (left, right) {
        (ValueNode::Absent, right) => Ok(right),
        (left, ValueNode::Absent) => Ok(left),
        (ValueNode::Map(mut base), ValueNode::Map(overlay)) => {
            for (key, value) in overlay {
                let child_path = join_path(path, &key);
                match base.get_mut(&key) {
                    Some(slot) => {
                        let existing = std::mem::take(slot);
                        *slot = merge_at(existing, value, &child_path)?;
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Ok(ValueNode::Map(base))
        }
        (ValueNode::Sequence(base), ValueNode::Sequence(overlay)) => {
            let len = base.len().max(overlay.len());
            let mut base = base.into_iter();
            let mut overlay = overlay.into_iter();
            let mut merged = Vec::with_capacity(len);
            for index in 0..len {
                let child_path = join_path(path, &index.to_string());
                let left = base.next().unwrap_or_default();
                let right = overlay.next().unwrap_or_default();
                merged.push(merge_at(left, right, &child_path)?);
            }
            Ok(ValueNode::Sequence(merged))
        }
        _ => Err(Error::ShapeConflict {
            path: path.to_string(),
        }),
    }
}
