//! Flat `key = value` properties handler
//!
//! Lines before any `[section]` header and lines inside `[global]` belong to
//! the file; other sections are skipped. Values are kept as strings.

use crate::error::{Error, Result};
use crate::format::{FileFormat, FormatHandler};
use crate::value::{Mapping, ValueNode};

const GLOBAL_SECTION: &str = "global";

/// Handler for `.properties` files
#[derive(Debug, Default)]
pub struct PropertiesHandler;

impl PropertiesHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for PropertiesHandler {
    fn format(&self) -> FileFormat {
        FileFormat::Flat
    }

    fn parse(&self, source: &str) -> Result<ValueNode> {
        let mut mapping = Mapping::new();
        let mut in_global = true;

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| {
                    Error::parse(
                        "properties",
                        format!("line {}: unterminated section header", index + 1),
                    )
                })?;
                in_global = name.trim() == GLOBAL_SECTION;
                continue;
            }

            if !in_global {
                continue;
            }

            let split = line.find(['=', ':']).ok_or_else(|| {
                Error::parse(
                    "properties",
                    format!("line {}: expected `key = value`", index + 1),
                )
            })?;
            let (key, value) = (line[..split].trim(), line[split + 1..].trim());
            if key.is_empty() {
                return Err(Error::parse(
                    "properties",
                    format!("line {}: empty key", index + 1),
                ));
            }

            mapping.insert(key, ValueNode::string(unquote(value)));
        }

        Ok(ValueNode::Map(mapping))
    }

    fn render(&self, tree: &ValueNode) -> Result<String> {
        let map = match tree {
            ValueNode::Map(map) => map,
            ValueNode::Absent => return Ok(String::new()),
            other => {
                return Err(Error::UnsupportedFileShape {
                    key: String::new(),
                    depth: other.depth(),
                });
            }
        };

        let mut out = String::new();
        for (key, value) in map.iter() {
            match value {
                ValueNode::Scalar(scalar) => {
                    out.push_str(&format!("{} = {}\n", key, scalar));
                }
                ValueNode::Absent => {}
                nested => {
                    return Err(Error::UnsupportedFileShape {
                        key: key.clone(),
                        depth: nested.depth(),
                    });
                }
            }
        }
        Ok(out)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
