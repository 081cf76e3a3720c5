//! YAML format handler using serde_yaml

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::format::{FileFormat, FormatHandler};
use crate::value::ValueNode;

/// Handler for YAML files using serde_yaml
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for YamlHandler {
    fn format(&self) -> FileFormat {
        FileFormat::Nested
    }

    fn parse(&self, source: &str) -> Result<ValueNode> {
        if source.trim().is_empty() {
            return Ok(ValueNode::Absent);
        }
        let value: YamlValue =
            serde_yaml::from_str(source).map_err(|e| Error::parse("YAML", e.to_string()))?;
        ValueNode::from_yaml(&value)
    }

    fn render(&self, tree: &ValueNode) -> Result<String> {
        serde_yaml::to_string(&tree.to_yaml()).map_err(|e| Error::parse("YAML", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use serde_json::json;

    #[test]
    fn test_yaml_parse_scalars() {
        let handler = YamlHandler::new();
        let tree = handler
            .parse("a_number: 45\na_float: 3.14\nflag: true\nname: foo\n")
            .unwrap();
        let map = tree.as_map().unwrap();

        assert_eq!(map.get("a_number"), Some(&ValueNode::Scalar(Scalar::Integer(45))));
        assert_eq!(map.get("a_float"), Some(&ValueNode::Scalar(Scalar::Float(3.14))));
        assert_eq!(map.get("flag"), Some(&ValueNode::Scalar(Scalar::Bool(true))));
        assert_eq!(map.get("name"), Some(&ValueNode::string("foo")));
    }

    #[test]
    fn test_yaml_parse_keeps_document_order() {
        let handler = YamlHandler::new();
        let tree = handler.parse("b: 2\na: 1\nc: 3\n").unwrap();
        let keys: Vec<_> = tree.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_yaml_parse_empty_document() {
        let handler = YamlHandler::new();
        assert_eq!(handler.parse("").unwrap(), ValueNode::Absent);
    }

    #[test]
    fn test_yaml_parse_error() {
        let handler = YamlHandler::new();
        let result = handler.parse("invalid: yaml: content: [unclosed");
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_yaml_render_parses_back() {
        let handler = YamlHandler::new();
        let tree = ValueNode::from(json!({"a": {"b": "1"}, "c": ["10", "20"]}));

        let rendered = handler.render(&tree).unwrap();
        assert_eq!(handler.parse(&rendered).unwrap(), tree);
    }

    #[test]
    fn test_yaml_render_gap_as_null() {
        let handler = YamlHandler::new();
        let tree = ValueNode::Sequence(vec![ValueNode::Absent, ValueNode::string("x")]);
        let rendered = handler.render(&tree).unwrap();
        assert!(rendered.contains("null"), "got: {rendered}");
    }
}
