//! File format detection and handler trait

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::handlers::{PropertiesHandler, YamlHandler};
use crate::value::ValueNode;

/// Supported configuration file shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    /// Indented block format of arbitrary depth (YAML)
    Nested,
    /// One `key = value` line per top-level scalar (`.properties`)
    Flat,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" | "config" => Some(Self::Nested),
            "properties" => Some(Self::Flat),
            _ => None,
        }
    }

    /// Detect format from a file name or path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }

    /// Get default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Nested => &["yaml", "yml", "config"],
            Self::Flat => &["properties"],
        }
    }

    /// Handler that reads and writes this format
    pub fn handler(&self) -> Box<dyn FormatHandler> {
        match self {
            Self::Nested => Box::new(YamlHandler::new()),
            Self::Flat => Box::new(PropertiesHandler::new()),
        }
    }
}

/// Trait for format-specific handlers
pub trait FormatHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> FileFormat;

    /// Parse file contents into a value tree
    fn parse(&self, source: &str) -> Result<ValueNode>;

    /// Serialize a value tree into file contents
    fn render(&self, tree: &ValueNode) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("some_file.yaml").unwrap(), FileFormat::Nested);
        assert_eq!(FileFormat::from_path("dir/app.YML").unwrap(), FileFormat::Nested);
        assert_eq!(FileFormat::from_path("web.config").unwrap(), FileFormat::Nested);
        assert_eq!(
            FileFormat::from_path("some_file.properties").unwrap(),
            FileFormat::Flat
        );
    }

    #[test]
    fn test_from_path_unsupported() {
        assert!(matches!(
            FileFormat::from_path("settings.json"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path("Makefile").is_err());
    }

    #[test]
    fn test_handler_matches_format() {
        for format in [FileFormat::Nested, FileFormat::Flat] {
            assert_eq!(format.handler().format(), format);
        }
    }
}
