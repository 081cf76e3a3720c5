//! Error types for param-tree

/// Result type for param-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while flattening, reconstructing or (de)serializing trees
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A derived key contains characters the parameter store does not accept
    #[error("{path} contains invalid characters. Valid characters are: {allowed}")]
    InvalidPathSegment { path: String, allowed: &'static str },

    /// A parameter path belongs to a different environment or file than expected
    #[error("{field} mismatch in {path}: expected `{expected}`, found `{actual}`")]
    HeaderMismatch {
        field: &'static str,
        path: String,
        expected: String,
        actual: String,
    },

    /// A nested value was written to a format that only holds top-level scalars
    #[error("Cannot write `{key}` to a flat file: value is nested {depth} level(s) deep")]
    UnsupportedFileShape { key: String, depth: usize },

    /// Two entries disagree on whether a path is a scalar, a map or a sequence
    #[error("Conflicting value shapes at `{path}`")]
    ShapeConflict { path: String },

    #[error("Malformed parameter path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
