//! Namespace of one configuration file in the parameter store

use std::fmt;
use std::path::Path;

use param_tree::Header;
use param_tree::path::{split_path, validate_segment};

use crate::{Error, Result};

/// The `/{prefix}/{environment}/{filename}/` scope holding one file's parameters.
///
/// Only the base name of the file is used, so `conf/app.yaml` and
/// `/etc/app.yaml` share a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    header: Header,
}

impl Namespace {
    /// Create a namespace for a file.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFileName`] if `file` has no file name component
    /// - [`param_tree::Error::InvalidPathSegment`] if a prefix segment, the
    ///   environment or the file name contains characters the store does not
    ///   accept; the environment may not contain `/`
    pub fn new(prefix: &str, environment: &str, file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let filename = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidFileName {
                path: file.to_path_buf(),
            })?;

        for segment in split_path(prefix) {
            validate_segment(segment)?;
        }
        validate_segment(environment)?;
        validate_segment(filename)?;

        Ok(Self {
            header: Header::new(prefix, environment, filename),
        })
    }

    pub fn prefix(&self) -> String {
        self.header.prefix()
    }

    pub fn environment(&self) -> &str {
        self.header.environment()
    }

    pub fn filename(&self) -> &str {
        self.header.filename()
    }

    /// Header used to strip and check parameter names when rebuilding a tree
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Listing path for the namespace, with trailing slash
    pub fn request_path(&self) -> String {
        self.header.request_path()
    }

    /// Full parameter name for a key
    pub fn param_name(&self, key: &str) -> String {
        self.header.param_name(key)
    }

    /// The key part of a parameter name, joined with dots for display
    pub fn display_key(&self, name: &str) -> String {
        match name.strip_prefix(&self.request_path()) {
            Some(tail) => split_path(tail).collect::<Vec<_>>().join("."),
            None => name.to_string(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_strips_directory() {
        let ns = Namespace::new("config/testing", "prod", "some/dir/some_file.yaml").unwrap();
        assert_eq!(ns.filename(), "some_file.yaml");
        assert_eq!(ns.request_path(), "/config/testing/prod/some_file.yaml/");
        assert_eq!(
            ns.param_name("a/b"),
            "/config/testing/prod/some_file.yaml/a/b"
        );
    }

    #[test]
    fn test_namespace_normalizes_prefix_slashes() {
        let ns = Namespace::new("/cfg/", "prod", "app.yaml").unwrap();
        assert_eq!(ns.prefix(), "cfg");
        assert_eq!(ns.to_string(), "/cfg/prod/app.yaml/");
    }

    #[test]
    fn test_namespace_rejects_invalid_segments() {
        assert!(Namespace::new("cfg", "pr od", "app.yaml").is_err());
        assert!(Namespace::new("c!g", "prod", "app.yaml").is_err());
        assert!(matches!(
            Namespace::new("cfg", "prod", "/"),
            Err(Error::InvalidFileName { .. })
        ));
    }

    #[test]
    fn test_display_key() {
        let ns = Namespace::new("cfg", "prod", "app.yaml").unwrap();
        assert_eq!(ns.display_key("/cfg/prod/app.yaml/a/0/b"), "a.0.b");
        assert_eq!(ns.display_key("/elsewhere/x"), "/elsewhere/x");
    }

    #[test]
    fn test_environment_must_be_one_segment() {
        let err = Namespace::new("cfg", "eu/prod", "app.yaml").unwrap_err();
        assert!(matches!(
            err,
            Error::Tree(param_tree::Error::InvalidPathSegment { ref path, .. }) if path == "eu/prod"
        ));
        assert!(Namespace::new("cfg", "", "app.yaml").is_err());
        assert!(Namespace::new("cfg/eu", "prod", "app.yaml").is_ok());
    }
}
