//! Flattened configuration entries
//!
//! A [`LocalConfig`] is one configuration file after parsing and flattening:
//! its namespace plus one [`ConfigEntry`] per leaf scalar.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use param_tree::{FileFormat, Header, Scalar, ValueNode, flatten};
use serde::Serialize;

use crate::Result;
use crate::config::{Namespace, SyncSettings};

/// One leaf scalar of a configuration file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigEntry {
    /// Base name of the source file
    pub filename: String,
    pub environment: String,
    /// Slash-delimited key within the file
    pub key: String,
    pub value: Scalar,
}

impl ConfigEntry {
    /// Full parameter name: `/{prefix}/{environment}/{filename}/{key}`
    pub fn param_name(&self, prefix: &str) -> String {
        Header::new(prefix, self.environment.as_str(), self.filename.as_str()).param_name(&self.key)
    }
}

/// A parsed and flattened configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct LocalConfig {
    namespace: Namespace,
    format: FileFormat,
    entries: Vec<ConfigEntry>,
}

impl LocalConfig {
    /// Flatten an already parsed tree into entries for `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`param_tree::Error::InvalidPathSegment`] for the first key
    /// that contains characters the store does not accept.
    pub fn from_tree(namespace: Namespace, format: FileFormat, tree: &ValueNode) -> Result<Self> {
        let entries = flatten(tree, "")?
            .into_iter()
            .map(|(key, value)| ConfigEntry {
                filename: namespace.filename().to_string(),
                environment: namespace.environment().to_string(),
                key,
                value,
            })
            .collect();

        Ok(Self {
            namespace,
            format,
            entries,
        })
    }

    /// Parse file contents; the format is chosen from the namespace's file name
    pub fn parse(namespace: Namespace, source: &str) -> Result<Self> {
        let format = FileFormat::from_path(namespace.filename())?;
        let tree = format.handler().parse(source)?;
        Self::from_tree(namespace, format, &tree)
    }

    /// Read, parse and flatten a configuration file
    pub fn load(path: impl AsRef<Path>, settings: &SyncSettings) -> Result<Self> {
        let path = path.as_ref();
        let namespace = settings.namespace(path)?;
        // Fail on the extension before touching the file
        FileFormat::from_path(path)?;
        let source = fs::read_to_string(path)?;
        let config = Self::parse(namespace, &source)?;
        tracing::debug!(
            file = %path.display(),
            namespace = %config.namespace,
            entries = config.entries.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Entries keyed by full parameter name.
    ///
    /// When two keys collide (a map key containing `/` can shadow a nested
    /// path) the later entry wins.
    pub fn to_params(&self) -> BTreeMap<String, Scalar> {
        let mut params = BTreeMap::new();
        for entry in &self.entries {
            let name = self.namespace.param_name(&entry.key);
            if params.insert(name, entry.value.clone()).is_some() {
                tracing::warn!(key = %entry.key, "Duplicate parameter key; keeping the last value");
            }
        }
        params
    }
}
