//! Settings for a reconciliation run

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Namespace;
use crate::{Error, Result};

/// Prefix used when the settings do not name one
pub const DEFAULT_PREFIX: &str = "config/testing";

/// Environment used when the settings do not name one
pub const DEFAULT_ENVIRONMENT: &str = "prod";

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_concurrency() -> usize {
    4
}

/// Settings shared by every file reconciled in a run
///
/// ```
/// use param_core::config::SyncSettings;
///
/// let settings = SyncSettings::parse(r#"
/// prefix = "cfg"
/// concurrency = 8
/// "#).unwrap();
///
/// assert_eq!(settings.prefix, "cfg");
/// assert_eq!(settings.environment, "prod");
/// assert_eq!(settings.concurrency, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Root of the parameter namespace, without leading or trailing slash
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Environment segment of every parameter name
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Upper bound on concurrently applied store mutations
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            environment: default_environment(),
            concurrency: default_concurrency(),
        }
    }
}

impl SyncSettings {
    /// Parse settings from TOML content; missing fields take their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let settings: SyncSettings = toml::from_str(content)?;
        Ok(settings.normalized())
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SettingsNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.normalized()
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self.normalized()
    }

    /// Namespace of a configuration file under these settings
    pub fn namespace(&self, file: impl AsRef<Path>) -> Result<Namespace> {
        Namespace::new(&self.prefix, &self.environment, file)
    }

    fn normalized(mut self) -> Self {
        self.prefix = self.prefix.trim_matches('/').to_string();
        self.concurrency = self.concurrency.max(1);
        self
    }
}
