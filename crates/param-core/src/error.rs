//! Error types for param-core

use std::path::PathBuf;

use crate::store::StoreError;

/// Result type for param-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in param-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings file not found at expected path
    #[error("Settings not found at {path}")]
    SettingsNotFound { path: PathBuf },

    /// A configuration path has no usable file name component
    #[error("Invalid configuration file name: {path}")]
    InvalidFileName { path: PathBuf },

    /// A store call failed in a way that prevents the run from starting
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // Transparent wrappers for underlying crate errors
    /// Codec, reconstruction or file format error from param-tree
    #[error(transparent)]
    Tree(#[from] param_tree::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
