//! Run settings and parameter namespaces
//!
//! - [`SyncSettings`]: prefix, environment and concurrency for a run, parsed from TOML
//! - [`Namespace`]: the `/{prefix}/{environment}/{filename}/` scope of one file

mod namespace;
mod settings;

pub use namespace::Namespace;
pub use settings::{DEFAULT_ENVIRONMENT, DEFAULT_PREFIX, SyncSettings};
