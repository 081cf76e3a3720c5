//! Push configuration files to a hierarchical parameter store and restore them
//!
//! This crate builds on `param-tree` and implements:
//!
//! - **Settings**: prefix, environment and worker count from a TOML file
//! - **Entries**: a configuration file parsed and flattened into parameters
//! - **Store abstraction**: the four calls needed from the remote service,
//!   paginated listing, and an in-memory implementation
//! - **Differ / Reconciler**: classify and apply changes, with per-path failures
//! - **SyncEngine**: push and restore workflows
//!
//! # Architecture
//!
//! ```text
//!                  embedder
//!                      |
//!                 param-core
//!                      |
//!        +-------------+------------+
//!        |                          |
//!   param-tree                ParameterStore
//!   (codec, formats)          (remote service)
//! ```
//!
//! # Example
//!
//! ```
//! use param_core::{MemoryStore, SyncEngine, SyncSettings};
//!
//! # fn main() -> param_core::Result<()> {
//! let store = MemoryStore::new();
//! let engine = SyncEngine::new(&store, SyncSettings::default().with_prefix("cfg"));
//!
//! let local = engine.parse("app.yaml", "db:\n  port: 5432\n")?;
//! let report = engine.push(&local, false)?;
//! assert!(report.success());
//!
//! let restored = engine.restore(local.namespace())?;
//! assert!(restored.starts_with("db:"));
//! assert!(restored.contains("5432"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod store;
pub mod sync;

pub use config::{DEFAULT_ENVIRONMENT, DEFAULT_PREFIX, Namespace, SyncSettings};
pub use entry::{ConfigEntry, LocalConfig};
pub use error::{Error, Result};
pub use store::{
    MemoryStore, Overwrite, Page, Pages, ParameterStore, RemoteParameter, StoreError,
    StoreResult, list_all, list_by_prefix,
};
pub use sync::{
    AppliedMutation, DiffCounts, DiffEntry, DiffKind, Differ, MutationAction, MutationFailure,
    ParameterDiff, ReconcileOptions, Reconciler, SyncEngine, SyncReport, render_push,
    render_restore,
};
