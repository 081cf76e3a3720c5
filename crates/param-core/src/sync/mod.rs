//! Diffing and reconciliation against the parameter store
//!
//! This module provides:
//! - **diff**: classify every parameter of a namespace as added, updated,
//!   unchanged or orphaned
//! - **reconciler**: apply the mutations a diff calls for
//! - **render**: human-readable previews of a diff
//! - **engine**: the push / restore workflow built on the above

mod diff;
mod engine;
mod reconciler;
mod render;

pub use diff::{DiffCounts, DiffEntry, DiffKind, Differ, ParameterDiff};
pub use engine::SyncEngine;
pub use reconciler::{
    AppliedMutation, MutationAction, MutationFailure, ReconcileOptions, Reconciler, SyncReport,
};
pub use render::{render_push, render_restore};
