//! Shared test utilities for the param-sync workspace.
//!
//! This crate provides standardised fixtures for the test suites of
//! `param-core` and the integration tests. It is a dev-dependency only and is
//! never published.
//!
//! # Modules
//!
//! - [`fixtures`]: sample configuration files and their expected trees
//! - [`store`]: pre-populated [`param_core::MemoryStore`] instances
//! - [`workspace`]: [`TestWorkspace`] for configuration files on disk

pub mod fixtures;
pub mod store;
pub mod workspace;

pub use workspace::TestWorkspace;
