//! Parameter store abstraction
//!
//! The engine only needs four operations from the remote hierarchical
//! key-value service: a point read, a paginated listing below a path, a write
//! that either creates or overwrites, and a delete. Everything else about the
//! service (transport, credentials, encryption) stays behind this trait.

mod memory;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

/// Result type for store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of a single store call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreError {
    /// Create was called for a name that already exists
    #[error("Parameter already exists: {name}")]
    AlreadyExists { name: String },

    /// Overwrite or delete was called for a name that does not exist
    #[error("Parameter not found: {name}")]
    NotFound { name: String },

    /// Transport or service level failure
    #[error("Store request failed: {message}")]
    Transport { message: String },
}

/// A parameter as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteParameter {
    pub name: String,
    pub value: String,
}

impl RemoteParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub parameters: Vec<RemoteParameter>,
    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

/// Write mode for [`ParameterStore::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Create only; an existing name is [`StoreError::AlreadyExists`]
    Never,
    /// Replace only; a missing name is [`StoreError::NotFound`]
    Always,
}

/// Remote hierarchical key-value service
pub trait ParameterStore: Send + Sync {
    /// Read one parameter; `Ok(None)` when it does not exist
    fn get(&self, name: &str) -> StoreResult<Option<String>>;

    /// Fetch one page of parameters whose names start with `path`.
    ///
    /// With `recursive == false` only direct children of `path` are listed.
    fn list_page(&self, path: &str, recursive: bool, next_token: Option<&str>)
    -> StoreResult<Page>;

    /// Write a parameter
    fn put(&self, name: &str, value: &str, overwrite: Overwrite) -> StoreResult<()>;

    /// Remove a parameter
    fn delete(&self, name: &str) -> StoreResult<()>;
}

/// Lazily iterate every parameter below `path`, following continuation tokens.
pub fn list_by_prefix<'a, S>(store: &'a S, path: &str, recursive: bool) -> Pages<'a, S>
where
    S: ParameterStore + ?Sized,
{
    Pages {
        store,
        path: path.to_string(),
        recursive,
        buffer: VecDeque::new(),
        next_token: None,
        exhausted: false,
    }
}

/// Drain a listing completely.
///
/// The first page error aborts the listing; a partial result is never returned.
pub fn list_all<S>(store: &S, path: &str, recursive: bool) -> StoreResult<Vec<RemoteParameter>>
where
    S: ParameterStore + ?Sized,
{
    list_by_prefix(store, path, recursive).collect()
}

/// Iterator over a paginated listing, see [`list_by_prefix`]
pub struct Pages<'a, S: ?Sized> {
    store: &'a S,
    path: String,
    recursive: bool,
    buffer: VecDeque<RemoteParameter>,
    next_token: Option<String>,
    exhausted: bool,
}

impl<S> Iterator for Pages<'_, S>
where
    S: ParameterStore + ?Sized,
{
    type Item = StoreResult<RemoteParameter>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(parameter) = self.buffer.pop_front() {
                return Some(Ok(parameter));
            }
            if self.exhausted {
                return None;
            }

            match self
                .store
                .list_page(&self.path, self.recursive, self.next_token.as_deref())
            {
                Ok(page) => {
                    tracing::trace!(
                        path = %self.path,
                        count = page.parameters.len(),
                        more = page.next_token.is_some(),
                        "Fetched parameter page"
                    );
                    self.buffer.extend(page.parameters);
                    self.exhausted = page.next_token.is_none();
                    self.next_token = page.next_token;
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
