//! Pre-populated stores.

use param_core::{MemoryStore, Namespace};

/// A store holding `entries` below `namespace`.
///
/// Keys are relative to the namespace, e.g. `("a/b", "1")`.
pub fn seeded_store(namespace: &Namespace, entries: &[(&str, &str)]) -> MemoryStore {
    entries
        .iter()
        .map(|(key, value)| (namespace.param_name(key), *value))
        .collect()
}

/// Same as [`seeded_store`] with a fixed listing page size.
pub fn paged_store(namespace: &Namespace, page_size: usize, entries: &[(&str, &str)]) -> MemoryStore {
    let store = MemoryStore::with_page_size(page_size);
    for (key, value) in entries {
        store.seed(namespace.param_name(key), *value);
    }
    store
}
