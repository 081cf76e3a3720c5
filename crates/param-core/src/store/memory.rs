//! In-process parameter store

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use super::{Overwrite, Page, ParameterStore, RemoteParameter, StoreError, StoreResult};

/// Default number of parameters per listing page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A [`ParameterStore`] backed by an ordered in-memory map.
///
/// Follows the same create/overwrite rules as a remote service and supports
/// injected failures, which makes it the store used throughout the tests.
#[derive(Debug)]
pub struct MemoryStore {
    parameters: RwLock<BTreeMap<String, String>>,
    failing: RwLock<BTreeSet<String>>,
    page_size: usize,
    mutations: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create an empty store that lists `page_size` parameters per page (at least one)
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            parameters: RwLock::new(BTreeMap::new()),
            failing: RwLock::new(BTreeSet::new()),
            page_size: page_size.max(1),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Insert a parameter directly, bypassing the create/overwrite rules
    pub fn seed(&self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }

    /// Make every call touching `name` fail with [`StoreError::Transport`]
    pub fn fail_on(&self, name: impl Into<String>) {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into());
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful puts and deletes since creation
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self, name: &str) -> StoreResult<()> {
        let failing = self.failing.read().unwrap_or_else(PoisonError::into_inner);
        if failing.contains(name) {
            return Err(StoreError::Transport {
                message: format!("injected failure for {name}"),
            });
        }
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let store = MemoryStore::new();
        for (name, value) in iter {
            store.seed(name, value);
        }
        store
    }
}

impl ParameterStore for MemoryStore {
    fn get(&self, name: &str) -> StoreResult<Option<String>> {
        self.check_failure(name)?;
        Ok(self
            .parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned())
    }

    fn list_page(
        &self,
        path: &str,
        recursive: bool,
        next_token: Option<&str>,
    ) -> StoreResult<Page> {
        self.check_failure(path)?;

        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| StoreError::Transport {
                message: format!("invalid continuation token `{token}`"),
            })?,
            None => 0,
        };

        let parameters = self.parameters.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching = parameters
            .range(path.to_string()..)
            .take_while(|(name, _)| name.starts_with(path))
            .filter(|(name, _)| recursive || !name[path.len()..].contains('/'))
            .skip(offset);

        let page: Vec<RemoteParameter> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(name, value)| RemoteParameter::new(name.clone(), value.clone()))
            .collect();
        let next_token = matching
            .next()
            .map(|_| (offset + page.len()).to_string());

        Ok(Page {
            parameters: page,
            next_token,
        })
    }

    fn put(&self, name: &str, value: &str, overwrite: Overwrite) -> StoreResult<()> {
        self.check_failure(name)?;

        let mut parameters = self.parameters.write().unwrap_or_else(PoisonError::into_inner);
        match (overwrite, parameters.contains_key(name)) {
            (Overwrite::Never, true) => {
                return Err(StoreError::AlreadyExists {
                    name: name.to_string(),
                });
            }
            (Overwrite::Always, false) => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                });
            }
            _ => {}
        }
        parameters.insert(name.to_string(), value.to_string());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.check_failure(name)?;

        let mut parameters = self.parameters.write().unwrap_or_else(PoisonError::into_inner);
        if parameters.remove(name).is_none() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::list_all;

    #[test]
    fn test_put_create_and_overwrite_rules() {
        let store = MemoryStore::new();

        store.put("/a", "1", Overwrite::Never).unwrap();
        assert_eq!(
            store.put("/a", "2", Overwrite::Never),
            Err(StoreError::AlreadyExists { name: "/a".into() })
        );
        store.put("/a", "2", Overwrite::Always).unwrap();
        assert_eq!(
            store.put("/b", "1", Overwrite::Always),
            Err(StoreError::NotFound { name: "/b".into() })
        );

        assert_eq!(store.get("/a").unwrap(), Some("2".to_string()));
        assert_eq!(store.mutation_count(), 2);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("/nope").unwrap(), None);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete("/nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_page_paginates() {
        let store = MemoryStore::with_page_size(2);
        for i in 0..5 {
            store.seed(format!("/p/{i}"), i.to_string());
        }
        store.seed("/other/x", "x");

        let first = store.list_page("/p/", true, None).unwrap();
        assert_eq!(first.parameters.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let all = list_all(&store, "/p/", true).unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|p| p.name.starts_with("/p/")));
    }

    #[test]
    fn test_list_non_recursive_only_direct_children() {
        let store: MemoryStore = [("/p/a", "1"), ("/p/b/c", "2")].into_iter().collect();
        let listed = list_all(&store, "/p/", false).unwrap();
        assert_eq!(listed, vec![RemoteParameter::new("/p/a", "1")]);
    }

    #[test]
    fn test_injected_failure() {
        let store = MemoryStore::new();
        store.fail_on("/broken");
        assert!(matches!(
            store.put("/broken", "1", Overwrite::Never),
            Err(StoreError::Transport { .. })
        ));
        assert!(store.is_empty());
    }
}
