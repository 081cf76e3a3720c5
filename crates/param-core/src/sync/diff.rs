//! Classification of local entries against the store's contents

use std::collections::BTreeMap;

use param_tree::Scalar;
use serde::Serialize;

use crate::Result;
use crate::config::Namespace;
use crate::store::{ParameterStore, RemoteParameter, list_all};

/// How one parameter differs between the local file and the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffEntry {
    /// Only present locally
    Add { value: String },
    /// Present on both sides with different values
    Update { old: String, new: String },
    /// Present on both sides with the same value
    Unchanged { value: String },
    /// Only present in the store
    Orphan { old: String },
}

impl DiffEntry {
    pub fn kind(&self) -> DiffKind {
        match self {
            Self::Add { .. } => DiffKind::Add,
            Self::Update { .. } => DiffKind::Update,
            Self::Unchanged { .. } => DiffKind::Unchanged,
            Self::Orphan { .. } => DiffKind::Orphan,
        }
    }
}

/// Discriminant of [`DiffEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Add,
    Update,
    Unchanged,
    Orphan,
}

/// Number of entries per [`DiffKind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub add: usize,
    pub update: usize,
    pub unchanged: usize,
    pub orphan: usize,
}

/// Every parameter name of a namespace, classified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterDiff {
    entries: BTreeMap<String, DiffEntry>,
}

impl ParameterDiff {
    /// Classify local values against a complete remote snapshot.
    ///
    /// Values are compared by their canonical string form, which is also
    /// what the reconciler writes, so applying a diff and recomputing it
    /// yields only [`DiffEntry::Unchanged`].
    pub fn compute<R>(local: &BTreeMap<String, Scalar>, remote: R) -> Self
    where
        R: IntoIterator<Item = RemoteParameter>,
    {
        let mut remaining: BTreeMap<String, String> = remote
            .into_iter()
            .map(|parameter| (parameter.name, parameter.value))
            .collect();
        let mut entries = BTreeMap::new();

        for (path, value) in local {
            let new = value.to_param_string();
            let entry = match remaining.remove(path) {
                None => DiffEntry::Add { value: new },
                Some(old) if old == new => DiffEntry::Unchanged { value: new },
                Some(old) => DiffEntry::Update { old, new },
            };
            tracing::debug!(%path, kind = ?entry.kind(), "Classified parameter");
            entries.insert(path.clone(), entry);
        }

        for (path, old) in remaining {
            tracing::debug!(%path, kind = ?DiffKind::Orphan, "Classified parameter");
            entries.insert(path, DiffEntry::Orphan { old });
        }

        Self { entries }
    }

    pub fn get(&self, path: &str) -> Option<&DiffEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DiffEntry)> {
        self.entries.iter()
    }

    /// Entries that require a store mutation
    pub fn changes(&self) -> impl Iterator<Item = (&String, &DiffEntry)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind() != DiffKind::Unchanged)
    }

    pub fn by_kind(&self, kind: DiffKind) -> impl Iterator<Item = (&String, &DiffEntry)> {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.kind() == kind)
    }

    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        for entry in self.entries.values() {
            match entry.kind() {
                DiffKind::Add => counts.add += 1,
                DiffKind::Update => counts.update += 1,
                DiffKind::Unchanged => counts.unchanged += 1,
                DiffKind::Orphan => counts.orphan += 1,
            }
        }
        counts
    }

    /// True when applying the diff would not touch the store
    pub fn is_in_sync(&self) -> bool {
        self.changes().next().is_none()
    }
}

/// Computes [`ParameterDiff`]s against a live store
pub struct Differ<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> Differ<'a, S>
where
    S: ParameterStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch every parameter of the namespace, draining all pages
    pub fn fetch(&self, namespace: &Namespace) -> Result<Vec<RemoteParameter>> {
        let remote = list_all(self.store, &namespace.request_path(), true)?;
        tracing::debug!(%namespace, count = remote.len(), "Fetched remote parameters");
        Ok(remote)
    }

    /// Diff local values of a namespace against the store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if any listing page fails; no diff is
    /// computed from a partial snapshot.
    pub fn diff(
        &self,
        namespace: &Namespace,
        local: &BTreeMap<String, Scalar>,
    ) -> Result<ParameterDiff> {
        let remote = self.fetch(namespace)?;
        Ok(ParameterDiff::compute(local, remote))
    }
}
