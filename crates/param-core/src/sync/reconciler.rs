//! Applying a diff to the parameter store

use std::sync::{Mutex, PoisonError};
use std::thread;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::diff::{DiffEntry, ParameterDiff};
use crate::store::{Overwrite, ParameterStore, StoreError, StoreResult};

/// Store operation derived from a [`DiffEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    /// Create a missing parameter
    Create,
    /// Replace the value of an existing parameter
    Overwrite,
    /// Remove a parameter that is no longer produced locally
    Delete,
}

/// A mutation that was applied (or, in a dry run, would be applied)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMutation {
    pub path: String,
    pub action: MutationAction,
}

/// A mutation the store rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationFailure {
    pub path: String,
    pub action: MutationAction,
    pub cause: StoreError,
}

impl MutationFailure {
    /// True when the store state changed between diff and apply
    pub fn is_conflict(&self) -> bool {
        matches!(
            (self.action, &self.cause),
            (MutationAction::Create, StoreError::AlreadyExists { .. })
                | (MutationAction::Overwrite | MutationAction::Delete, StoreError::NotFound { .. })
        )
    }
}

/// Report from applying a diff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Identifier of the run, also recorded on its tracing span
    pub run_id: Uuid,
    /// Whether the store was left untouched
    pub dry_run: bool,
    /// Mutations that succeeded, in path order
    pub applied: Vec<AppliedMutation>,
    /// Mutations that failed, in path order
    pub failures: Vec<MutationFailure>,
}

impl SyncReport {
    /// Whether every mutation succeeded
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.applied.len()
    }
}

/// Options for applying a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// If true, list the planned mutations without calling the store
    pub dry_run: bool,
    /// Maximum number of mutations in flight at once
    pub concurrency: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: 4,
        }
    }
}

struct PlannedMutation<'d> {
    path: &'d str,
    action: MutationAction,
    value: &'d str,
}

impl<'d> PlannedMutation<'d> {
    fn from_entry(path: &'d str, entry: &'d DiffEntry) -> Option<Self> {
        let (action, value) = match entry {
            DiffEntry::Add { value } => (MutationAction::Create, value.as_str()),
            DiffEntry::Update { new, .. } => (MutationAction::Overwrite, new.as_str()),
            DiffEntry::Orphan { old } => (MutationAction::Delete, old.as_str()),
            DiffEntry::Unchanged { .. } => return None,
        };
        Some(Self {
            path,
            action,
            value,
        })
    }
}

/// Applies [`ParameterDiff`]s to a store.
///
/// Every mutation is independent: a failure is recorded and the remaining
/// mutations are still attempted. Mutations run on up to
/// [`ReconcileOptions::concurrency`] scoped worker threads.
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
    options: ReconcileOptions,
}

impl<'a, S> Reconciler<'a, S>
where
    S: ParameterStore + ?Sized,
{
    pub fn new(store: &'a S, options: ReconcileOptions) -> Self {
        Self { store, options }
    }

    /// Apply every non-[`DiffEntry::Unchanged`] entry of `diff`
    pub fn apply(&self, diff: &ParameterDiff) -> SyncReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("reconcile", %run_id, dry_run = self.options.dry_run);
        let _guard = span.enter();

        let planned: Vec<PlannedMutation<'_>> = diff
            .changes()
            .filter_map(|(path, entry)| PlannedMutation::from_entry(path, entry))
            .collect();

        if self.options.dry_run {
            let applied = planned
                .iter()
                .map(|m| {
                    tracing::info!(path = m.path, action = ?m.action, "[dry-run] Would apply");
                    AppliedMutation {
                        path: m.path.to_string(),
                        action: m.action,
                    }
                })
                .collect();
            return SyncReport {
                run_id,
                dry_run: true,
                applied,
                failures: Vec::new(),
            };
        }

        let workers = self.options.concurrency.clamp(1, planned.len().max(1));
        let mut outcomes = self.run_workers(planned, workers, &span);
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = SyncReport {
            run_id,
            dry_run: false,
            applied: Vec::new(),
            failures: Vec::new(),
        };
        for (path, action, outcome) in outcomes {
            match outcome {
                Ok(()) => report.applied.push(AppliedMutation { path, action }),
                Err(cause) => {
                    tracing::warn!(%path, ?action, error = %cause, "Mutation failed");
                    report.failures.push(MutationFailure {
                        path,
                        action,
                        cause,
                    });
                }
            }
        }

        tracing::info!(
            applied = report.applied.len(),
            failed = report.failures.len(),
            "Reconciliation finished"
        );
        report
    }

    fn run_workers(
        &self,
        planned: Vec<PlannedMutation<'_>>,
        workers: usize,
        span: &tracing::Span,
    ) -> Vec<(String, MutationAction, StoreResult<()>)> {
        let queue = Mutex::new(planned.into_iter());
        let outcomes = Mutex::new(Vec::new());

        thread::scope(|scope| {
            for _ in 0..workers {
                let span = span.clone();
                let queue = &queue;
                let outcomes = &outcomes;
                scope.spawn(move || {
                    let _guard = span.enter();
                    loop {
                        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                        let Some(mutation) = next else {
                            break;
                        };
                        let outcome = self.execute(&mutation);
                        outcomes
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((mutation.path.to_string(), mutation.action, outcome));
                    }
                });
            }
        });

        outcomes.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute(&self, mutation: &PlannedMutation<'_>) -> StoreResult<()> {
        tracing::debug!(path = mutation.path, action = ?mutation.action, "Applying mutation");
        match mutation.action {
            MutationAction::Create => self.store.put(mutation.path, mutation.value, Overwrite::Never),
            MutationAction::Overwrite => {
                self.store
                    .put(mutation.path, mutation.value, Overwrite::Always)
            }
            MutationAction::Delete => self.store.delete(mutation.path),
        }
    }
}
