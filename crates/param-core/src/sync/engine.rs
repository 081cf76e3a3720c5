//! SyncEngine implementation
//!
//! The SyncEngine wires file loading, diffing, reconciliation and restoring
//! together for one store handle and one set of settings.

use std::fs;
use std::path::Path;

use param_tree::{FileFormat, Scalar, ValueNode, reconstruct};

use super::diff::{Differ, ParameterDiff};
use super::reconciler::{ReconcileOptions, Reconciler, SyncReport};
use crate::Result;
use crate::config::{Namespace, SyncSettings};
use crate::entry::LocalConfig;
use crate::store::{ParameterStore, RemoteParameter};

/// Engine for pushing configuration files to a store and restoring them
///
/// The store handle is owned by the caller and may be shared by any number
/// of engines and runs.
///
/// - **plan**: diff a local file against the store
/// - **push**: apply that diff to the store
/// - **restore**: rebuild a file from the store
pub struct SyncEngine<'a, S: ?Sized> {
    store: &'a S,
    settings: SyncSettings,
}

impl<'a, S> SyncEngine<'a, S>
where
    S: ParameterStore + ?Sized,
{
    pub fn new(store: &'a S, settings: SyncSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Namespace of a configuration file under the engine's settings
    pub fn namespace(&self, file: impl AsRef<Path>) -> Result<Namespace> {
        self.settings.namespace(file)
    }

    /// Read, parse and flatten a configuration file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LocalConfig> {
        LocalConfig::load(path, &self.settings)
    }

    /// Parse configuration contents as if read from `file`
    pub fn parse(&self, file: impl AsRef<Path>, source: &str) -> Result<LocalConfig> {
        LocalConfig::parse(self.namespace(file)?, source)
    }

    /// Diff a local configuration against the store
    pub fn plan(&self, local: &LocalConfig) -> Result<ParameterDiff> {
        Differ::new(self.store).diff(local.namespace(), &local.to_params())
    }

    /// Bring the store in line with a local configuration.
    ///
    /// # Errors
    ///
    /// Only the remote snapshot can fail the call; failed mutations are
    /// reported in [`SyncReport::failures`].
    pub fn push(&self, local: &LocalConfig, dry_run: bool) -> Result<SyncReport> {
        let diff = self.plan(local)?;
        tracing::info!(
            namespace = %local.namespace(),
            counts = ?diff.counts(),
            "Planned push"
        );

        let options = ReconcileOptions {
            dry_run,
            concurrency: self.settings.concurrency,
        };
        Ok(Reconciler::new(self.store, options).apply(&diff))
    }

    /// Every parameter stored for a namespace
    pub fn fetch(&self, namespace: &Namespace) -> Result<Vec<RemoteParameter>> {
        Differ::new(self.store).fetch(namespace)
    }

    /// Rebuild the value tree of a namespace from the store
    pub fn reconstruct(&self, namespace: &Namespace) -> Result<ValueNode> {
        let parameters = self.fetch(namespace)?;
        let tree = reconstruct(
            parameters
                .into_iter()
                .map(|parameter| (parameter.name, Scalar::String(parameter.value))),
            namespace.header(),
        )?;
        Ok(tree)
    }

    /// Rebuild the file contents of a namespace, in the format its file name implies
    pub fn restore(&self, namespace: &Namespace) -> Result<String> {
        let format = FileFormat::from_path(namespace.filename())?;
        let tree = self.reconstruct(namespace)?;
        Ok(format.handler().render(&tree)?)
    }

    /// Restore a namespace and write it to `dest`
    pub fn restore_to(&self, namespace: &Namespace, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        let content = self.restore(namespace)?;

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, content)?;
        tracing::info!(%namespace, file = %dest.display(), "Restored configuration");
        Ok(())
    }
}
