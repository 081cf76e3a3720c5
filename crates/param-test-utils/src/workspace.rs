//! [`TestWorkspace`] for configuration files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding configuration files and settings.
///
/// # Example
///
/// ```rust,no_run
/// use param_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let file = ws.write("app.yaml", "a: 1\n");
/// ws.assert_file_contains("app.yaml", "a: 1");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a `settings.toml` with the given prefix and environment.
    pub fn write_settings(&self, prefix: &str, environment: &str) -> PathBuf {
        self.write(
            "settings.toml",
            &format!("prefix = \"{prefix}\"\nenvironment = \"{environment}\"\n"),
        )
    }

    /// Read `relative` back as a string.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {relative} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }
}
