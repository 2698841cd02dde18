//! [`TestRepo`] builder for monorepo test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::manifests;

/// Manifest file name written by the helpers.
pub const MANIFEST: &str = "kibana.jsonc";

/// A temporary repository directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use repo_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.add_package("packages/kbn-foo", "@kbn/foo");
/// repo.add_plugin("src/plugins/data", "@kbn/data-plugin", "data", &[]);
/// repo.assert_file_exists("packages/kbn-foo/kibana.jsonc");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
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

    /// Absolute path of `rel` inside the repository.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write raw manifest text into `dir`. Returns the manifest path.
    pub fn write_manifest(&self, dir: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{dir}/{MANIFEST}"), content)
    }

    /// Add a `shared-common` package.
    pub fn add_package(&self, dir: &str, id: &str) -> PathBuf {
        self.write_manifest(dir, &manifests::package_manifest(id, "shared-common"))
    }

    /// Add a plugin package.
    pub fn add_plugin(&self, dir: &str, id: &str, plugin_id: &str, required: &[&str]) -> PathBuf {
        self.write_manifest(dir, &manifests::plugin_manifest(id, plugin_id, required))
    }

    /// Remove a file or directory tree.
    pub fn remove(&self, rel: &str) {
        let path = self.path(rel);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Initialise the directory as a real git repository using `git2`.
    pub fn init_git(&self) -> git2::Repository {
        crate::git::real_git_repo(self.root())
    }

    /// Stage everything in the working tree.
    pub fn stage_all(&self) {
        let repo = git2::Repository::open(self.root())
            .expect("TestRepo::stage_all: not a git repository");
        crate::git::stage_all(&repo);
    }

    /// Read a file relative to the root.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
