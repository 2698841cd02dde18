//! Registry configuration loaded from `.repository/packages.toml`.

use std::path::Path;

use repo_fs::{NormalizedPath, RepoPath, config};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Directory names the repository walk never descends into.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "target",
    "build",
    ".git",
    ".es",
    ".chromium",
    ".repository",
];

/// Directory name prefixes the walk never descends into.
const EXCLUDED_PREFIXES: &[&str] = &["bazel-"];

/// Tunables for package discovery.
///
/// Every field has a default, so the config file is optional and may set
/// only what it needs:
///
/// ```toml
/// manifest_filename = "kibana.jsonc"
/// package_map = ".repository/package-map.json"
/// exclude = ["fixtures"]
/// max_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// File name that marks a package directory.
    pub manifest_filename: String,
    /// Location of the persisted package map, relative to the repository root.
    pub package_map: String,
    /// Extra directory names skipped by the walk, on top of [`DEFAULT_EXCLUDES`].
    pub exclude: Vec<String>,
    /// Maximum directory depth the walk descends to.
    pub max_depth: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            manifest_filename: crate::MANIFEST_FILENAME.to_string(),
            package_map: ".repository/package-map.json".to_string(),
            exclude: Vec::new(),
            max_depth: 32,
        }
    }
}

impl RegistryConfig {
    /// Load `.repository/packages.toml` under `repo_root`, or the defaults if
    /// it does not exist.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = NormalizedPath::new(repo_root).join(RepoPath::PackagesConfig.as_str());
        Ok(config::load_toml_or_default(&path)?)
    }

    /// Absolute location of the package map for `repo_root`.
    pub fn package_map_path(&self, repo_root: &Path) -> NormalizedPath {
        NormalizedPath::new(repo_root).join(&self.package_map)
    }

    /// Whether the walk should skip a directory with this name.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        DEFAULT_EXCLUDES.contains(&name)
            || EXCLUDED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
            || self.exclude.iter().any(|extra| extra == name)
    }
}
