//! Package map freshness check

use std::path::Path;

use colored::Colorize;
use repo_packages::{Registry, RegistryConfig, discover};

use crate::error::{CliError, Result};

/// Run the check command
///
/// Walks the repository, validates every manifest and compares the result
/// with the stored map, hash and entries, without writing anything.
pub fn run_check(root: &Path) -> Result<()> {
    let config = RegistryConfig::load(root)?;
    let manifests = discover::find_manifest_paths(root, &config)?;
    let registry = Registry::from_manifests(root, config, &manifests)?;

    if registry.is_persisted() {
        println!(
            "{} package map is up to date ({} packages)",
            "✓".green().bold(),
            registry.len()
        );
        return Ok(());
    }

    let map_path = registry.config().package_map_path(registry.repo_root());
    if map_path.exists() {
        Err(CliError::user(
            "package map is stale, run `repo-pkgs update-map`",
        ))
    } else {
        Err(CliError::user(
            "package map is missing, run `repo-pkgs update-map`",
        ))
    }
}
