//! Package map regeneration
//!
//! The bootstrap step of the monorepo: gather manifest paths, index them and
//! rewrite the package map when anything changed.

use std::path::{Path, PathBuf};

use colored::Colorize;
use repo_packages::{RegistryConfig, discover, update_package_map};

use crate::error::Result;

/// Where the manifest list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Walk the working tree.
    Walk,
    /// Read the git index.
    Git,
    /// Exactly these paths.
    Explicit(Vec<PathBuf>),
}

/// Run the update-map command
///
/// Returns whether the map was rewritten.
pub fn run_update_map(root: &Path, source: ManifestSource) -> Result<bool> {
    let paths = match source {
        ManifestSource::Explicit(paths) => paths,
        ManifestSource::Walk => {
            discover::find_manifest_paths(root, &RegistryConfig::load(root)?)?
        }
        ManifestSource::Git => {
            discover::find_manifest_paths_from_git(root, &RegistryConfig::load(root)?)?
        }
    };
    tracing::debug!("indexing {} manifests", paths.len());

    let updated = update_package_map(root, &paths)?;
    if updated {
        println!("{} updated package map", "✓".green().bold());
    } else {
        println!("{} package map is up to date", "✓".green().bold());
    }
    Ok(updated)
}
