//! Locating manifest files in a repository.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};

/// Walk `repo_root` for manifest files.
///
/// Directories named in the config's exclude list are pruned before they
/// are entered, symlinks are not followed, and the walk stops at
/// `max_depth`. The result is sorted.
pub fn find_manifest_paths(repo_root: &Path, config: &RegistryConfig) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(repo_root)
        .follow_links(false)
        .max_depth(config.max_depth)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !config.is_excluded_dir(&entry.file_name().to_string_lossy())
        });

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| repo_root.to_path_buf()),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == config.manifest_filename.as_str() {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    debug!("found {} manifests under {}", paths.len(), repo_root.display());
    Ok(paths)
}

/// List manifest files tracked by git under `repo_root`.
///
/// Faster than [`find_manifest_paths`] on large trees. Manifests that are
/// staged but missing from the working tree are skipped, as are those under
/// excluded directories.
pub fn find_manifest_paths_from_git(
    repo_root: &Path,
    config: &RegistryConfig,
) -> Result<Vec<PathBuf>> {
    let filename = config.manifest_filename.as_str();
    let tracked = repo_git::list_tracked_files(repo_root, |path| {
        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop() == Some(filename)
            && segments.len() < config.max_depth
            && !segments.iter().any(|s| config.is_excluded_dir(s))
    })?;

    let paths: Vec<PathBuf> = tracked
        .iter()
        .map(|rel| repo_root.join(rel.to_native()))
        .filter(|path| path.is_file())
        .collect();

    debug!(
        "found {} manifests in git index of {}",
        paths.len(),
        repo_root.display()
    );
    Ok(paths)
}
