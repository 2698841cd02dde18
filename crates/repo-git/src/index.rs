//! Reading tracked paths from the git index.

use std::path::Path;

use git2::{ErrorCode, Repository};
use repo_fs::NormalizedPath;

use crate::{Error, Result};

/// Open the repository whose working tree is rooted at `root`.
///
/// Unlike discovery, this does not search parent directories: `root` must
/// itself hold the `.git` entry.
pub fn open_repository(root: &Path) -> Result<Repository> {
    let repo = Repository::open(root).map_err(|e| match e.code() {
        ErrorCode::NotFound => Error::NotARepository {
            path: root.to_path_buf(),
        },
        _ => Error::Git(e),
    })?;

    if repo.is_bare() {
        return Err(Error::BareRepository {
            path: root.to_path_buf(),
        });
    }
    Ok(repo)
}

/// List paths in the index of the repository at `root` that satisfy `filter`.
///
/// Paths are relative to `root`, use forward slashes, are deduplicated
/// across conflict stages and come back sorted. Staged but deleted files are
/// included; callers that care should check the working tree.
pub fn list_tracked_files<F>(root: &Path, filter: F) -> Result<Vec<NormalizedPath>>
where
    F: Fn(&str) -> bool,
{
    let repo = open_repository(root)?;
    let index = repo.index()?;

    let mut paths: Vec<NormalizedPath> = index
        .iter()
        .filter_map(|entry| {
            let path = String::from_utf8_lossy(&entry.path);
            filter(&path).then(|| NormalizedPath::new(&*path))
        })
        .collect();

    paths.sort();
    paths.dedup();
    tracing::debug!("{} matching paths in git index of {}", paths.len(), root.display());
    Ok(paths)
}
