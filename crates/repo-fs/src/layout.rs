//! Repository root detection

use std::path::Path;

use crate::{Error, NormalizedPath, RepoPath, Result};

/// A detected repository root and the marker that identified it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    /// Canonical root directory
    pub root: NormalizedPath,
    /// Marker found at the root
    pub marker: RepoPath,
}

impl WorkspaceLayout {
    /// Walk upward from `start` until a directory holding a root marker is
    /// found.
    ///
    /// `.repository` wins over `.git` when both exist at the same level, so a
    /// nested checkout with its own tooling config is treated as its own root.
    pub fn detect(start: impl AsRef<Path>) -> Result<Self> {
        let start = start.as_ref();
        let canonical = dunce::canonicalize(start).map_err(|e| Error::io(start, e))?;

        for dir in canonical.ancestors() {
            for marker in RepoPath::root_markers() {
                if dir.join(marker.as_str()).exists() {
                    tracing::debug!("Detected repository root {} via {}", dir.display(), marker);
                    return Ok(Self {
                        root: NormalizedPath::new(dir),
                        marker,
                    });
                }
            }
        }

        Err(Error::LayoutDetectionFailed {
            start: start.to_path_buf(),
        })
    }
}
