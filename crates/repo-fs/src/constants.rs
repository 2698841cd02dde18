//! Constants and enums for repository filesystem paths.

use std::path::Path;

/// Standard repository filesystem markers and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoPath {
    /// The `.git` directory (Git database)
    GitDir,
    /// The `.repository` directory (tooling configuration and caches)
    RepositoryConfig,
    /// The `packages.toml` file inside `.repository`
    PackagesConfig,
}

impl RepoPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::RepositoryConfig => ".repository",
            Self::PackagesConfig => ".repository/packages.toml",
        }
    }

    /// Markers that identify a repository root, in priority order.
    pub fn root_markers() -> [RepoPath; 2] {
        [Self::RepositoryConfig, Self::GitDir]
    }
}

impl AsRef<Path> for RepoPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
