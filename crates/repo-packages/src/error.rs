//! Error types for repo-packages

use std::path::PathBuf;

/// Result type for repo-packages operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering, indexing or resolving packages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest is missing, malformed, or fails schema validation.
    /// Fatal to the scan that encountered it.
    #[error("invalid package manifest at {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// Two manifests declare the same package id.
    #[error("package id '{id}' is declared by both {first} and {second}")]
    DuplicatePackageId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A lookup referenced an id that is not in the registry.
    #[error("unknown package: {id}")]
    UnknownPackage { id: String },

    /// A plugin-only query was made against a non-plugin package.
    #[error("package '{id}' is not a plugin")]
    NotAPlugin { id: String },

    /// The directory holding a manifest vanished between discovery and load.
    #[error("package directory does not exist: {path}")]
    MissingPackageDir { path: PathBuf },

    /// A plugin selector string could not be parsed.
    #[error("invalid plugin selector '{value}': {reason}")]
    InvalidSelector { value: String, reason: String },

    /// The repository walk hit an unreadable entry.
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Filesystem error from repo-fs
    #[error(transparent)]
    Fs(#[from] repo_fs::Error),

    /// Git error from repo-git
    #[error(transparent)]
    Git(#[from] repo_git::Error),
}

impl Error {
    pub(crate) fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
