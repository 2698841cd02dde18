//! Git access for repo-packages
//!
//! Package discovery can list manifests from the git index instead of
//! walking the working tree, which skips ignored and untracked directories
//! for free.

pub mod error;
pub mod index;

pub use error::{Error, Result};
pub use index::{list_tracked_files, open_repository};
