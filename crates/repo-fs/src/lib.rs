//! Filesystem layer for repo-packages
//!
//! Provides normalized path handling, atomic I/O, checksums and TOML
//! configuration loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use constants::RepoPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use layout::WorkspaceLayout;
pub use path::NormalizedPath;
