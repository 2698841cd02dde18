//! Command implementations for repo-cli

pub mod check;
pub mod list;
pub mod owner;
pub mod resolve;
pub mod update_map;

pub use check::run_check;
pub use list::run_list;
pub use owner::run_owner;
pub use resolve::run_resolve;
pub use update_map::{ManifestSource, run_update_map};
