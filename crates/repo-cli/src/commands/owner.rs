//! Path ownership lookup

use std::path::Path;

use colored::Colorize;
use repo_packages::get_packages;

use crate::error::{CliError, Result};

/// Run the owner command
///
/// Relative paths are taken from the current directory, like any other
/// path argument.
pub fn run_owner(root: &Path, path: &Path) -> Result<()> {
    let registry = get_packages(root)?;
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let pkg = registry
        .find_package_for_path(&target)
        .ok_or_else(|| CliError::user(format!("no package owns {}", path.display())))?;

    println!("{} {}", pkg.id.green().bold(), pkg.normalized_repo_relative_dir.dimmed());
    Ok(())
}
