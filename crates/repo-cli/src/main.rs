//! repo-pkgs CLI
//!
//! Maintains the package map of a monorepo and answers questions about its
//! packages.

mod cli;
mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use repo_fs::WorkspaceLayout;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::ManifestSource;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} package discovery for monorepos", "repo-pkgs".green().bold());
        println!();
        println!("Run {} for available commands.", "repo-pkgs --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let root = resolve_root(cli.root.as_deref())?;
    tracing::debug!("repository root: {}", root.display());
    execute_command(&root, command)
}

fn execute_command(root: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::UpdateMap {
            from_git,
            manifests,
        } => {
            let source = if from_git {
                ManifestSource::Git
            } else if manifests.is_empty() {
                ManifestSource::Walk
            } else {
                let cwd = std::env::current_dir()?;
                ManifestSource::Explicit(manifests.into_iter().map(|p| cwd.join(p)).collect())
            };
            commands::run_update_map(root, source).map(|_| ())
        }
        Commands::List { json, plugins } => commands::run_list(root, json, plugins.as_ref()),
        Commands::Owner { path } => commands::run_owner(root, &path),
        Commands::Resolve { request, from } => {
            commands::run_resolve(root, &request, from.as_deref())
        }
        Commands::Check => commands::run_check(root),
        Commands::Completions { .. } => Ok(()),
    }
}

/// DEBUG with `-v`, WARN otherwise. `RUST_LOG` overrides either.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing was already initialised", "warning".yellow().bold());
    }
}

/// The explicit `--root`, or the nearest ancestor of the current directory
/// holding `.repository` or `.git`.
fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    match root {
        Some(root) => {
            Ok(dunce::canonicalize(root).map_err(|e| repo_fs::Error::io(root, e))?)
        }
        None => {
            let cwd = std::env::current_dir()?;
            Ok(WorkspaceLayout::detect(&cwd)?.root.to_native())
        }
    }
}
