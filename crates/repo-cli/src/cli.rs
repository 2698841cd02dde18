//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use repo_packages::PluginSelector;

/// Package discovery and import resolution for monorepos
#[derive(Parser, Debug)]
#[command(name = "repo-pkgs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository root (detected from the current directory by default)
    #[arg(long, global = true, env = "REPO_PKGS_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Regenerate the package map
    ///
    /// Without arguments the repository is walked for manifests. Pass
    /// manifest paths to index exactly those, or --from-git to take them
    /// from the git index.
    ///
    /// Examples:
    ///   repo-pkgs update-map
    ///   repo-pkgs update-map --from-git
    ///   repo-pkgs update-map packages/kbn-foo/kibana.jsonc
    UpdateMap {
        /// List manifests from the git index instead of walking the disk
        #[arg(long, conflicts_with = "manifests")]
        from_git: bool,

        /// Manifest files to index, absolute or relative to the root
        manifests: Vec<PathBuf>,
    },

    /// List packages
    ///
    /// Examples:
    ///   repo-pkgs list
    ///   repo-pkgs list --plugins production
    ///   repo-pkgs list --plugins ids:data,ml --json
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Only list plugins: all, production, test-helper, oss or ids:<a,b>
        #[arg(long, value_name = "SELECTOR")]
        plugins: Option<PluginSelector>,
    },

    /// Show which package owns a path
    Owner {
        /// File or directory, absolute or relative to the current directory
        path: PathBuf,
    },

    /// Resolve an @scope/name/sub/path import request to a directory
    ///
    /// Examples:
    ///   repo-pkgs resolve @kbn/foo/server
    ///   repo-pkgs resolve @kbn/foo --from packages/kbn-bar/index.ts
    Resolve {
        /// The import request
        request: String,

        /// Importing file, used to classify the import
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Check that the package map matches the manifests on disk
    ///
    /// Exits non-zero when the map is missing or stale.
    Check,

    /// Generate shell completions
    ///
    /// Examples:
    ///   repo-pkgs completions bash > ~/.local/share/bash-completion/completions/repo-pkgs
    ///   repo-pkgs completions zsh > ~/.zfunc/_repo-pkgs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
