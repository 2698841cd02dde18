//! Git repository fixtures.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs.
//! Fakes are faster and have fewer external dependencies.

use std::fs;
use std::path::Path;

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE**, directory structure only, no git object store.
///
/// Use for: tests that need a `.git` marker to satisfy root detection but do
/// not read the index.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` (no initial commit, no config).
///
/// Realism level: **REAL**, valid git object store, empty history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Stage every file in the working tree of `repo`, honouring `.gitignore`.
///
/// # Panics
/// Panics if the index cannot be updated.
pub fn stage_all(repo: &git2::Repository) {
    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("stage_all: failed to open index: {e}"));
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("stage_all: failed to add files: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("stage_all: failed to write index: {e}"));
}
