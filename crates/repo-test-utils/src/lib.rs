//! Shared test utilities for the repo-packages workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures at two realism levels
//! - [`repo`]: [`TestRepo`](repo::TestRepo) builder for monorepo layouts
//! - [`manifests`]: manifest text builders

pub mod git;
pub mod manifests;
pub mod repo;

pub use repo::TestRepo;
