//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used throughout
//! the workspace for content integrity verification and cache invalidation.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute one checksum over a set of `(key, content)` entries.
///
/// Entries are sorted by key first, so the result does not depend on the
/// order they were discovered in. Each entry is framed as
/// `key NUL content NUL`, which keeps `("ab", "c")` distinct from
/// `("a", "bc")`.
pub fn compute_entries_checksum<K, C>(entries: impl IntoIterator<Item = (K, C)>) -> String
where
    K: AsRef<str>,
    C: AsRef<[u8]>,
{
    let mut entries: Vec<(K, C)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut hasher = Sha256::new();
    for (key, content) in &entries {
        hasher.update(key.as_ref().as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_ref());
        hasher.update([0u8]);
    }
    format!("{}{:x}", PREFIX, hasher.finalize())
}
