//! The persisted package map: a cache of `id -> directory` plus a hash of
//! the manifests it was built from.
//!
//! On disk the map is a single JSON document:
//!
//! ```json
//! {
//!   "hash": "sha256:…",
//!   "packages": [
//!     ["@kbn/foo", "packages/kbn-foo"]
//!   ]
//! }
//! ```
//!
//! Entries are sorted by id and directories are repository-relative with
//! forward slashes, so the file is byte-identical for identical inputs.

use std::collections::BTreeMap;
use std::path::Path;

use repo_fs::{NormalizedPath, RobustnessConfig, checksum, io};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::package::Package;

/// Mapping of package id to repository-relative directory, with the hash
/// of the manifest set that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMap {
    hash: String,
    entries: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize)]
struct PackageMapFile {
    hash: String,
    packages: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct HashOnly {
    hash: String,
}

impl PackageMap {
    pub fn new(hash: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self {
            hash: hash.into(),
            entries,
        }
    }

    pub fn from_packages<'a>(
        hash: impl Into<String>,
        packages: impl IntoIterator<Item = &'a Package>,
    ) -> Self {
        let entries = packages
            .into_iter()
            .map(|pkg| (pkg.id.clone(), pkg.normalized_repo_relative_dir.clone()))
            .collect();
        Self::new(hash, entries)
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Repository-relative directory of `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, dir)| (id.as_str(), dir.as_str()))
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the on-disk form, with a trailing newline.
    pub fn to_file_contents(&self) -> String {
        let file = PackageMapFile {
            hash: self.hash.clone(),
            packages: self
                .entries
                .iter()
                .map(|(id, dir)| (id.clone(), dir.clone()))
                .collect(),
        };
        // Strings and tuples of strings always serialize
        let mut out = serde_json::to_string_pretty(&file).unwrap_or_default();
        out.push('\n');
        out
    }

    fn from_file_contents(content: &str) -> serde_json::Result<Self> {
        let file: PackageMapFile = serde_json::from_str(content)?;
        Ok(Self::new(file.hash, file.packages.into_iter().collect()))
    }
}

/// Hash a set of `(repo-relative manifest path, manifest text)` pairs.
///
/// Order-independent, and sensitive to every byte of every manifest as well
/// as to where each manifest lives.
pub fn compute_manifests_hash<K, C>(entries: impl IntoIterator<Item = (K, C)>) -> String
where
    K: AsRef<str>,
    C: AsRef<[u8]>,
{
    checksum::compute_entries_checksum(entries)
}

/// Read the package map for `repo_root`.
///
/// A missing, unreadable or malformed file is reported as `None`: the map is
/// only a cache and the caller falls back to a full scan.
pub fn read_package_map(repo_root: &Path, config: &RegistryConfig) -> Option<PackageMap> {
    let path = config.package_map_path(repo_root);
    let content = read_map_text(&path)?;
    match PackageMap::from_file_contents(&content) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!("ignoring malformed package map at {}: {}", path, e);
            None
        }
    }
}

/// Read only the hash recorded in the package map.
pub fn read_hash_of_package_map(repo_root: &Path, config: &RegistryConfig) -> Option<String> {
    let path = config.package_map_path(repo_root);
    let content = read_map_text(&path)?;
    serde_json::from_str::<HashOnly>(&content)
        .map(|doc| doc.hash)
        .ok()
}

/// Atomically replace the package map for `repo_root`.
pub fn write_package_map(repo_root: &Path, config: &RegistryConfig, map: &PackageMap) -> Result<()> {
    let path = config.package_map_path(repo_root);
    debug!("writing package map with {} entries to {}", map.len(), path);
    io::write_atomic(
        &path,
        map.to_file_contents().as_bytes(),
        RobustnessConfig::default(),
    )?;
    Ok(())
}

fn read_map_text(path: &NormalizedPath) -> Option<String> {
    match io::read_text_optional(path) {
        Ok(Some(content)) => Some(content),
        Ok(None) => {
            debug!("no package map at {}", path);
            None
        }
        Err(e) => {
            warn!("unable to read package map: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> PackageMap {
        PackageMap::new(
            "sha256:abc",
            BTreeMap::from([
                ("@kbn/b".to_string(), "packages/b".to_string()),
                ("@kbn/a".to_string(), "packages/a".to_string()),
            ]),
        )
    }

    #[test]
    fn test_file_contents_are_sorted_with_trailing_newline() {
        let content = sample().to_file_contents();
        assert!(content.ends_with("}\n"));
        let a = content.find("@kbn/a").unwrap();
        let b = content.find("@kbn/b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let config = RegistryConfig::default();

        write_package_map(temp.path(), &config, &sample()).unwrap();

        assert_eq!(read_package_map(temp.path(), &config), Some(sample()));
        assert_eq!(
            read_hash_of_package_map(temp.path(), &config).as_deref(),
            Some("sha256:abc")
        );
    }

    #[test]
    fn test_missing_map_is_none() {
        let temp = TempDir::new().unwrap();
        let config = RegistryConfig::default();
        assert_eq!(read_package_map(temp.path(), &config), None);
        assert_eq!(read_hash_of_package_map(temp.path(), &config), None);
    }

    #[test]
    fn test_malformed_map_is_none() {
        let temp = TempDir::new().unwrap();
        let config = RegistryConfig::default();
        std::fs::create_dir_all(temp.path().join(".repository")).unwrap();
        std::fs::write(temp.path().join(".repository/package-map.json"), "{ \"hash\": 1 }").unwrap();

        assert_eq!(read_package_map(temp.path(), &config), None);
        assert_eq!(read_hash_of_package_map(temp.path(), &config), None);
    }

    #[test]
    fn test_manifests_hash_ignores_order() {
        let forward = compute_manifests_hash([("a/kibana.jsonc", "1"), ("b/kibana.jsonc", "2")]);
        let backward = compute_manifests_hash([("b/kibana.jsonc", "2"), ("a/kibana.jsonc", "1")]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_manifests_hash_tracks_location() {
        let here = compute_manifests_hash([("a/kibana.jsonc", "1")]);
        let there = compute_manifests_hash([("b/kibana.jsonc", "1")]);
        assert_ne!(here, there);
    }
}
