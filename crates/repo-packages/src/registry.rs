//! The package registry: every package in a repository, indexed by id.
//!
//! A [`Registry`] is built once and then only read. Building takes one of
//! two paths:
//!
//! - **Package map.** The persisted map lists every package directory. If
//!   each one still holds a manifest and the hash over those manifests
//!   matches the recorded hash, the registry is built from the map without
//!   walking the repository.
//! - **Full walk.** Otherwise the repository is walked for manifests and the
//!   map is rewritten if its contents changed.
//!
//! There is no process-wide cache. Callers that want to reuse a registry
//! keep it; callers that want fresh data call [`Registry::rebuild`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use repo_fs::NormalizedPath;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::discover;
use crate::error::{Error, Result};
use crate::import_req::KbnImportReq;
use crate::package::{ManifestSource, Package};
use crate::package_map::{self, PackageMap};
use crate::plugins::{self, PluginSelector};

/// Where a registry's package list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    /// Built from the persisted package map.
    PackageMap,
    /// Built by walking the repository.
    FullWalk,
    /// Built from an explicit list of manifest paths.
    ManifestList,
}

/// All packages of one repository.
#[derive(Debug, Clone)]
pub struct Registry {
    repo_root: PathBuf,
    config: RegistryConfig,
    hash: String,
    source: ScanSource,
    packages: BTreeMap<String, Package>,
    dir_map: BTreeMap<String, PathBuf>,
}

impl Registry {
    /// Build the registry for `repo_root`, using the package map when it is
    /// current and walking the repository otherwise.
    pub fn build(repo_root: impl AsRef<Path>, config: RegistryConfig) -> Result<Self> {
        let repo_root = canonical_root(repo_root.as_ref())?;

        if let Some(registry) = Self::from_package_map(&repo_root, &config)? {
            debug!(
                "loaded {} packages from package map",
                registry.packages.len()
            );
            return Ok(registry);
        }

        let manifest_paths = discover::find_manifest_paths(&repo_root, &config)?;
        let registry =
            Self::from_manifest_paths(repo_root, config, &manifest_paths, ScanSource::FullWalk)?;
        registry.persist()?;
        Ok(registry)
    }

    /// Build again from the same root and config, picking up any changes on
    /// disk.
    pub fn rebuild(&self) -> Result<Self> {
        Self::build(&self.repo_root, self.config.clone())
    }

    /// Build from explicit manifest paths without consulting the map.
    ///
    /// Relative paths are resolved against `repo_root`.
    pub fn from_manifests<P: AsRef<Path>>(
        repo_root: impl AsRef<Path>,
        config: RegistryConfig,
        manifest_paths: &[P],
    ) -> Result<Self> {
        let repo_root = canonical_root(repo_root.as_ref())?;
        let paths: Vec<PathBuf> = manifest_paths
            .iter()
            .map(|p| absolutize(&repo_root, p.as_ref()))
            .collect();
        Self::from_manifest_paths(repo_root, config, &paths, ScanSource::ManifestList)
    }

    fn from_package_map(repo_root: &Path, config: &RegistryConfig) -> Result<Option<Self>> {
        let Some(map) = package_map::read_package_map(repo_root, config) else {
            return Ok(None);
        };

        let mut sources = Vec::with_capacity(map.len());
        for (id, dir) in map.iter() {
            let manifest_path = repo_root.join(dir).join(&config.manifest_filename);
            if !manifest_path.is_file() {
                debug!("package map entry {} has no manifest at {}", id, manifest_path.display());
                return Ok(None);
            }
            match ManifestSource::read(repo_root, &manifest_path) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    debug!("unusable package map entry {}: {}", id, e);
                    return Ok(None);
                }
            }
        }

        let hash = hash_sources(&sources);
        if hash != map.hash() {
            warn!("package map is stale, rescanning {}", repo_root.display());
            return Ok(None);
        }

        let registry = Self::from_sources(
            repo_root.to_path_buf(),
            config.clone(),
            sources,
            hash,
            ScanSource::PackageMap,
        )?;

        if registry.package_map() != map {
            warn!("package map entries disagree with manifests, rescanning");
            return Ok(None);
        }
        Ok(Some(registry))
    }

    fn from_manifest_paths(
        repo_root: PathBuf,
        config: RegistryConfig,
        manifest_paths: &[PathBuf],
        source: ScanSource,
    ) -> Result<Self> {
        let mut sources = manifest_paths
            .iter()
            .map(|path| ManifestSource::read(&repo_root, path))
            .collect::<Result<Vec<_>>>()?;
        sources.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        sources.dedup_by(|a, b| a.rel_path == b.rel_path);

        let hash = hash_sources(&sources);
        Self::from_sources(repo_root, config, sources, hash, source)
    }

    fn from_sources(
        repo_root: PathBuf,
        config: RegistryConfig,
        sources: Vec<ManifestSource>,
        hash: String,
        source: ScanSource,
    ) -> Result<Self> {
        let mut packages: BTreeMap<String, Package> = BTreeMap::new();
        for manifest in sources {
            let pkg = Package::from_source(manifest)?;
            if let Some(existing) = packages.get(&pkg.id) {
                return Err(Error::DuplicatePackageId {
                    id: pkg.id,
                    first: existing.manifest_path.clone(),
                    second: pkg.manifest_path,
                });
            }
            packages.insert(pkg.id.clone(), pkg);
        }

        let dir_map = packages
            .values()
            .map(|pkg| (pkg.id.clone(), pkg.directory.clone()))
            .collect();

        Ok(Self {
            repo_root,
            config,
            hash,
            source,
            packages,
            dir_map,
        })
    }

    /// The package map describing this registry.
    pub fn package_map(&self) -> PackageMap {
        PackageMap::from_packages(self.hash.clone(), self.packages.values())
    }

    /// Whether the stored package map records exactly this registry, hash
    /// and entries both.
    pub fn is_persisted(&self) -> bool {
        package_map::read_package_map(&self.repo_root, &self.config)
            .is_some_and(|stored| stored == self.package_map())
    }

    /// Write the package map if it does not already record this registry.
    ///
    /// A stored map with the right hash but unreadable or mismatched entries
    /// is rewritten. Returns whether the file was written.
    pub fn persist(&self) -> Result<bool> {
        if self.is_persisted() {
            debug!("package map is up to date");
            return Ok(false);
        }

        let map = self.package_map();
        package_map::write_package_map(&self.repo_root, &self.config, &map)?;
        info!("updated package map with {} packages", map.len());
        Ok(true)
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Hash over the manifests this registry was built from.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn source(&self) -> ScanSource {
        self.source
    }

    /// Packages in id order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn pkgs_by_id(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn pkg_dir_map(&self) -> &BTreeMap<String, PathBuf> {
        &self.dir_map
    }

    /// The innermost package whose directory contains `path`.
    ///
    /// Relative paths are taken relative to the repository root.
    pub fn find_package_for_path(&self, path: impl AsRef<Path>) -> Option<&Package> {
        let target = NormalizedPath::new(self.repo_root.join(path.as_ref()));
        self.packages
            .values()
            .filter(|pkg| pkg.includes_normalized(&target))
            .max_by_key(|pkg| pkg.dir_depth())
    }

    /// Directory an import request points at.
    pub fn resolve_import(&self, req: &KbnImportReq) -> Result<PathBuf> {
        let id = req.pkg_id();
        let dir = self
            .dir_map
            .get(&id)
            .ok_or(Error::UnknownPackage { id })?;
        Ok(match &req.sub_path {
            Some(sub_path) => dir.join(sub_path),
            None => dir.clone(),
        })
    }

    /// Plugin packages matching `selector`, in id order.
    pub fn plugins(&self, selector: &PluginSelector) -> Vec<&Package> {
        let filter = plugins::get_plugin_packages_filter(selector);
        self.packages.values().filter(|pkg| filter(pkg)).collect()
    }
}

/// Load the config under `repo_root` and build its registry.
pub fn get_packages(repo_root: impl AsRef<Path>) -> Result<Registry> {
    let repo_root = canonical_root(repo_root.as_ref())?;
    let config = RegistryConfig::load(&repo_root)?;
    Registry::build(repo_root, config)
}

/// Rebuild the package map from an explicit list of manifests.
///
/// Writes only when the stored map does not already record these manifests,
/// and returns whether it wrote.
pub fn update_package_map<P: AsRef<Path>>(
    repo_root: impl AsRef<Path>,
    manifest_paths: &[P],
) -> Result<bool> {
    let repo_root = canonical_root(repo_root.as_ref())?;
    let config = RegistryConfig::load(&repo_root)?;
    Registry::from_manifests(repo_root, config, manifest_paths)?.persist()
}

pub fn find_package_for_path(registry: &Registry, path: impl AsRef<Path>) -> Option<&Package> {
    registry.find_package_for_path(path)
}

pub fn get_pkgs_by_id(registry: &Registry) -> &BTreeMap<String, Package> {
    registry.pkgs_by_id()
}

pub fn get_pkg_dir_map(registry: &Registry) -> &BTreeMap<String, PathBuf> {
    registry.pkg_dir_map()
}

fn hash_sources(sources: &[ManifestSource]) -> String {
    package_map::compute_manifests_hash(
        sources
            .iter()
            .map(|s| (s.rel_path.as_str(), s.content.as_bytes())),
    )
}

fn canonical_root(repo_root: &Path) -> Result<PathBuf> {
    dunce::canonicalize(repo_root)
        .map_err(|e| Error::Fs(repo_fs::Error::io(repo_root, e)))
}

/// Resolve a manifest path against a canonical root.
///
/// Absolute paths that do not sit under the canonical root, e.g. because
/// they were spelled through a symlink, are canonicalized themselves.
fn absolutize(repo_root: &Path, path: &Path) -> PathBuf {
    if !path.is_absolute() {
        return repo_root.join(path);
    }
    if NormalizedPath::new(path).starts_with(&NormalizedPath::new(repo_root)) {
        return path.to_path_buf();
    }
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
