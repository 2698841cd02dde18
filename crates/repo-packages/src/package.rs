//! The [`Package`] entity: a manifest plus where it lives in the repository.

use std::path::{Path, PathBuf};

use repo_fs::NormalizedPath;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::manifest::{PackageManifest, Visibility};
use crate::package_json::PackageJson;

/// Raw manifest text read from disk, before parsing.
///
/// The same bytes feed both the package map hash and the parser, so a
/// manifest is read exactly once per scan.
#[derive(Debug, Clone)]
pub(crate) struct ManifestSource {
    /// Absolute manifest path.
    pub path: PathBuf,
    /// Manifest path relative to the repository root, forward slashes.
    pub rel_path: String,
    pub content: String,
}

impl ManifestSource {
    pub fn read(repo_root: &Path, path: &Path) -> Result<Self> {
        let rel_path = NormalizedPath::new(path)
            .strip_prefix(&NormalizedPath::new(repo_root))
            .ok_or_else(|| Error::manifest(path, "manifest is outside the repository root"))?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::manifest(path, format!("unable to read manifest: {e}")))?;
        Ok(Self {
            path: path.to_path_buf(),
            rel_path: rel_path.as_str().to_string(),
            content,
        })
    }
}

/// Which plugin populations a package belongs to, derived from its location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginCategoryInfo {
    /// Outside `x-pack/`.
    pub oss: bool,
    /// Under an `examples` directory.
    pub example: bool,
    /// Under a `test` or `test_plugins` directory.
    pub test_plugin: bool,
}

/// A discovered package.
///
/// Packages are immutable once built. The registry hands out shared
/// references, so the public fields can be read but not changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// The package id declared by the manifest.
    pub id: String,
    pub manifest: PackageManifest,
    /// Absolute path of the manifest file.
    pub manifest_path: PathBuf,
    /// Absolute path of the package directory.
    pub directory: PathBuf,
    /// Package directory relative to the repository root, forward slashes.
    /// `.` for a package at the root itself.
    pub normalized_repo_relative_dir: String,
    /// The sibling `package.json`, when one exists.
    pub package_json: Option<PackageJson>,
    dir: NormalizedPath,
}

impl Package {
    /// Read, parse and wrap the manifest at `manifest_path`.
    pub fn from_manifest_path(repo_root: &Path, manifest_path: &Path) -> Result<Self> {
        let source = ManifestSource::read(repo_root, manifest_path)?;
        Self::from_source(source)
    }

    pub(crate) fn from_source(source: ManifestSource) -> Result<Self> {
        let directory = source
            .path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::MissingPackageDir {
                path: source.path.clone(),
            })?;
        if !directory.is_dir() {
            return Err(Error::MissingPackageDir { path: directory });
        }

        let manifest = PackageManifest::parse(&source.content, &source.path)?;
        let package_json = PackageJson::read_optional(&directory.join("package.json"))?;

        let rel_dir = NormalizedPath::new(&source.rel_path)
            .parent()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| ".".to_string());

        Ok(Self {
            id: manifest.id.clone(),
            dir: NormalizedPath::new(&directory),
            manifest,
            manifest_path: source.path,
            directory,
            normalized_repo_relative_dir: rel_dir,
            package_json,
        })
    }

    pub fn is_plugin(&self) -> bool {
        self.manifest.plugin().is_some()
    }

    /// The plugin id, or [`Error::NotAPlugin`] for other package types.
    pub fn plugin_id_or_err(&self) -> Result<&str> {
        self.manifest
            .plugin()
            .map(|plugin| plugin.id.as_str())
            .ok_or_else(|| Error::NotAPlugin {
                id: self.id.clone(),
            })
    }

    pub fn is_dev_only(&self) -> bool {
        self.manifest.dev_only
    }

    /// Whether `path` is the package directory or lies below it.
    ///
    /// The test is lexical and segment-wise, so `pkg-extra/x` is not inside
    /// `pkg`. Relative paths never match since the package directory is
    /// absolute.
    pub fn includes_path(&self, path: impl AsRef<Path>) -> bool {
        self.includes_normalized(&NormalizedPath::new(path))
    }

    pub(crate) fn includes_normalized(&self, path: &NormalizedPath) -> bool {
        path.starts_with(&self.dir)
    }

    /// Segment count of the package directory, used to pick the innermost
    /// of several nested packages.
    pub(crate) fn dir_depth(&self) -> usize {
        self.dir.depth()
    }

    /// Ownership group: the manifest's `group`, else derived from location.
    pub fn group(&self) -> &str {
        if let Some(group) = &self.manifest.group {
            return group;
        }
        let segments = self.rel_segments();
        match segments.as_slice() {
            ["x-pack", "solutions", solution, ..] => *solution,
            ["src" | "x-pack", "platform", ..] => "platform",
            _ => "common",
        }
    }

    /// The manifest's `visibility`, else `private` for anything under a
    /// `private` directory.
    pub fn visibility(&self) -> Visibility {
        self.manifest.visibility.unwrap_or_else(|| {
            if self.rel_segments().contains(&"private") {
                Visibility::Private
            } else {
                Visibility::Shared
            }
        })
    }

    pub fn plugin_categories(&self) -> PluginCategoryInfo {
        let segments = self.rel_segments();
        PluginCategoryInfo {
            oss: segments.first() != Some(&"x-pack"),
            example: segments.contains(&"examples"),
            test_plugin: segments
                .iter()
                .any(|s| *s == "test" || *s == "test_plugins"),
        }
    }

    fn rel_segments(&self) -> Vec<&str> {
        self.normalized_repo_relative_dir
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect()
    }
}
