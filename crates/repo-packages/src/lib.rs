//! Package discovery and import resolution for repo-packages
//!
//! Every package in the repository declares itself with a manifest file,
//! `kibana.jsonc` by default. This crate finds those manifests, validates
//! them, indexes the packages by id and directory, and resolves
//! `@scope/name/sub/path` import requests to directories.
//!
//! Scanning a large repository is slow, so the id to directory mapping is
//! cached in a package map file guarded by a hash of every manifest.
//!
//! ```no_run
//! use repo_packages::{get_packages, parse_kbn_import_req};
//!
//! let registry = get_packages(".")?;
//! if let Some(req) = parse_kbn_import_req("@kbn/foo/server") {
//!     println!("{}", registry.resolve_import(&req)?.display());
//! }
//! # Ok::<(), repo_packages::Error>(())
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod import_req;
pub mod jsonc;
pub mod manifest;
pub mod package;
pub mod package_json;
pub mod package_map;
pub mod plugins;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use import_req::{ImportKind, KbnImportReq, parse_kbn_import_req};
pub use manifest::{
    PackageKind, PackageManifest, PackageType, PluginManifest, Visibility, parse_manifest,
};
pub use package::{Package, PluginCategoryInfo};
pub use package_json::PackageJson;
pub use package_map::{
    PackageMap, compute_manifests_hash, read_hash_of_package_map, read_package_map,
    write_package_map,
};
pub use plugins::{PluginSelector, get_plugin_packages_filter, plugin_search_paths};
pub use registry::{
    Registry, ScanSource, find_package_for_path, get_packages, get_pkg_dir_map, get_pkgs_by_id,
    update_package_map,
};

/// Default manifest file name.
pub const MANIFEST_FILENAME: &str = "kibana.jsonc";
