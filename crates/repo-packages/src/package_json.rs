//! The subset of `package.json` the registry cares about.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A parsed `package.json` living next to a package manifest.
///
/// Unlike manifests this file is shared with the JavaScript toolchain, so
/// unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Read `package.json` at `path` if it exists.
    pub fn read_optional(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::manifest(path, format!("unable to read package.json: {e}")))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::manifest(path, format!("invalid package.json: {e}")))
    }
}
