//! Parsing `@scope/name/sub/path` import requests.

use std::fmt;
use std::path::Path;

use crate::registry::Registry;

/// A parsed package import request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KbnImportReq {
    /// Scope without the leading `@`.
    pub scope: String,
    /// Package name within the scope.
    pub name: String,
    /// Anything after `@scope/name/`, if present.
    pub sub_path: Option<String>,
    /// The original request.
    pub full: String,
}

/// How an import relates to the file it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// The importing file belongs to the imported package.
    SelfReference,
    /// Another known package.
    CrossPackage,
    /// A scoped id the registry does not know about.
    External,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfReference => "self-reference",
            Self::CrossPackage => "cross-package",
            Self::External => "external",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl KbnImportReq {
    /// The package id, `@scope/name`.
    pub fn pkg_id(&self) -> String {
        format!("@{}/{}", self.scope, self.name)
    }

    /// Classify the request relative to `importer`, a file path.
    pub fn classify(&self, registry: &Registry, importer: impl AsRef<Path>) -> ImportKind {
        let id = self.pkg_id();
        if registry.get(&id).is_none() {
            return ImportKind::External;
        }
        match registry.find_package_for_path(importer) {
            Some(owner) if owner.id == id => ImportKind::SelfReference,
            _ => ImportKind::CrossPackage,
        }
    }
}

impl fmt::Display for KbnImportReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Parse an import request of the form `@scope/name[/sub/path]`.
///
/// A single trailing `/` is ignored, so `@kbn/foo/` names the package
/// itself. Returns `None` for anything else: relative or bare specifiers, a
/// missing or empty scope or name, and sub-paths with empty, `.` or `..`
/// segments. Registry membership is not checked here; see
/// [`KbnImportReq::classify`].
pub fn parse_kbn_import_req(source: &str) -> Option<KbnImportReq> {
    let rest = source.strip_prefix('@')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let mut parts = rest.split('/');
    let scope = parts.next()?;
    let name = parts.next()?;
    if scope.is_empty() || name.is_empty() {
        return None;
    }

    let sub: Vec<&str> = parts.collect();
    if sub.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
        return None;
    }

    Some(KbnImportReq {
        scope: scope.to_string(),
        name: name.to_string(),
        sub_path: (!sub.is_empty()).then(|| sub.join("/")),
        full: source.to_string(),
    })
}
