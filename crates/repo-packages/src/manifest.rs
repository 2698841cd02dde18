//! Package manifest parsing for `kibana.jsonc` files.
//!
//! A manifest declares a package's id, type, owners and, for plugins, the
//! plugin id and its dependencies. Parsing is strict: the JSONC pre-pass
//! removes comments and trailing commas, then the document is checked
//! against a closed schema. Unknown keys are rejected, and type-specific
//! keys are only accepted on the type they belong to.
//!
//! # Example
//!
//! ```jsonc
//! {
//!   "type": "plugin",
//!   "id": "@kbn/data-plugin",
//!   "owner": ["@elastic/kibana-data-discovery"],
//!   "plugin": {
//!     "id": "data",
//!     "server": true,
//!     "browser": true,
//!     "requiredPlugins": ["expressions", "uiActions"],
//!   },
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::jsonc;

static PLUGIN_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z_]*$").unwrap());

static PACKAGE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[a-z0-9][a-z0-9._-]*/[a-z0-9][a-z0-9._-]*$").unwrap());

/// Whether `id` is a valid plugin id (`^[a-z][a-zA-Z_]*$`).
pub fn is_valid_plugin_id(id: &str) -> bool {
    PLUGIN_ID_PATTERN.is_match(id)
}

/// Whether `id` is a valid scoped package id (`@scope/name`).
pub fn is_valid_package_id(id: &str) -> bool {
    PACKAGE_ID_PATTERN.is_match(id)
}

/// The closed set of package types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageType {
    FunctionalTests,
    Core,
    Plugin,
    SharedBrowser,
    SharedCommon,
    SharedScss,
    SharedServer,
    TestHelper,
}

impl PackageType {
    pub const ALL: [PackageType; 8] = [
        Self::FunctionalTests,
        Self::Core,
        Self::Plugin,
        Self::SharedBrowser,
        Self::SharedCommon,
        Self::SharedScss,
        Self::SharedServer,
        Self::TestHelper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionalTests => "functional-tests",
            Self::Core => "core",
            Self::Plugin => "plugin",
            Self::SharedBrowser => "shared-browser",
            Self::SharedCommon => "shared-common",
            Self::SharedScss => "shared-scss",
            Self::SharedServer => "shared-server",
            Self::TestHelper => "test-helper",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(PackageType::as_str).collect();
                format!("unknown type '{s}', expected one of: {}", valid.join(", "))
            })
    }
}

impl Serialize for PackageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whether a package may be imported from outside its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Shared,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }
}

/// Build-time options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BuildOptions {
    /// Extra glob patterns excluded from the package's build output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_excludes: Vec<String>,
}

/// The `plugin` section of a plugin manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PluginManifest {
    /// Plugin id, distinct from the package id.
    pub id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub browser: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub server: bool,
    /// Config key(s) this plugin reads from.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many::deserialize",
        serialize_with = "one_or_many::serialize"
    )]
    pub config_path: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled_on_anonymous_pages: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_bundles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_plugin_dependencies: Vec<String>,
}

impl PluginManifest {
    fn validate(&self) -> std::result::Result<(), String> {
        if !is_valid_plugin_id(&self.id) {
            return Err(format!(
                "plugin.id '{}' must match {}",
                self.id,
                PLUGIN_ID_PATTERN.as_str()
            ));
        }

        let lists = [
            ("requiredPlugins", &self.required_plugins),
            ("optionalPlugins", &self.optional_plugins),
            ("requiredBundles", &self.required_bundles),
            ("runtimePluginDependencies", &self.runtime_plugin_dependencies),
        ];
        for (name, ids) in lists {
            if let Some((index, bad)) = ids.iter().enumerate().find(|(_, id)| !is_valid_plugin_id(id)) {
                return Err(format!(
                    "plugin.{name}[{index}]: '{bad}' is not a valid plugin id"
                ));
            }
        }

        Ok(())
    }

    /// Every plugin id this plugin depends on, required or optional.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.required_plugins
            .iter()
            .chain(&self.optional_plugins)
            .chain(&self.runtime_plugin_dependencies)
            .map(String::as_str)
    }
}

/// Type-specific part of a manifest, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageKind {
    FunctionalTests,
    Core,
    Plugin(PluginManifest),
    SharedBrowser { public_path: bool },
    SharedCommon,
    SharedScss,
    SharedServer,
    TestHelper,
}

impl PackageKind {
    pub fn package_type(&self) -> PackageType {
        match self {
            Self::FunctionalTests => PackageType::FunctionalTests,
            Self::Core => PackageType::Core,
            Self::Plugin(_) => PackageType::Plugin,
            Self::SharedBrowser { .. } => PackageType::SharedBrowser,
            Self::SharedCommon => PackageType::SharedCommon,
            Self::SharedScss => PackageType::SharedScss,
            Self::SharedServer => PackageType::SharedServer,
            Self::TestHelper => PackageType::TestHelper,
        }
    }
}

/// A validated package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub id: String,
    /// Owning teams, never empty.
    pub owner: Vec<String>,
    pub group: Option<String>,
    pub visibility: Option<Visibility>,
    pub dev_only: bool,
    pub description: Option<String>,
    pub build: Option<BuildOptions>,
    pub kind: PackageKind,
}

/// Shape of the manifest document before type-specific validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawManifest {
    #[serde(rename = "type")]
    package_type: Option<String>,
    id: Option<String>,
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    owner: Vec<String>,
    group: Option<String>,
    visibility: Option<Visibility>,
    dev_only: Option<bool>,
    description: Option<String>,
    build: Option<BuildOptions>,
    plugin: Option<Value>,
    public_path: Option<bool>,
}

impl RawManifest {
    fn validate(self) -> std::result::Result<PackageManifest, String> {
        let package_type: PackageType = self
            .package_type
            .as_deref()
            .ok_or("missing required field `type`")?
            .parse()?;

        let id = self.id.ok_or("missing required field `id`")?;
        if !is_valid_package_id(&id) {
            return Err(format!("id '{id}' must be a scoped package name like @kbn/foo"));
        }

        if self.owner.is_empty() {
            return Err("`owner` must name at least one owner".to_string());
        }
        if self.owner.iter().any(|o| o.trim().is_empty()) {
            return Err("`owner` entries must be non-empty strings".to_string());
        }

        if self.public_path.is_some() && package_type != PackageType::SharedBrowser {
            return Err(format!(
                "`publicPath` is only allowed on shared-browser packages, found on {package_type}"
            ));
        }

        let kind = match (package_type, self.plugin) {
            (PackageType::Plugin, Some(section)) => {
                let plugin: PluginManifest = serde_json::from_value(section)
                    .map_err(|e| format!("invalid `plugin` section: {e}"))?;
                plugin.validate()?;
                PackageKind::Plugin(plugin)
            }
            (PackageType::Plugin, None) => {
                return Err("plugin packages require a `plugin` section".to_string());
            }
            (other, Some(_)) => {
                return Err(format!(
                    "`plugin` is only allowed on plugin packages, found on {other}"
                ));
            }
            (PackageType::FunctionalTests, None) => PackageKind::FunctionalTests,
            (PackageType::Core, None) => PackageKind::Core,
            (PackageType::SharedBrowser, None) => PackageKind::SharedBrowser {
                public_path: self.public_path.unwrap_or(false),
            },
            (PackageType::SharedCommon, None) => PackageKind::SharedCommon,
            (PackageType::SharedScss, None) => PackageKind::SharedScss,
            (PackageType::SharedServer, None) => PackageKind::SharedServer,
            (PackageType::TestHelper, None) => PackageKind::TestHelper,
        };

        Ok(PackageManifest {
            id,
            owner: self.owner,
            group: self.group,
            visibility: self.visibility,
            dev_only: self.dev_only.unwrap_or(false),
            description: self.description,
            build: self.build,
            kind,
        })
    }
}

/// Borrowed on-disk shape used by [`PackageManifest::to_jsonc`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedManifest<'a> {
    #[serde(rename = "type")]
    package_type: PackageType,
    id: &'a str,
    #[serde(serialize_with = "one_or_many::serialize")]
    owner: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "is_false")]
    dev_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<&'a BuildOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin: Option<&'a PluginManifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_path: Option<bool>,
}

impl PackageManifest {
    /// Parse manifest text. `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value: Value = jsonc::parse(content)
            .map_err(|e| Error::manifest(path, format!("malformed JSONC: {e}")))?;

        if !value.is_object() {
            return Err(Error::manifest(path, "expected an object at the top level"));
        }

        let raw: RawManifest =
            serde_json::from_value(value).map_err(|e| Error::manifest(path, e.to_string()))?;

        raw.validate().map_err(|reason| Error::manifest(path, reason))
    }

    /// Serialize back to the on-disk shape.
    ///
    /// The output is plain JSON, which is valid JSONC, and parses back to an
    /// equal manifest.
    pub fn to_jsonc(&self) -> String {
        let doc = SerializedManifest {
            package_type: self.package_type(),
            id: &self.id,
            owner: &self.owner,
            group: self.group.as_deref(),
            visibility: self.visibility,
            dev_only: self.dev_only,
            description: self.description.as_deref(),
            build: self.build.as_ref(),
            plugin: self.plugin(),
            public_path: match self.kind {
                PackageKind::SharedBrowser { public_path: true } => Some(true),
                _ => None,
            },
        };
        // Serializing plain data into a String cannot fail
        let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
        out.push('\n');
        out
    }

    pub fn package_type(&self) -> PackageType {
        self.kind.package_type()
    }

    /// The plugin section, if this is a plugin manifest.
    pub fn plugin(&self) -> Option<&PluginManifest> {
        match &self.kind {
            PackageKind::Plugin(plugin) => Some(plugin),
            _ => None,
        }
    }
}

/// Read and validate the manifest at `path`.
pub fn parse_manifest(path: &Path) -> Result<PackageManifest> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::manifest(path, format!("unable to read manifest: {e}")))?;
    PackageManifest::parse(&content, path)
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `"a"` or `["a", "b"]`, always held as a list.
mod one_or_many {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<String>, D::Error> {
        match OneOrMany::deserialize(deserializer) {
            Ok(OneOrMany::One(one)) => Ok(vec![one]),
            Ok(OneOrMany::Many(many)) => Ok(many),
            Err(_) => Err(serde::de::Error::custom(
                "expected a string or an array of strings",
            )),
        }
    }

    pub fn serialize<T: AsRef<[String]>, S: Serializer>(
        values: &T,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match values.as_ref() {
            [one] => serializer.serialize_str(one),
            many => many.serialize(serializer),
        }
    }
}
