//! Selecting plugin packages by population.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;
use crate::package::Package;

/// A named set of plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSelector {
    /// Every plugin.
    All,
    /// Plugins that ship: not examples, not test plugins, not dev-only.
    Production,
    /// Production plugins plus test plugins. Never examples.
    TestHelperVisible,
    /// Production plugins outside `x-pack`.
    Oss,
    /// Plugins whose plugin id is in the set.
    Ids(BTreeSet<String>),
}

impl FromStr for PluginSelector {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidSelector {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match value {
            "all" => Ok(Self::All),
            "production" => Ok(Self::Production),
            "test-helper" => Ok(Self::TestHelperVisible),
            "oss" => Ok(Self::Oss),
            _ => {
                let list = value.strip_prefix("ids:").ok_or_else(|| {
                    invalid("expected one of: all, production, test-helper, oss, ids:<a,b,...>")
                })?;
                let ids: BTreeSet<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect();
                if ids.is_empty() {
                    return Err(invalid("no plugin ids given"));
                }
                Ok(Self::Ids(ids))
            }
        }
    }
}

impl fmt::Display for PluginSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Production => f.write_str("production"),
            Self::TestHelperVisible => f.write_str("test-helper"),
            Self::Oss => f.write_str("oss"),
            Self::Ids(ids) => {
                let joined: Vec<&str> = ids.iter().map(String::as_str).collect();
                write!(f, "ids:{}", joined.join(","))
            }
        }
    }
}

/// A predicate accepting the plugin packages `selector` names.
///
/// Non-plugin packages never match.
pub fn get_plugin_packages_filter(selector: &PluginSelector) -> impl Fn(&Package) -> bool + use<> {
    let selector = selector.clone();
    move |pkg: &Package| {
        let Some(plugin) = pkg.manifest.plugin() else {
            return false;
        };
        let categories = pkg.plugin_categories();
        let production = !categories.example && !categories.test_plugin && !pkg.is_dev_only();

        match &selector {
            PluginSelector::All => true,
            PluginSelector::Production => production,
            PluginSelector::TestHelperVisible => {
                !categories.example && (production || categories.test_plugin)
            }
            PluginSelector::Oss => production && categories.oss,
            PluginSelector::Ids(ids) => ids.contains(&plugin.id),
        }
    }
}

const OSS_PLUGIN_DIRS: &[&str] = &["src/platform/plugins", "src/plugins", "plugins"];
const XPACK_PLUGIN_DIRS: &[&str] = &["x-pack/platform/plugins", "x-pack/solutions", "x-pack/plugins"];
const EXAMPLE_PLUGIN_DIRS: &[&str] = &["examples", "x-pack/examples"];
const TEST_PLUGIN_DIRS: &[&str] = &[
    "src/platform/test/plugin_functional/plugins",
    "test/plugin_functional/plugins",
    "test/common/plugins",
    "x-pack/test/plugin_functional/plugins",
];

/// Conventional parent directories of the plugins `selector` can match.
pub fn plugin_search_paths(repo_root: &Path, selector: &PluginSelector) -> Vec<PathBuf> {
    let (xpack, examples, tests) = match selector {
        PluginSelector::All | PluginSelector::Ids(_) => (true, true, true),
        PluginSelector::Production => (true, false, false),
        PluginSelector::TestHelperVisible => (true, false, true),
        PluginSelector::Oss => (false, false, false),
    };

    let mut dirs: Vec<&str> = OSS_PLUGIN_DIRS.to_vec();
    if xpack {
        dirs.extend(XPACK_PLUGIN_DIRS);
    }
    if examples {
        dirs.extend(EXAMPLE_PLUGIN_DIRS);
    }
    if tests {
        dirs.extend(TEST_PLUGIN_DIRS);
    }
    dirs.into_iter().map(|dir| repo_root.join(dir)).collect()
}
