//! Package listing

use std::path::Path;

use colored::Colorize;
use repo_packages::{Package, PluginSelector, get_packages};
use serde::Serialize;

use crate::error::Result;

/// One row of `list --json` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    package_type: &'static str,
    dir: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin_id: Option<&'a str>,
    owner: &'a [String],
    group: &'a str,
    visibility: &'static str,
    dev_only: bool,
}

impl<'a> From<&'a Package> for PackageRow<'a> {
    fn from(pkg: &'a Package) -> Self {
        Self {
            id: &pkg.id,
            package_type: pkg.manifest.package_type().as_str(),
            dir: &pkg.normalized_repo_relative_dir,
            plugin_id: pkg.manifest.plugin().map(|p| p.id.as_str()),
            owner: &pkg.manifest.owner,
            group: pkg.group(),
            visibility: pkg.visibility().as_str(),
            dev_only: pkg.is_dev_only(),
        }
    }
}

/// Run the list command
pub fn run_list(root: &Path, json: bool, plugins: Option<&PluginSelector>) -> Result<()> {
    let registry = get_packages(root)?;
    let packages: Vec<&Package> = match plugins {
        Some(selector) => registry.plugins(selector),
        None => registry.packages().collect(),
    };

    if json {
        let rows: Vec<PackageRow<'_>> = packages.iter().map(|pkg| PackageRow::from(*pkg)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for pkg in &packages {
        let label = match pkg.manifest.plugin() {
            Some(plugin) => format!("plugin:{}", plugin.id),
            None => pkg.manifest.package_type().to_string(),
        };
        println!(
            "  {:<40} {} ({})",
            pkg.id.green(),
            pkg.normalized_repo_relative_dir,
            label.dimmed()
        );
    }
    println!();
    println!("{} {} packages", "Total:".dimmed(), packages.len());
    Ok(())
}
