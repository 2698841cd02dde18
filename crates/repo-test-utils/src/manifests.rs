//! Builders for `kibana.jsonc` manifest text.

/// A minimal manifest for a non-plugin package of `package_type`.
pub fn package_manifest(id: &str, package_type: &str) -> String {
    format!(
        "{{\n  \"type\": \"{package_type}\",\n  \"id\": \"{id}\",\n  \"owner\": \"@elastic/kibana-core\"\n}}\n"
    )
}

/// A plugin manifest with browser and server entry points.
pub fn plugin_manifest(id: &str, plugin_id: &str, required_plugins: &[&str]) -> String {
    let required = required_plugins
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{{\n  \"type\": \"plugin\",\n  \"id\": \"{id}\",\n  \"owner\": [\"@elastic/kibana-core\"],\n  // entry points\n  \"plugin\": {{\n    \"id\": \"{plugin_id}\",\n    \"server\": true,\n    \"browser\": true,\n    \"requiredPlugins\": [{required}],\n  }},\n}}\n"
    )
}

/// A plugin manifest marked `devOnly`.
pub fn dev_only_plugin_manifest(id: &str, plugin_id: &str) -> String {
    format!(
        "{{\n  \"type\": \"plugin\",\n  \"id\": \"{id}\",\n  \"owner\": \"@elastic/kibana-core\",\n  \"devOnly\": true,\n  \"plugin\": {{ \"id\": \"{plugin_id}\", \"server\": true, \"browser\": false }}\n}}\n"
    )
}
