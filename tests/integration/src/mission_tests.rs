//! Mission-based Integration Tests
//!
//! These tests validate production scenarios for the package registry:
//! bootstrapping the map, keeping it current as manifests change, and
//! answering lookups from the result.

use pretty_assertions::assert_eq;
use repo_packages::{
    Error, ImportKind, PluginSelector, Registry, RegistryConfig, ScanSource, discover,
    get_packages, parse_kbn_import_req, read_hash_of_package_map, update_package_map,
};
use repo_test_utils::TestRepo;
use repo_test_utils::manifests::package_manifest;

/// A small monorepo in the usual shape.
fn monorepo() -> TestRepo {
    let repo = TestRepo::new();
    repo.add_package("packages/kbn-std", "@kbn/std");
    repo.add_package("packages/kbn-utils", "@kbn/utils");
    repo.add_plugin("src/plugins/data", "@kbn/data-plugin", "data", &[]);
    repo.add_plugin("x-pack/plugins/ml", "@kbn/ml-plugin", "ml", &["data"]);
    repo
}

// =============================================================================
// Mission 1: Bootstrap
// =============================================================================

mod m1_bootstrap {
    use super::*;
    use pretty_assertions::assert_eq;

    /// M1.1: Bootstrapping from the git index writes the map
    #[test]
    fn m1_1_bootstrap_from_git_index() {
        let repo = monorepo();
        repo.init_git();
        repo.stage_all();

        let config = RegistryConfig::load(repo.root()).unwrap();
        let manifests = discover::find_manifest_paths_from_git(repo.root(), &config).unwrap();
        assert_eq!(manifests.len(), 4);

        assert!(update_package_map(repo.root(), &manifests).unwrap());
        repo.assert_file_exists(".repository/package-map.json");

        let registry = get_packages(repo.root()).unwrap();
        assert_eq!(registry.source(), ScanSource::PackageMap);
    }

    /// M1.2: Untracked packages are invisible to the git bootstrap
    #[test]
    fn m1_2_untracked_package_needs_full_walk() {
        let repo = monorepo();
        repo.init_git();
        repo.stage_all();
        repo.add_package("packages/kbn-new", "@kbn/new");

        let config = RegistryConfig::load(repo.root()).unwrap();
        let from_git = discover::find_manifest_paths_from_git(repo.root(), &config).unwrap();
        let from_walk = discover::find_manifest_paths(repo.root(), &config).unwrap();

        assert_eq!(from_git.len(), 4);
        assert_eq!(from_walk.len(), 5);
    }

    /// M1.3: Bootstrapping twice is a no-op
    #[test]
    fn m1_3_second_bootstrap_is_noop() {
        let repo = monorepo();
        let config = RegistryConfig::default();
        let manifests = discover::find_manifest_paths(repo.root(), &config).unwrap();

        assert!(update_package_map(repo.root(), &manifests).unwrap());
        let before = repo.read(".repository/package-map.json");
        assert!(!update_package_map(repo.root(), &manifests).unwrap());

        assert_eq!(repo.read(".repository/package-map.json"), before);
    }
}

// =============================================================================
// Mission 2: Keeping the map current
// =============================================================================

mod m2_cache {
    use super::*;
    use pretty_assertions::assert_eq;

    /// M2.1: Unchanged repository takes the fast path with identical results
    #[test]
    fn m2_1_unchanged_repository_uses_map() {
        let repo = monorepo();
        let first = get_packages(repo.root()).unwrap();
        let second = get_packages(repo.root()).unwrap();

        assert_eq!(first.source(), ScanSource::FullWalk);
        assert_eq!(second.source(), ScanSource::PackageMap);
        assert_eq!(first.pkgs_by_id(), second.pkgs_by_id());
        assert_eq!(first.pkg_dir_map(), second.pkg_dir_map());
    }

    /// M2.2: Editing a manifest invalidates the map and the edit is visible
    #[test]
    fn m2_2_edited_manifest_rescans() {
        let repo = monorepo();
        let before = get_packages(repo.root()).unwrap();

        repo.add_plugin("x-pack/plugins/ml", "@kbn/ml-plugin", "ml", &["data", "uiActions"]);
        let after = get_packages(repo.root()).unwrap();

        assert_eq!(after.source(), ScanSource::FullWalk);
        assert_ne!(before.hash(), after.hash());
        let ml = after.get("@kbn/ml-plugin").unwrap().manifest.plugin().unwrap();
        assert_eq!(ml.required_plugins, vec!["data", "uiActions"]);
        assert_eq!(
            read_hash_of_package_map(after.repo_root(), after.config()).as_deref(),
            Some(after.hash())
        );
    }

    /// M2.3: Moving a package invalidates the map
    #[test]
    fn m2_3_moved_package_rescans() {
        let repo = monorepo();
        get_packages(repo.root()).unwrap();

        repo.remove("packages/kbn-utils");
        repo.add_package("src/platform/packages/shared/kbn-utils", "@kbn/utils");
        let registry = get_packages(repo.root()).unwrap();

        assert_eq!(registry.source(), ScanSource::FullWalk);
        assert_eq!(
            registry.get("@kbn/utils").unwrap().normalized_repo_relative_dir,
            "src/platform/packages/shared/kbn-utils"
        );
    }

    /// M2.4: A caller-held registry is unaffected by later changes until rebuilt
    #[test]
    fn m2_4_registry_is_a_snapshot() {
        let repo = monorepo();
        let registry = get_packages(repo.root()).unwrap();

        repo.add_package("packages/kbn-later", "@kbn/later");

        assert!(registry.get("@kbn/later").is_none());
        // The map still matches the manifests it lists, so a fast rebuild
        // does not see the new package; an explicit walk does.
        assert_eq!(registry.rebuild().unwrap().len(), 4);
        let walked = Registry::from_manifests(
            registry.repo_root(),
            registry.config().clone(),
            &discover::find_manifest_paths(registry.repo_root(), registry.config()).unwrap(),
        )
        .unwrap();
        assert!(walked.get("@kbn/later").is_some());
    }
}

// =============================================================================
// Mission 3: Lookups
// =============================================================================

mod m3_lookups {
    use super::*;
    use pretty_assertions::assert_eq;

    /// M3.1: Imports classify relative to the importing file
    #[test]
    fn m3_1_classify_imports() {
        let repo = monorepo();
        let registry = get_packages(repo.root()).unwrap();
        let importer = registry.repo_root().join("x-pack/plugins/ml/public/app.tsx");

        let kind = |source: &str| {
            parse_kbn_import_req(source)
                .unwrap()
                .classify(&registry, &importer)
        };
        assert_eq!(kind("@kbn/ml-plugin/common"), ImportKind::SelfReference);
        assert_eq!(kind("@kbn/data-plugin/public"), ImportKind::CrossPackage);
        assert_eq!(kind("@elastic/eui"), ImportKind::External);
    }

    /// M3.2: Every declared plugin dependency resolves to a known plugin
    #[test]
    fn m3_2_plugin_dependencies_resolve() {
        let repo = monorepo();
        let registry = get_packages(repo.root()).unwrap();

        let plugin_ids: Vec<&str> = registry
            .plugins(&PluginSelector::All)
            .into_iter()
            .map(|pkg| pkg.plugin_id_or_err().unwrap())
            .collect();
        for pkg in registry.plugins(&PluginSelector::All) {
            for dep in pkg.manifest.plugin().unwrap().all_dependencies() {
                assert!(plugin_ids.contains(&dep), "{} depends on unknown {}", pkg.id, dep);
            }
        }
    }

    /// M3.3: Repositories without plugins select none
    #[test]
    fn m3_3_core_only_repository_has_no_plugins() {
        let repo = TestRepo::new();
        repo.write_manifest("packages/core-a", &package_manifest("@kbn/core-a", "core"));
        repo.write_manifest("packages/core-b", &package_manifest("@kbn/core-b", "core"));
        let registry = get_packages(repo.root()).unwrap();

        for selector in ["all", "production", "test-helper", "oss"] {
            let selector: PluginSelector = selector.parse().unwrap();
            assert!(registry.plugins(&selector).is_empty());
        }
    }
}

// =============================================================================
// Robustness
// =============================================================================

mod robustness {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Duplicate ids fail the scan and leave no map behind
    #[test]
    fn duplicate_ids_fail_without_writing() {
        let repo = monorepo();
        repo.add_package("x-pack/packages/kbn-std", "@kbn/std");

        let err = get_packages(repo.root()).unwrap_err();

        assert!(matches!(err, Error::DuplicatePackageId { ref id, .. } if id == "@kbn/std"));
        assert!(err.to_string().contains("packages/kbn-std/kibana.jsonc"));
        assert!(err.to_string().contains("x-pack/packages/kbn-std/kibana.jsonc"));
        repo.assert_file_not_exists(".repository/package-map.json");
    }

    /// A broken manifest in a previously valid repository is fatal
    #[test]
    fn broken_manifest_after_valid_map() {
        let repo = monorepo();
        get_packages(repo.root()).unwrap();

        repo.write_manifest("packages/kbn-std", "{ \"type\": \"shared-common\", ");

        assert!(matches!(
            get_packages(repo.root()),
            Err(Error::ManifestParse { .. })
        ));
    }

    /// Unicode directory names survive the map round trip
    #[test]
    fn unicode_package_directory() {
        let repo = TestRepo::new();
        repo.add_package("packages/日本語", "@kbn/nihongo");

        let first = get_packages(repo.root()).unwrap();
        let second = get_packages(repo.root()).unwrap();

        assert_eq!(second.source(), ScanSource::PackageMap);
        assert_eq!(
            first.get("@kbn/nihongo").unwrap().normalized_repo_relative_dir,
            "packages/日本語"
        );
    }

    /// Manifests with comments and trailing commas are accepted
    #[test]
    fn commented_manifest() {
        let repo = TestRepo::new();
        repo.write_manifest(
            "packages/kbn-commented",
            "// header\n{\n  \"type\": \"shared-server\", /* inline */\n  \"id\": \"@kbn/commented\",\n  \"owner\": [\"@elastic/a\", \"@elastic/b\",],\n}\n",
        );

        let registry = get_packages(repo.root()).unwrap();

        assert_eq!(registry.get("@kbn/commented").unwrap().manifest.owner.len(), 2);
    }
}
