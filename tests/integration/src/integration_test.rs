//! End-to-end integration test for the vertical slice
//!
//! This test exercises the complete flow: root detection -> config loading ->
//! manifest discovery -> package map -> lookups.

use repo_fs::{NormalizedPath, RepoPath, WorkspaceLayout};
use repo_packages::{
    RegistryConfig, ScanSource, discover, get_packages, parse_kbn_import_req, read_package_map,
};
use repo_test_utils::TestRepo;

/// Set up a test repository with packages, plugins and a config file
fn setup_test_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.write_file(
        ".repository/packages.toml",
        "exclude = [\"fixtures\"]\nmax_depth = 12\n",
    );
    repo.add_package("src/platform/packages/shared/kbn-std", "@kbn/std");
    repo.add_package("x-pack/solutions/security/packages/kbn-sec", "@kbn/sec");
    repo.add_plugin("src/platform/plugins/shared/data", "@kbn/data-plugin", "data", &[]);
    repo.add_plugin(
        "x-pack/platform/plugins/private/ml",
        "@kbn/ml-plugin",
        "ml",
        &["data"],
    );
    repo.add_package("fixtures/not-a-real-package", "@kbn/std");
    repo
}

#[test]
fn test_detect_root_load_config_and_scan() {
    let repo = setup_test_repo();

    let layout = WorkspaceLayout::detect(repo.path("src/platform/packages/shared/kbn-std")).unwrap();
    assert_eq!(layout.marker, RepoPath::RepositoryConfig);

    let root = layout.root.to_native();
    let config = RegistryConfig::load(&root).unwrap();
    assert_eq!(config.max_depth, 12);

    let manifests = discover::find_manifest_paths(&root, &config).unwrap();
    assert_eq!(manifests.len(), 4);

    let registry = get_packages(&root).unwrap();
    assert_eq!(registry.source(), ScanSource::FullWalk);
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_map_matches_registry() {
    let repo = setup_test_repo();
    let registry = get_packages(repo.root()).unwrap();

    let map = read_package_map(registry.repo_root(), registry.config()).unwrap();

    assert_eq!(map.hash(), registry.hash());
    for pkg in registry.packages() {
        assert_eq!(map.get(&pkg.id), Some(pkg.normalized_repo_relative_dir.as_str()));
    }
}

#[test]
fn test_derived_package_attributes() {
    let repo = setup_test_repo();
    let registry = get_packages(repo.root()).unwrap();

    let sec = registry.get("@kbn/sec").unwrap();
    assert_eq!(sec.group(), "security");

    let ml = registry.get("@kbn/ml-plugin").unwrap();
    assert_eq!(ml.group(), "platform");
    assert_eq!(ml.visibility(), repo_packages::Visibility::Private);
    assert!(!ml.plugin_categories().oss);
    assert_eq!(
        ml.manifest.plugin().unwrap().all_dependencies().collect::<Vec<_>>(),
        vec!["data"]
    );
}

#[test]
fn test_import_resolution_round_trip() {
    let repo = setup_test_repo();
    let registry = get_packages(repo.root()).unwrap();

    let req = parse_kbn_import_req("@kbn/std/src/lib").unwrap();
    let target = registry.resolve_import(&req).unwrap();

    let owner = registry.find_package_for_path(&target).unwrap();
    assert_eq!(owner.id, "@kbn/std");
    assert!(
        NormalizedPath::new(&target)
            .as_str()
            .ends_with("src/platform/packages/shared/kbn-std/src/lib")
    );
}
