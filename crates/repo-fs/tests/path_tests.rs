use repo_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_resolves_dots() {
    let base = NormalizedPath::new("/a/b");

    assert_eq!(base.join("c").as_str(), "/a/b/c");
    assert_eq!(base.join("./c").as_str(), "/a/b/c");
    assert_eq!(base.join("../c").as_str(), "/a/c");
    assert_eq!(base.join("../../c").as_str(), "/c");
    assert_eq!(base.join("../../../c").as_str(), "/c");
}

#[test]
fn test_leading_parent_dropped_for_relative_paths() {
    assert_eq!(NormalizedPath::new("../outside.txt").as_str(), "outside.txt");
    assert_eq!(NormalizedPath::new("a/../../b").as_str(), "b");
}

#[test]
fn test_parent() {
    assert_eq!(NormalizedPath::new("foo/bar/baz").parent().unwrap().as_str(), "foo/bar");
    assert_eq!(NormalizedPath::new("/foo").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("foo").parent().is_none());
    assert!(NormalizedPath::new("/").parent().is_none());
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("pkgs/foo/kibana.jsonc");
    assert_eq!(path.file_name(), Some("kibana.jsonc"));
    assert_eq!(NormalizedPath::new("/").file_name(), None);
}

#[test]
fn test_network_prefix_is_kept() {
    assert_eq!(NormalizedPath::new("\\\\server\\share").as_str(), "//server/share");
    assert!(NormalizedPath::new("//server/share/path").is_absolute());
}

#[rstest]
#[case("/a/pkg/src/index.ts", "/a/pkg", true)]
#[case("/a/pkg", "/a/pkg", true)]
#[case("/a/pkg/", "/a/pkg", true)]
#[case("/a/pkg-2/index.ts", "/a/pkg", false)]
#[case("/a/pkgA-extra", "/a/pkgA", false)]
#[case("/a", "/a/pkg", false)]
#[case("a/pkg/x", "/a/pkg", false)]
#[case("/a/pkg/../other", "/a/pkg", false)]
#[case("packages/foo/bar", "packages/foo", true)]
fn test_starts_with_is_segment_wise(
    #[case] path: &str,
    #[case] base: &str,
    #[case] expected: bool,
) {
    let path = NormalizedPath::new(path);
    let base = NormalizedPath::new(base);
    assert_eq!(path.starts_with(&base), expected, "{path} vs {base}");
}

#[test]
fn test_strip_prefix() {
    let root = NormalizedPath::new("/repo");
    let dir = NormalizedPath::new("/repo/src/platform/packages/kbn-foo");

    assert_eq!(
        dir.strip_prefix(&root).unwrap().as_str(),
        "src/platform/packages/kbn-foo"
    );
    assert_eq!(root.strip_prefix(&root).unwrap().as_str(), ".");
    assert!(NormalizedPath::new("/repo-2/x").strip_prefix(&root).is_none());
}

#[test]
fn test_depth() {
    assert_eq!(NormalizedPath::new("/").depth(), 0);
    assert_eq!(NormalizedPath::new("/a/b/c").depth(), 3);
    assert_eq!(NormalizedPath::new(".").depth(), 0);
}

#[test]
fn test_is_absolute() {
    assert!(NormalizedPath::new("/a").is_absolute());
    assert!(NormalizedPath::new("C:\\a").is_absolute());
    assert!(!NormalizedPath::new("a/b").is_absolute());
}
