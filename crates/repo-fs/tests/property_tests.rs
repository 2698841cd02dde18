use proptest::prelude::*;
use repo_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // Only a network prefix may contain a double slash
        let remainder = as_str.strip_prefix("//").unwrap_or(as_str);
        prop_assert!(!remainder.contains("//"));

        // Normalizing twice changes nothing
        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_join_stays_inside_base(
        base in "(/[a-z]{1,5}){1,4}",
        child in "([a-z]{1,5}/){0,3}[a-z]{1,5}",
    ) {
        let base = NormalizedPath::new(&base);
        let joined = base.join(&child);
        prop_assert!(joined.starts_with(&base));
        prop_assert_eq!(joined.depth(), base.depth() + child.split('/').count());
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_not_contained(
        dir in "(/[a-z]{1,5}){1,3}",
        suffix in "[a-z0-9-]{1,5}",
    ) {
        let base = NormalizedPath::new(&dir);
        let sibling = NormalizedPath::new(format!("{dir}{suffix}"));
        prop_assert!(!sibling.starts_with(&base));
        prop_assert!(base.join("x").starts_with(&base));
    }
}
