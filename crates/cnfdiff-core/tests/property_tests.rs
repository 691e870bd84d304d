use cnfdiff_core::{CanonicalConfig, SourceKind, compare, normalize};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::File),
        Just(SourceKind::Live),
        Just(SourceKind::Defaults),
    ]
}

proptest! {
    #[test]
    fn test_normalize_idempotent(s in "\\PC*") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_idempotent_config_like(s in "[0-9]{0,6}(\\.[0-9]{1,3})?[kKmMgGtT]?") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_size_expansion_matches_multiplier(n in 0u64..1_000_000, unit in 0usize..4) {
        let (suffix, multiplier) = [("K", 1u64 << 10), ("M", 1 << 20), ("G", 1 << 30), ("T", 1 << 40)][unit];
        prop_assert_eq!(normalize(&format!("{n}{suffix}")), (n * multiplier).to_string());
    }

    #[test]
    fn test_set_normalization_ignores_order(mut parts in prop::collection::vec("[A-Z_]{1,12}", 2..6)) {
        let forward = parts.join(",");
        parts.reverse();
        let backward = parts.join(",");
        prop_assert_eq!(normalize(&forward), normalize(&backward));
    }

    #[test]
    fn test_self_comparison_is_empty(
        kind in any_kind(),
        entries in prop::collection::btree_map("[a-z_]{1,16}", "\\PC{0,12}", 0..24),
    ) {
        let config = CanonicalConfig::from_entries(kind, entries);
        prop_assert!(compare(&[&config, &config]).is_empty());
    }
}
