//! Tests for the diff engine and skip policy

use cnfdiff_core::{
    CanonicalConfig, ConfigValue, DiffEngine, DiffEntry, DiffReport, DiffValue, SkipPolicy,
    SourceKind, compare,
};
use pretty_assertions::assert_eq;

fn sample(kind: SourceKind, third: (&str, ConfigValue), key2: i64) -> CanonicalConfig {
    CanonicalConfig::from_entries(
        kind,
        [
            ("key1".to_string(), ConfigValue::from("value1")),
            ("key2".to_string(), ConfigValue::Int(key2)),
            (third.0.to_string(), third.1),
        ],
    )
}

fn entry(first: DiffValue, second: DiffValue) -> DiffEntry {
    DiffEntry::new(first, second)
}

#[test]
fn test_compare_two_files() {
    let cnf1 = sample(SourceKind::File, ("key3", ConfigValue::Bool(true)), 2);
    let cnf2 = sample(SourceKind::File, ("key4", ConfigValue::Bool(true)), 3);

    let want: DiffReport = [
        (
            "key2",
            entry(DiffValue::present(2_i64), DiffValue::present(3_i64)),
        ),
        ("key3", entry(DiffValue::present(true), DiffValue::Missing)),
        ("key4", entry(DiffValue::Missing, DiffValue::present(true))),
    ]
    .into_iter()
    .collect();

    assert_eq!(compare(&[&cnf1, &cnf2]), want);
}

#[test]
fn test_compare_file_vs_live_skips_live_only_keys() {
    let cnf = sample(SourceKind::File, ("key3", ConfigValue::Bool(true)), 2);
    let live = sample(SourceKind::Live, ("key4", ConfigValue::Bool(true)), 3);

    let want: DiffReport = [
        (
            "key2",
            entry(DiffValue::present(2_i64), DiffValue::present(3_i64)),
        ),
        ("key3", entry(DiffValue::present(true), DiffValue::Missing)),
    ]
    .into_iter()
    .collect();

    assert_eq!(compare(&[&cnf, &live]), want);
}

#[test]
fn test_compare_live_vs_file_skips_live_only_keys() {
    let live = sample(SourceKind::Live, ("key4", ConfigValue::Bool(true)), 3);
    let cnf = sample(SourceKind::File, ("key3", ConfigValue::Bool(true)), 2);

    let report = compare(&[&live, &cnf]);
    assert_eq!(report.len(), 2);
    assert!(report.get("key4").is_none());
    assert_eq!(
        report.get("key3"),
        Some(&entry(DiffValue::Missing, DiffValue::present(true)))
    );
}

#[test]
fn test_compare_two_live_servers_reports_everything() {
    let live1 = sample(SourceKind::Live, ("key3", ConfigValue::Bool(true)), 2);
    let live2 = sample(SourceKind::Live, ("key4", ConfigValue::Bool(true)), 3);

    let report = compare(&[&live1, &live2]);
    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["key2", "key3", "key4"]);
}

#[test]
fn test_compare_file_vs_defaults() {
    let cnf = CanonicalConfig::from_entries(
        SourceKind::File,
        [
            ("innodb_buffer_pool_size", ConfigValue::from("512M")),
            ("log_slow_rate_limit", ConfigValue::from("100.1234")),
            ("log_slow_verbosity", ConfigValue::from("full")),
            ("auto_increment_offset", ConfigValue::Int(2)),
            ("port", ConfigValue::from("3306")),
        ],
    );
    let defaults = CanonicalConfig::from_entries(
        SourceKind::Defaults,
        [
            ("innodb_buffer_pool_size", "134217728"),
            ("auto_increment_offset", "1"),
            ("port", "3306"),
            ("max_connections", "151"),
        ],
    );

    let want: DiffReport = [
        (
            "auto_increment_offset",
            entry(DiffValue::present(2_i64), DiffValue::present("1")),
        ),
        (
            "innodb_buffer_pool_size",
            entry(DiffValue::present("512M"), DiffValue::present("134217728")),
        ),
        (
            "log_slow_rate_limit",
            entry(DiffValue::present("100.1234"), DiffValue::Missing),
        ),
        (
            "log_slow_verbosity",
            entry(DiffValue::present("full"), DiffValue::Missing),
        ),
    ]
    .into_iter()
    .collect();

    assert_eq!(compare(&[&cnf, &defaults]), want);
}

#[test]
fn test_defaults_only_keys_never_reported() {
    let defaults = CanonicalConfig::from_entries(
        SourceKind::Defaults,
        [("max_connections", "151"), ("port", "3306")],
    );
    let live = CanonicalConfig::from_entries(SourceKind::Live, [("port", "3306")]);
    let cnf = CanonicalConfig::from_entries(SourceKind::File, [("port", "3306")]);

    assert!(compare(&[&defaults, &live]).is_empty());
    assert!(compare(&[&defaults, &cnf]).is_empty());
    assert!(compare(&[&cnf, &defaults]).is_empty());
}

#[test]
fn test_defaults_vs_defaults_policy() {
    let older = CanonicalConfig::from_entries(
        SourceKind::Defaults,
        [("query_cache_size", "1048576"), ("port", "3306")],
    );
    let newer = CanonicalConfig::from_entries(
        SourceKind::Defaults,
        [("port", "3306"), ("binlog_expire_logs_seconds", "2592000")],
    );

    assert!(compare(&[&older, &newer]).is_empty());

    let engine = DiffEngine::new().with_policy(SkipPolicy {
        suppress_between_defaults: false,
    });
    let report = engine.compare(&[&older, &newer]);
    assert_eq!(
        report.keys().collect::<Vec<_>>(),
        vec!["binlog_expire_logs_seconds", "query_cache_size"]
    );
}

#[test]
fn test_compare_against_itself_is_empty() {
    let cnf = sample(SourceKind::File, ("key3", ConfigValue::Bool(true)), 2);
    assert!(compare(&[&cnf, &cnf]).is_empty());

    let live = sample(SourceKind::Live, ("key4", ConfigValue::from("a,b")), 3);
    assert!(compare(&[&live, &live.clone()]).is_empty());
}

#[test]
fn test_report_serializes_as_pairs() {
    let cnf1 = sample(SourceKind::File, ("key3", ConfigValue::Bool(true)), 2);
    let cnf2 = sample(SourceKind::File, ("key4", ConfigValue::Bool(true)), 3);

    let json = serde_json::to_value(compare(&[&cnf1, &cnf2])).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "key2": [2, 3],
            "key3": [true, "<Missing>"],
            "key4": ["<Missing>", true],
        })
    );
}
