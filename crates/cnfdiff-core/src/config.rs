//! Canonical configuration snapshots
//!
//! A [`CanonicalConfig`] is what every reader produces: a source kind tag
//! plus the variable name to value mapping read from that source. Snapshots
//! are immutable once built; the diff engine only ever borrows them through
//! the [`ConfigSource`] trait.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where a configuration snapshot came from.
///
/// The kind decides which key universe a source enumerates, which in turn
/// decides whether a key missing on one side is a real difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An option file. Lists only the options explicitly set.
    File,

    /// A running server. Reports every variable it knows, set or not.
    Live,

    /// A defaults listing. Reports every option with its compiled-in default.
    Defaults,
}

impl SourceKind {
    /// Does this kind report every variable, not only explicit settings?
    pub fn enumerates_universe(&self) -> bool {
        matches!(self, SourceKind::Live | SourceKind::Defaults)
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "cnf" => Ok(SourceKind::File),
            "live" | "mysql" => Ok(SourceKind::Live),
            "defaults" => Ok(SourceKind::Defaults),
            _ => Err(Error::InvalidSourceKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Live => write!(f, "live"),
            SourceKind::Defaults => write!(f, "defaults"),
        }
    }
}

/// A raw configuration value as handed over by a reader.
///
/// Readers usually produce text, but scalars are accepted too. Comparison
/// always goes through the textual form returned by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Float(x) => write!(f, "{x}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

/// Read access to a configuration snapshot.
///
/// The diff engine depends only on this trait, never on how the data was
/// obtained.
pub trait ConfigSource {
    /// Kind of source the snapshot was taken from
    fn kind(&self) -> SourceKind;

    /// Look up a single variable
    fn get(&self, name: &str) -> Option<&ConfigValue>;

    /// Enumerate all `(name, value)` pairs
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &ConfigValue)> + '_>;

    /// Enumerate all variable names
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.entries().map(|(name, _)| name))
    }

    /// Is the variable present in this snapshot?
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Human-readable description of where the snapshot came from
    fn origin(&self) -> Option<&str> {
        None
    }
}

/// An immutable snapshot of one configuration source.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalConfig {
    kind: SourceKind,
    origin: Option<String>,
    entries: BTreeMap<String, ConfigValue>,
}

impl CanonicalConfig {
    /// Create a snapshot from an already collected mapping.
    pub fn new(kind: SourceKind, entries: BTreeMap<String, ConfigValue>) -> Self {
        Self {
            kind,
            origin: None,
            entries,
        }
    }

    /// Create a snapshot from `(name, value)` pairs.
    ///
    /// When a name repeats, the last value wins.
    pub fn from_entries<I, K, V>(kind: SourceKind, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(kind, entries)
    }

    /// Attach a description of where the snapshot came from.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name)
    }

    /// All entries, ordered by name
    pub fn entries(&self) -> &BTreeMap<String, ConfigValue> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSource for CanonicalConfig {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &ConfigValue)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("file".parse::<SourceKind>().unwrap(), SourceKind::File);
        assert_eq!("CNF".parse::<SourceKind>().unwrap(), SourceKind::File);
        assert_eq!("live".parse::<SourceKind>().unwrap(), SourceKind::Live);
        assert_eq!("mysql".parse::<SourceKind>().unwrap(), SourceKind::Live);
        assert_eq!(
            "defaults".parse::<SourceKind>().unwrap(),
            SourceKind::Defaults
        );
        assert!("registry".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_source_kind_display_roundtrip() {
        for kind in [SourceKind::File, SourceKind::Live, SourceKind::Defaults] {
            assert_eq!(kind.to_string().parse::<SourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_enumerates_universe() {
        assert!(!SourceKind::File.enumerates_universe());
        assert!(SourceKind::Live.enumerates_universe());
        assert!(SourceKind::Defaults.enumerates_universe());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ConfigValue::from("512M").to_string(), "512M");
        assert_eq!(ConfigValue::Bool(true).to_string(), "true");
        assert_eq!(ConfigValue::Int(-3).to_string(), "-3");
        assert_eq!(ConfigValue::Float(10.0).to_string(), "10");
        assert_eq!(ConfigValue::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let values = vec![
            ConfigValue::from("x"),
            ConfigValue::Bool(false),
            ConfigValue::Int(7),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["x",false,7]"#);
    }

    #[test]
    fn test_from_entries_last_value_wins() {
        let config = CanonicalConfig::from_entries(
            SourceKind::File,
            [("port", "3306"), ("port", "3307")],
        );
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("port"), Some(&ConfigValue::from("3307")));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let config =
            CanonicalConfig::from_entries(SourceKind::Live, [("Port", "1"), ("port", "2")]);
        assert_eq!(config.len(), 2);
        assert!(config.get("PORT").is_none());
    }

    #[test]
    fn test_config_source_access() {
        let config = CanonicalConfig::from_entries(
            SourceKind::Defaults,
            [("b", "2"), ("a", "1")],
        )
        .with_origin("defaults.txt");
        let source: &dyn ConfigSource = &config;

        assert_eq!(source.kind(), SourceKind::Defaults);
        assert_eq!(source.origin(), Some("defaults.txt"));
        assert!(source.contains("a"));
        assert!(!source.contains("c"));
        assert_eq!(source.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(source.entries().count(), 2);
    }
}
