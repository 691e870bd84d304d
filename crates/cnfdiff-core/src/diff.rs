//! Key-level diff between configuration snapshots
//!
//! Different source kinds enumerate different key universes. An option file
//! lists only what was set explicitly, while a live server or a defaults
//! listing reports every variable it knows. A key that only the enumerating
//! side has is therefore not a difference; the [`SkipPolicy`] decides.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::{CanonicalConfig, ConfigSource, ConfigValue, SourceKind};
use crate::normalize::Pipeline;

/// Placeholder for a key absent from one side
pub const MISSING: &str = "<Missing>";

/// One side of a diff entry
#[derive(Debug, Clone, PartialEq)]
pub enum DiffValue {
    /// The raw value as read from the source
    Present(ConfigValue),
    /// The key does not exist in the source
    Missing,
}

impl DiffValue {
    pub fn present(value: impl Into<ConfigValue>) -> Self {
        DiffValue::Present(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DiffValue::Missing)
    }
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffValue::Present(value) => value.fmt(f),
            DiffValue::Missing => f.write_str(MISSING),
        }
    }
}

impl Serialize for DiffValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DiffValue::Present(value) => value.serialize(serializer),
            DiffValue::Missing => serializer.serialize_str(MISSING),
        }
    }
}

/// The two values recorded for a differing key
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    /// Value in the comparison base
    pub first: DiffValue,
    /// Value in the compared source
    pub second: DiffValue,
}

impl DiffEntry {
    pub fn new(first: DiffValue, second: DiffValue) -> Self {
        Self { first, second }
    }
}

impl Serialize for DiffEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.first, &self.second).serialize(serializer)
    }
}

/// All differing keys of a comparison run, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiffReport {
    entries: BTreeMap<String, DiffEntry>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DiffEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Record an entry, returning the one it replaced
    fn record(&mut self, name: &str, entry: DiffEntry) -> Option<DiffEntry> {
        self.entries.insert(name.to_string(), entry)
    }
}

impl<K: Into<String>> FromIterator<(K, DiffEntry)> for DiffReport {
    fn from_iter<I: IntoIterator<Item = (K, DiffEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for DiffReport {
    type Item = (String, DiffEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Decides whether a key present on only one side counts as a difference.
///
/// Keys that only an option file has are always reported. Keys that only a
/// live server or defaults listing has are suppressed when the other side
/// is of a different kind, since those sources pad with every variable
/// they know. Two live servers are compared in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipPolicy {
    /// Suppress one-sided keys when both sides are defaults listings
    pub suppress_between_defaults: bool,
}

impl SkipPolicy {
    /// Is a key present in a source of kind `owner` but absent from a source
    /// of kind `other` suppressed?
    pub fn suppresses(&self, owner: SourceKind, other: SourceKind) -> bool {
        if !owner.enumerates_universe() {
            return false;
        }
        if owner != other {
            return true;
        }
        match owner {
            SourceKind::Defaults => self.suppress_between_defaults,
            _ => false,
        }
    }
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self {
            suppress_between_defaults: true,
        }
    }
}

/// Compares snapshots through a normalization pipeline and skip policy
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    pipeline: Pipeline,
    policy: SkipPolicy,
}

impl DiffEngine {
    /// Engine with the standard pipeline and default policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: SkipPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn policy(&self) -> SkipPolicy {
        self.policy
    }

    /// Compare the first config against each later one.
    ///
    /// Results of all pairs are merged into one report. When two pairs
    /// disagree about the same key, the later pair wins. Fewer than two
    /// configs yield an empty report.
    pub fn compare(&self, configs: &[&dyn ConfigSource]) -> DiffReport {
        let mut report = DiffReport::new();

        let Some((base, others)) = configs.split_first() else {
            return report;
        };

        for other in others {
            self.compare_pair(*base, *other, &mut report);
        }

        report
    }

    /// Same as [`compare`](Self::compare) for a slice of snapshots
    pub fn compare_configs(&self, configs: &[CanonicalConfig]) -> DiffReport {
        let sources: Vec<&dyn ConfigSource> =
            configs.iter().map(|c| c as &dyn ConfigSource).collect();
        self.compare(&sources)
    }

    fn compare_pair(
        &self,
        base: &dyn ConfigSource,
        other: &dyn ConfigSource,
        report: &mut DiffReport,
    ) {
        let before = report.len();

        for (name, value) in base.entries() {
            match other.get(name) {
                None => {
                    if !self.policy.suppresses(base.kind(), other.kind()) {
                        self.record(
                            report,
                            name,
                            DiffEntry::new(DiffValue::Present(value.clone()), DiffValue::Missing),
                        );
                    }
                }
                Some(other_value) => {
                    if !self.equivalent(value, other_value) {
                        self.record(
                            report,
                            name,
                            DiffEntry::new(
                                DiffValue::Present(value.clone()),
                                DiffValue::Present(other_value.clone()),
                            ),
                        );
                    }
                }
            }
        }

        if !self.policy.suppresses(other.kind(), base.kind()) {
            for (name, value) in other.entries() {
                if !base.contains(name) {
                    self.record(
                        report,
                        name,
                        DiffEntry::new(DiffValue::Missing, DiffValue::Present(value.clone())),
                    );
                }
            }
        }

        debug!(
            base = base.origin().unwrap_or("-"),
            base_kind = %base.kind(),
            other = other.origin().unwrap_or("-"),
            other_kind = %other.kind(),
            new_entries = report.len() - before,
            "Compared configuration pair"
        );
    }

    fn equivalent(&self, left: &ConfigValue, right: &ConfigValue) -> bool {
        self.pipeline.normalize(&left.to_string()) == self.pipeline.normalize(&right.to_string())
    }

    fn record(&self, report: &mut DiffReport, name: &str, entry: DiffEntry) {
        if let Some(previous) = report.record(name, entry) {
            if report.get(name) != Some(&previous) {
                debug!(key = name, "Later comparison replaced an earlier diff entry");
            }
        }
    }
}

/// Compare configs with the standard pipeline and default skip policy.
pub fn compare(configs: &[&dyn ConfigSource]) -> DiffReport {
    DiffEngine::new().compare(configs)
}
