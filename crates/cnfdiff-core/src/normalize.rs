//! Value normalization pipeline
//!
//! Server variables come back in many spellings: `512M` in an option file is
//! `536870912` on the server, `ON` is `1`, and `sql_mode` flags may be listed
//! in any order. The pipeline folds these spellings into one canonical string
//! so that equivalent values compare equal.
//!
//! Stages run in a fixed order and each one passes unrecognized input through
//! unchanged, which makes [`normalize`] total.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern for size values such as `512M` or `2k`
static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d*)([KMGT])$").unwrap());

static STANDARD: LazyLock<Pipeline> = LazyLock::new(Pipeline::standard);

/// A single named transformation.
///
/// `apply` returns `None` when it does not recognize its input.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<String>,
}

impl Stage {
    pub const fn new(name: &'static str, apply: fn(&str) -> Option<String>) -> Self {
        Self { name, apply }
    }
}

/// An ordered list of normalization stages.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// The pipeline used for all comparisons:
    /// sizes, then booleans, then numbers, then sets.
    ///
    /// Size expansion must precede numeric canonicalization so that an
    /// expanded size goes through the same formatting as a byte count
    /// reported by the server.
    pub fn standard() -> Self {
        Self::from_stages(vec![
            Stage::new("size_suffix", expand_size_suffix),
            Stage::new("boolean", canonicalize_boolean),
            Stage::new("number", canonicalize_number),
            Stage::new("set", canonicalize_set),
        ])
    }

    pub fn from_stages(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run a value through every stage in order.
    pub fn normalize(&self, value: &str) -> String {
        self.stages
            .iter()
            .fold(value.to_string(), |current, stage| {
                (stage.apply)(&current).unwrap_or(current)
            })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Normalize a value with the standard pipeline.
pub fn normalize(value: &str) -> String {
    STANDARD.normalize(value)
}

/// Expand `K`/`M`/`G`/`T` suffixes to a byte count.
///
/// The numeric part may be empty (`"K"` is 0). Fractional sizes and
/// products that overflow `u64` are not recognized.
pub fn expand_size_suffix(value: &str) -> Option<String> {
    let caps = SIZE_PATTERN.captures(value)?;
    let digits = caps.get(1).map_or("", |m| m.as_str());
    let unit = caps.get(2)?.as_str();

    let multiplier: u64 = match unit.to_ascii_uppercase().as_str() {
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        "T" => 1 << 40,
        _ => return None,
    };
    let base: u64 = if digits.is_empty() {
        0
    } else {
        digits.parse().ok()?
    };

    base.checked_mul(multiplier).map(|bytes| bytes.to_string())
}

/// Fold boolean spellings to `1` and `0`.
pub fn canonicalize_boolean(value: &str) -> Option<String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "on" | "true" => Some("1".to_string()),
        "no" | "off" | "false" => Some("0".to_string()),
        _ => None,
    }
}

/// Format anything that parses as a finite float with zero decimals.
///
/// Makes `10`, `10.0` and `0010.000` compare equal.
pub fn canonicalize_number(value: &str) -> Option<String> {
    let number: f64 = value.parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(format!("{number:.0}"))
}

/// Sort comma-separated flag sets.
pub fn canonicalize_set(value: &str) -> Option<String> {
    if !value.contains(',') {
        return None;
    }
    let mut parts: Vec<&str> = value.split(',').collect();
    parts.sort_unstable();
    Some(parts.join(","))
}
