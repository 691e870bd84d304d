//! Report rendering
//!
//! A [`DiffReport`] renders either as aligned text, one row per differing
//! variable, or as a JSON object mapping each name to its two values.

use std::fmt::Write;

use clap::ValueEnum;
use cnfdiff_core::DiffReport;
use serde::Deserialize;

use crate::error::Result;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Aligned `name: first : second` rows
    #[default]
    Plain,
    /// Compact JSON object
    Json,
    /// Indented JSON object
    #[value(alias = "prettyJson")]
    #[serde(alias = "prettyJson")]
    PrettyJson,
}

/// Renders a report for printing
pub trait OutputFormatter {
    fn format(&self, report: &DiffReport) -> Result<String>;
}

/// Get the formatter for an output format
pub fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Plain => Box::new(PlainOutput),
        OutputFormat::Json => Box::new(JsonOutput { pretty: false }),
        OutputFormat::PrettyJson => Box::new(JsonOutput { pretty: true }),
    }
}

/// Fixed-width text rows, sorted by name
pub struct PlainOutput;

impl OutputFormatter for PlainOutput {
    fn format(&self, report: &DiffReport) -> Result<String> {
        let mut out = String::new();
        for (name, entry) in report.iter() {
            // Values are padded as strings; their Display impls ignore width.
            let first = entry.first.to_string();
            let second = entry.second.to_string();
            let _ = writeln!(out, "{name:>35}: {first:>40} : {second:>40}");
        }
        Ok(out)
    }
}

/// JSON object keyed by variable name
pub struct JsonOutput {
    pub pretty: bool,
}

impl OutputFormatter for JsonOutput {
    fn format(&self, report: &DiffReport) -> Result<String> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        out.push('\n');
        Ok(out)
    }
}
