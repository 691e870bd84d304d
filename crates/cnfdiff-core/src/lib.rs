//! Value normalization and diff engine for cnfdiff
//!
//! Compares configuration snapshots taken from option files, live servers,
//! and defaults listings, reporting only the differences that survive
//! canonicalization of equivalent value spellings.

pub mod config;
pub mod diff;
pub mod error;
pub mod normalize;

pub use config::{CanonicalConfig, ConfigSource, ConfigValue, SourceKind};
pub use diff::{DiffEngine, DiffEntry, DiffReport, DiffValue, MISSING, SkipPolicy, compare};
pub use error::{Error, Result};
pub use normalize::{Pipeline, Stage, normalize};
