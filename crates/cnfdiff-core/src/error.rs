//! Error types for cnfdiff-core

/// Result type for cnfdiff-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cnfdiff-core operations
///
/// Comparison and normalization are total; only parsing of user-supplied
/// tags can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown source kind: {kind} (expected file, live or defaults)")]
    InvalidSourceKind { kind: String },
}
