//! Error types for cnfdiff-sources

use std::path::PathBuf;

/// Result type for cnfdiff-sources operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a configuration snapshot
///
/// Every variant names the source that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid defaults listing {path}: there are no entries to parse")]
    EmptyDefaults { path: PathBuf },

    #[error("Include nesting too deep at {path}")]
    IncludeDepth { path: PathBuf },

    #[error("Invalid DSN '{dsn}': {reason}")]
    InvalidDsn { dsn: String, reason: String },

    #[error("Cannot connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Timed out after {timeout:?} connecting to {target}")]
    ConnectTimeout {
        target: String,
        timeout: std::time::Duration,
    },

    #[error("Cannot read the server variables from {target}: {source}")]
    Query {
        target: String,
        #[source]
        source: sqlx::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn invalid_dsn(dsn: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDsn {
            dsn: dsn.into(),
            reason: reason.into(),
        }
    }
}
