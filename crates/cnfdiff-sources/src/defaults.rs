//! Reader for the defaults listing printed by `mysqld --verbose --help`
//!
//! Produce a listing with:
//!
//! ```text
//! touch /tmp/empty.cnf
//! mysqld --defaults-file=/tmp/empty.cnf --verbose --help > defaults.txt
//! ```
//!
//! The variable table follows a `-----  -----` ruler and ends at the first
//! blank line.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cnfdiff_core::{CanonicalConfig, ConfigValue, SourceKind};
use tracing::debug;

use crate::error::{Error, Result};
use crate::path::expand_home;

const NO_DEFAULT: &str = "(No default value)";

/// Read a defaults listing from a file.
pub fn read_defaults(path: impl AsRef<Path>) -> Result<CanonicalConfig> {
    let path = expand_home(path);
    let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let config = parse_listing(&content, &path)?;

    debug!(
        path = %path.display(),
        entries = config.len(),
        "Loaded defaults listing"
    );

    Ok(config.with_origin(path.display().to_string()))
}

/// Parse a defaults listing.
pub fn parse_defaults(source: &str) -> Result<CanonicalConfig> {
    parse_listing(source, Path::new("-"))
}

fn parse_listing(source: &str, path: &Path) -> Result<CanonicalConfig> {
    let mut entries = BTreeMap::new();

    let rows = source
        .lines()
        .skip_while(|line| !line.starts_with("-----"))
        .skip(1)
        .take_while(|line| !line.trim().is_empty());

    for row in rows {
        let row = row.trim();
        let (name, value) = row.split_once(' ').unwrap_or((row, ""));
        let value = match value.trim() {
            NO_DEFAULT => "",
            other => other,
        };
        entries.insert(name.replace('-', "_"), ConfigValue::from(value));
    }

    if entries.is_empty() {
        return Err(Error::EmptyDefaults {
            path: PathBuf::from(path),
        });
    }

    Ok(CanonicalConfig::new(SourceKind::Defaults, entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
mysqld  Ver 8.0.36 for Linux on x86_64 (MySQL Community Server - GPL)
Usage: mysqld [OPTIONS]

Variables (--variable-name=value)
and boolean options {FALSE|TRUE}                             Value (after reading options)
------------------------------------------------------------ -------------
abort-slave-event-count                                      0
auto-increment-offset                                        1
bind-address                                                 *
character-sets-dir                                           /usr/share/mysql-8.0/charsets/
init-connect
log-error                                                    (No default value)
sql-mode                                                     ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES

To see what values a running MySQL server is using, type
'mysqladmin variables' instead of 'mysqld --verbose --help'.
";

    #[test]
    fn test_parse_rows() {
        let config = parse_defaults(LISTING).unwrap();
        assert_eq!(config.kind(), SourceKind::Defaults);
        assert_eq!(config.len(), 7);
        assert_eq!(config.get("auto_increment_offset"), Some(&ConfigValue::from("1")));
        assert_eq!(config.get("bind_address"), Some(&ConfigValue::from("*")));
        assert_eq!(
            config.get("sql_mode"),
            Some(&ConfigValue::from("ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES"))
        );
    }

    #[test]
    fn test_no_default_value_is_empty() {
        let config = parse_defaults(LISTING).unwrap();
        assert_eq!(config.get("log_error"), Some(&ConfigValue::from("")));
        assert_eq!(config.get("init_connect"), Some(&ConfigValue::from("")));
    }

    #[test]
    fn test_rows_after_blank_line_ignored() {
        let config = parse_defaults(LISTING).unwrap();
        assert!(config.get("To").is_none());
    }

    #[test]
    fn test_listing_without_rows_is_error() {
        let err = parse_defaults("mysqld Ver 8.0\nUsage: mysqld [OPTIONS]\n").unwrap_err();
        assert!(matches!(err, Error::EmptyDefaults { .. }));

        let err = parse_defaults("header\n----- -----\n\nport 3306\n").unwrap_err();
        assert!(matches!(err, Error::EmptyDefaults { .. }));
    }
}
