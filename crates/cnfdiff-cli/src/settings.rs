//! User settings
//!
//! Settings come from `--settings <file>`, else `<config dir>/cnfdiff/config.toml`
//! when it exists, else built-in defaults. Command-line flags override
//! whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cnfdiff_core::SkipPolicy;
use cnfdiff_sources::CnfOptions;
use cnfdiff_sources::cnf::DEFAULT_GROUP;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub output: OutputFormat,
    pub groups: Vec<String>,
    pub normalize_names: bool,
    pub connect_timeout_secs: u64,
    pub policy: PolicySettings,
}

/// The `[policy]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySettings {
    /// Hide keys that only one of two defaults listings knows about
    pub suppress_between_defaults: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            groups: vec![DEFAULT_GROUP.to_string()],
            normalize_names: true,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            policy: PolicySettings::default(),
        }
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            suppress_between_defaults: SkipPolicy::default().suppress_between_defaults,
        }
    }
}

impl Settings {
    /// Location of the per-user settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cnfdiff").join("config.toml"))
    }

    /// Load settings from an explicit file or the per-user default.
    ///
    /// An explicit file must exist; a missing per-user file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = Self::parse(&content).map_err(|e| CliError::Settings {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(output) = cli.output {
            self.output = output;
        }
        if !cli.groups.is_empty() {
            self.groups = cli.groups.clone();
        }
        if cli.keep_names {
            self.normalize_names = false;
        }
        self
    }

    pub fn cnf_options(&self) -> CnfOptions {
        CnfOptions {
            groups: self.groups.clone(),
            normalize_names: self.normalize_names,
        }
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        SkipPolicy {
            suppress_between_defaults: self.policy.suppress_between_defaults,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
