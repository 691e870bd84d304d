//! MySQL option file reader
//!
//! Reads `my.cnf` style files into a [`SourceKind::File`] snapshot. Only the
//! configured option groups are collected (by default `[mysqld]`), later
//! assignments override earlier ones, and `!include` / `!includedir`
//! directives are followed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cnfdiff_core::{CanonicalConfig, ConfigValue, SourceKind};
use tracing::debug;

use crate::error::{Error, Result};
use crate::path::expand_home;

/// Maximum nesting of `!include` / `!includedir` directives
pub const MAX_INCLUDE_DEPTH: usize = 8;

/// Group read when none is configured
pub const DEFAULT_GROUP: &str = "mysqld";

/// Options controlling how option files are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfOptions {
    /// Option groups to collect, compared case-insensitively
    pub groups: Vec<String>,
    /// Spell names the way the server reports them: `-` becomes `_` and a
    /// `loose_` prefix is dropped
    pub normalize_names: bool,
}

impl Default for CnfOptions {
    fn default() -> Self {
        Self {
            groups: vec![DEFAULT_GROUP.to_string()],
            normalize_names: true,
        }
    }
}

impl CnfOptions {
    fn wants_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }
}

/// Read an option file and everything it includes.
pub fn read_cnf(path: impl AsRef<Path>, options: &CnfOptions) -> Result<CanonicalConfig> {
    let path = expand_home(path);
    let mut reader = OptionFileReader::new(options);
    reader.load_file(&path, 0)?;

    debug!(
        path = %path.display(),
        entries = reader.entries.len(),
        "Loaded option file"
    );

    Ok(CanonicalConfig::new(SourceKind::File, reader.entries)
        .with_origin(path.display().to_string()))
}

/// Parse option file content.
///
/// Relative include paths resolve against the current directory.
pub fn parse_cnf(source: &str, options: &CnfOptions) -> Result<CanonicalConfig> {
    let mut reader = OptionFileReader::new(options);
    reader.parse(source, Path::new("-"), Path::new("."), 0)?;
    Ok(CanonicalConfig::new(SourceKind::File, reader.entries))
}

struct OptionFileReader<'a> {
    options: &'a CnfOptions,
    entries: BTreeMap<String, ConfigValue>,
}

impl<'a> OptionFileReader<'a> {
    fn new(options: &'a CnfOptions) -> Self {
        Self {
            options,
            entries: BTreeMap::new(),
        }
    }

    fn load_file(&mut self, path: &Path, depth: usize) -> Result<()> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(Error::IncludeDepth {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        self.parse(&content, path, base_dir, depth)
    }

    /// Load every `*.cnf` file of a directory in name order
    fn load_dir(&mut self, dir: &Path, depth: usize) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| Error::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "cnf"))
            .collect();
        files.sort();

        debug!(dir = %dir.display(), files = files.len(), "Following !includedir");
        for file in files {
            self.load_file(&file, depth)?;
        }
        Ok(())
    }

    fn parse(
        &mut self,
        content: &str,
        origin: &Path,
        base_dir: &Path,
        depth: usize,
    ) -> Result<()> {
        let mut in_wanted_group = false;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let line = strip_comment(line);

            if let Some(directive) = line.strip_prefix('!') {
                let (name, arg) = directive
                    .split_once(char::is_whitespace)
                    .map(|(n, a)| (n, a.trim()))
                    .unwrap_or((directive, ""));
                if arg.is_empty() {
                    return Err(Error::parse(origin, line_no, format!("!{name} needs a path")));
                }
                let target = resolve(base_dir, arg);
                match name {
                    "include" => self.load_file(&target, depth + 1)?,
                    "includedir" => self.load_dir(&target, depth + 1)?,
                    _ => {
                        return Err(Error::parse(
                            origin,
                            line_no,
                            format!("unknown directive !{name}"),
                        ));
                    }
                }
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(group) = header.strip_suffix(']') else {
                    return Err(Error::parse(origin, line_no, "unterminated group header"));
                };
                in_wanted_group = self.options.wants_group(group.trim());
                continue;
            }

            if !in_wanted_group {
                continue;
            }

            let (name, value) = match line.split_once('=') {
                Some((name, value)) => (name.trim(), ConfigValue::from(unquote(value.trim()))),
                None => (line, ConfigValue::Bool(true)),
            };
            if name.is_empty() {
                return Err(Error::parse(origin, line_no, "option without a name"));
            }

            let name = if self.options.normalize_names {
                normalize_name(name)
            } else {
                name.to_string()
            };
            self.entries.insert(name, value);
        }

        Ok(())
    }
}

fn resolve(base_dir: &Path, target: &str) -> PathBuf {
    let target = expand_home(target);
    if target.is_absolute() {
        target
    } else {
        base_dir.join(target)
    }
}

/// Cut a `#` comment that is not inside quotes
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            ('#', None) => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn normalize_name(name: &str) -> String {
    let name = name.replace('-', "_");
    if let Some(stripped) = name.strip_prefix("loose_").filter(|s| !s.is_empty()) {
        return stripped.to_string();
    }
    name
}
