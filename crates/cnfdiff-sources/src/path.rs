//! Path helpers shared by the file readers

use std::path::{Path, PathBuf};

/// Expand a leading `~/` to the current user's home directory.
///
/// Paths without the prefix, and all paths when no home directory is known,
/// are returned unchanged.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
