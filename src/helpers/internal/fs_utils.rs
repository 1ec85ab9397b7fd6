//! Common filesystem utilities
//!
//! Provides shared filesystem operations used by the download and extract helpers.

use crate::error::{AcquireError, Result};
use std::path::{Component, Path, PathBuf};

/// Ensure a directory (and all ancestors) exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| AcquireError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Ensure a file's parent directory exists.
///
/// # Example
/// ```ignore
/// ensure_parent_dir(Path::new("data/Australian-Electrical-Appliances/Televisions.csv"))?;
/// ```
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Expand a glob pattern and return matching paths, sorted.
///
/// Returns an empty Vec if no matches found (doesn't error).
pub fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut matches: Vec<PathBuf> = glob::glob(pattern)
        .map_err(|e| AcquireError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?
        .filter_map(|r| r.ok())
        .collect();
    matches.sort();
    Ok(matches)
}

/// Check if a relative path is safe (no path traversal).
///
/// Rejects absolute paths and paths containing "..".
pub fn is_safe_path(path: &Path) -> bool {
    !path.is_absolute() && !path.components().any(|c| c == Component::ParentDir)
}

/// Move a file or directory into place with a single rename.
pub fn move_into_place(src: &Path, dest: &Path) -> Result<()> {
    std::fs::rename(src, dest).map_err(|e| AcquireError::io(dest, e))
}
