//! Destination lock management
//!
//! Provides exclusive locking so two processes never fetch or unpack into
//! the same destination at once.

use crate::error::{AcquireError, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// How old a lock file can be before it's considered stale (2 hours)
const STALE_LOCK_AGE_SECS: u64 = 7200;

/// Lock file path for a destination: `<dest>.lock`
pub fn lock_path_for(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn is_stale_lock(lock_path: &Path) -> bool {
    std::fs::metadata(lock_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| std::time::SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age.as_secs() > STALE_LOCK_AGE_SECS)
}

/// Acquire an exclusive lock on a destination path.
/// Returns a guard that releases the lock when dropped.
pub fn acquire_dest_lock(dest: &Path) -> Result<DestLock> {
    let lock_path = lock_path_for(dest);

    if lock_path.exists() && is_stale_lock(&lock_path) {
        let _ = std::fs::remove_file(&lock_path);
    }

    let lock_file = File::create(&lock_path).map_err(|e| AcquireError::io(&lock_path, e))?;

    if lock_file.try_lock_exclusive().is_err() {
        return Err(AcquireError::Locked {
            path: dest.to_path_buf(),
            lock: lock_path,
        });
    }

    Ok(DestLock {
        _file: lock_file,
        path: lock_path,
    })
}

/// RAII guard for a destination lock - releases lock and deletes lock file when dropped
#[derive(Debug)]
pub struct DestLock {
    _file: File,
    path: PathBuf,
}

impl Drop for DestLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
