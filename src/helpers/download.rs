//! Download helpers for acquiring dataset files
//!
//! The [`Fetcher`] trait is the only place the acquirer touches the network.
//! [`HttpFetcher`] is the real implementation; tests substitute their own.
//!
//! Downloads stream into a temporary file next to the destination and are
//! renamed into place only after the whole body has been written, so a file
//! at the destination path is always complete.

use crate::core::output;
use crate::error::{AcquireError, Result};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use super::internal::fs_utils;
use super::internal::progress::{self, ProgressGuard, upgrade_to_bytes};

/// Retrieves a remote resource into a local file.
pub trait Fetcher {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// On error `dest` must not exist afterwards.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        (**self).fetch(url, dest)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        (**self).fetch(url, dest)
    }
}

/// Blocking HTTP(S) GET via ureq.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, show_progress: bool) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            show_progress,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        fs_utils::ensure_parent_dir(dest)?;

        let filename = dest
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "download".to_string());

        let total_bytes = self.download_with_progress(url, dest, &filename)?;
        output::detail(&format!("downloaded {} ({} bytes)", filename, total_bytes));

        Ok(total_bytes)
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

impl HttpFetcher {
    fn download_with_progress(&self, url: &str, dest: &Path, filename: &str) -> Result<u64> {
        let pb = progress::create_download_progress(
            &format!("downloading {}", filename),
            self.show_progress && !output::is_quiet(),
        );
        let _guard = ProgressGuard::new(&pb);

        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => AcquireError::Http {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(t) => AcquireError::Network {
                url: url.to_string(),
                message: t.to_string(),
            },
        })?;

        if let Some(len) = response
            .header("content-length")
            .and_then(|s| s.parse().ok())
        {
            upgrade_to_bytes(&pb, len);
        }

        // Same directory as the destination so the final rename stays on one filesystem.
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", filename))
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| AcquireError::io(dir, e))?;

        let mut reader = response.into_reader();
        let mut buffer = [0u8; 8192];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(|e| AcquireError::Network {
                url: url.to_string(),
                message: format!("read error: {}", e),
            })?;

            if bytes_read == 0 {
                break;
            }

            tmp.write_all(&buffer[..bytes_read])
                .map_err(|e| AcquireError::io(tmp.path(), e))?;

            total_bytes += bytes_read as u64;
            pb.set_position(total_bytes);
        }

        tmp.as_file()
            .sync_all()
            .map_err(|e| AcquireError::io(tmp.path(), e))?;
        tmp.persist(dest)
            .map_err(|e| AcquireError::io(dest, e.error))?;

        Ok(total_bytes)
    }
}
