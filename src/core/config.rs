//! Acquirer configuration
//!
//! All settings are explicit values handed to [`crate::Acquirer`] at
//! construction time. There is no config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const MIN_HTTP_TIMEOUT_SECS: u64 = 5;
const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root under which every dataset artifact is stored
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    /// Draw indicatif progress bars while downloading and extracting
    pub show_progress: bool,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            show_progress: true,
        }
    }

    /// Set the HTTP timeout, clamped to 5-300 seconds.
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout =
            Duration::from_secs(secs.clamp(MIN_HTTP_TIMEOUT_SECS, MAX_HTTP_TIMEOUT_SECS));
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
