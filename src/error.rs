//! Acquisition error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or unpacking a dataset.
///
/// Every variant is fatal to the fetch call that produced it; nothing is
/// retried or downgraded to a warning.
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download of {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    #[error("download of {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("archive {archive} did not contain expected directory '{marker}'")]
    MissingMarker { archive: PathBuf, marker: String },

    #[error("'{}' is already being fetched by another process; if this is incorrect, delete '{}'", .path.display(), .lock.display())]
    Locked { path: PathBuf, lock: PathBuf },

    #[error("unknown dataset '{0}' (run `datasetup list` to see available datasets)")]
    UnknownDataset(String),

    #[error("dataset '{0}' produced no files")]
    EmptyArtifact(String),

    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl AcquireError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn extract(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extract {
            archive: archive.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AcquireError>;
