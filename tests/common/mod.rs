//! Shared fixtures for integration tests.

#![allow(dead_code)]

use datasetup::{AcquireError, Acquirer, Config, Fetcher, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// In-memory network: serves canned bodies and records every URL requested.
///
/// URLs without a canned body are served their own URL as content.
#[derive(Default)]
pub struct FakeNetwork {
    bodies: HashMap<String, Vec<u8>>,
    failing: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetcher for FakeNetwork {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.calls.borrow_mut().push(url.to_string());
        if self.failing.iter().any(|u| u == url) {
            return Err(AcquireError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        let body = self
            .bodies
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.as_bytes().to_vec());
        std::fs::write(dest, &body).map_err(|e| AcquireError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        Ok(body.len() as u64)
    }
}

/// Fresh temp root; the data dir inside it does not exist yet.
pub fn fresh_root() -> (TempDir, PathBuf) {
    let root = TempDir::new().unwrap();
    let data_dir = root.path().join("data");
    (root, data_dir)
}

pub fn acquirer_with<F: Fetcher>(data_dir: &Path, fetcher: F) -> Acquirer<F> {
    let config = Config::new(data_dir).with_progress(false);
    Acquirer::with_fetcher(config, fetcher).unwrap()
}

/// Build a gzip-compressed tarball in memory.
pub fn tar_gz_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Write a tarball to disk.
pub fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
    let bytes = tar_gz_bytes(files);
    let mut file = File::create(path).unwrap();
    std::io::Write::write_all(&mut file, &bytes).unwrap();
}
