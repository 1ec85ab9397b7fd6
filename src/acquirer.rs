//! Idempotent fetch-or-skip acquisition
//!
//! [`Acquirer::fetch`] drives every dataset through the same steps:
//!
//! 1. resolve each resource's destination under the data directory
//! 2. skip resources already present, download the rest
//! 3. unpack the archive once, if the spec asks for it and its marker is absent
//! 4. return the artifact paths
//!
//! The presence of a file is the only cache signal. Downloads and extraction
//! only ever create their final path once complete, so presence implies a
//! finished artifact.

use crate::catalog::{self, ArtifactSelector, DatasetSpec, Resource};
use crate::core::config::Config;
use crate::core::lock;
use crate::core::output;
use crate::error::{AcquireError, Result};
use crate::helpers::download::{Fetcher, HttpFetcher};
use crate::helpers::extract;
use crate::helpers::internal::fs_utils;
use std::path::{Path, PathBuf};

/// Paths known to exist after a fetch returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    paths: Vec<PathBuf>,
}

impl LocalArtifact {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The first path, for single-file datasets
    pub fn path(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

/// Fetches catalog datasets into one data directory.
pub struct Acquirer<F = HttpFetcher> {
    data_dir: PathBuf,
    fetcher: F,
}

impl Acquirer<HttpFetcher> {
    /// Acquirer backed by the blocking HTTP client.
    ///
    /// Creates the data directory if it does not exist yet.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.http_timeout, config.show_progress);
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: Fetcher> Acquirer<F> {
    /// Acquirer with a custom network layer.
    pub fn with_fetcher(config: Config, fetcher: F) -> Result<Self> {
        fs_utils::ensure_dir(&config.data_dir)?;
        Ok(Self {
            data_dir: config.data_dir,
            fetcher,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Destination of a resource under the data directory
    pub fn resource_path(&self, resource: &Resource) -> PathBuf {
        self.data_dir.join(resource.file)
    }

    /// True when every resource of the spec is present and, for archives,
    /// the extraction marker exists.
    pub fn is_present(&self, spec: &DatasetSpec) -> bool {
        spec.is_present_in(&self.data_dir)
    }

    /// Make a dataset available locally and return its paths.
    pub fn fetch(&self, spec: &DatasetSpec) -> Result<LocalArtifact> {
        if spec.announce {
            output::info(spec.title);
            for line in spec.description.lines() {
                output::detail(line);
            }
        }

        let mut downloaded = Vec::with_capacity(spec.resources.len());
        for resource in spec.resources {
            downloaded.push(self.fetch_resource(resource)?);
        }

        match spec.extract_marker {
            Some(marker) if spec.extracts() => {
                for archive in &downloaded {
                    self.unpack_once(spec, archive, marker)?;
                }
            }
            _ => {}
        }

        let paths = match spec.artifact {
            ArtifactSelector::Resources => downloaded,
            ArtifactSelector::Glob(pattern) => {
                // The data dir is a literal prefix; only the dataset's own pattern is a glob.
                let base = glob::Pattern::escape(&self.data_dir.to_string_lossy());
                let pattern = Path::new(&base).join(pattern);
                fs_utils::glob_paths(&pattern.to_string_lossy())?
            }
        };

        output::success(&format!("{} ready", spec.name));
        Ok(LocalArtifact::new(paths))
    }

    /// Fetch a catalog dataset by name.
    pub fn fetch_by_name(&self, name: &str) -> Result<LocalArtifact> {
        let spec =
            catalog::find(name).ok_or_else(|| AcquireError::UnknownDataset(name.to_string()))?;
        self.fetch(spec)
    }

    /// Household power consumption zip (left packed)
    pub fn electricity_consumption(&self) -> Result<PathBuf> {
        self.fetch_single(&catalog::ELECTRICITY)
    }

    /// The seven appliance CSVs, in catalog order
    pub fn appliances(&self) -> Result<Vec<PathBuf>> {
        self.fetch(&catalog::APPLIANCES).map(LocalArtifact::into_paths)
    }

    /// Yearly flight CSVs from the extracted archive
    pub fn flights(&self) -> Result<Vec<PathBuf>> {
        self.fetch(&catalog::FLIGHTS).map(LocalArtifact::into_paths)
    }

    pub fn waves(&self) -> Result<PathBuf> {
        self.fetch_single(&catalog::WAVES)
    }

    fn fetch_single(&self, spec: &DatasetSpec) -> Result<PathBuf> {
        let artifact = self.fetch(spec)?;
        artifact
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| AcquireError::EmptyArtifact(spec.name.to_string()))
    }

    fn fetch_resource(&self, resource: &Resource) -> Result<PathBuf> {
        let dest = self.resource_path(resource);

        if dest.exists() {
            output::skip(&format!("{} already present, skipping", resource.file));
            return Ok(dest);
        }

        fs_utils::ensure_parent_dir(&dest)?;
        let _lock = lock::acquire_dest_lock(&dest)?;

        // Another process may have finished between the check and the lock.
        if dest.exists() {
            output::skip(&format!("{} already present, skipping", resource.file));
            return Ok(dest);
        }

        output::action(&format!("Downloading {}", resource.name));
        output::detail(resource.url);
        self.fetcher.fetch(resource.url, &dest)?;

        Ok(dest)
    }

    fn unpack_once(&self, spec: &DatasetSpec, archive: &Path, marker: &str) -> Result<()> {
        let marker_path = self.data_dir.join(marker);
        if marker_path.exists() {
            return Ok(());
        }

        let _lock = lock::acquire_dest_lock(&marker_path)?;
        if marker_path.exists() {
            return Ok(());
        }

        output::action(&format!("Extracting {}", spec.name));
        extract::unpack_into(spec.archive, archive, &self.data_dir, marker)
    }
}
