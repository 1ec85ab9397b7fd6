//! Idempotent fetch-or-skip acquisition of public sample datasets
//!
//! Each dataset is a static [`DatasetSpec`] in the [`catalog`]. Fetching one
//! checks whether its files already exist under the data directory, downloads
//! whatever is missing, unpacks archives once, and returns the local paths.
//! After the first successful fetch, later fetches touch no network.
//!
//! # Example
//!
//! ```no_run
//! use datasetup::{Acquirer, Config};
//!
//! let acquirer = Acquirer::new(Config::new("data"))?;
//! let csvs = acquirer.flights()?;
//! println!("{} flight files", csvs.len());
//! # Ok::<(), datasetup::AcquireError>(())
//! ```
//!
//! # Datasets
//!
//! - `electricity` - household power consumption zip (not unpacked)
//! - `appliances` - seven Australian appliance rating CSVs
//! - `flights` - NYC flights tarball, unpacked, returns the yearly CSVs
//! - `waves` - Mooloolaba wave buoy CSV

pub mod acquirer;
pub mod catalog;
pub mod core;
pub mod error;
pub mod helpers;

pub use acquirer::{Acquirer, LocalArtifact};
pub use catalog::{ArchiveKind, ArtifactSelector, DatasetSpec, Resource};
pub use crate::core::config::Config;
pub use crate::core::output;
pub use error::{AcquireError, Result};
pub use helpers::download::{Fetcher, HttpFetcher};
