//! Acquisition helpers
//!
//! - **download**: the [`download::Fetcher`] network seam and its HTTP implementation
//! - **extract**: native tar.gz / zip extraction with staged, marker-last placement

pub mod download;
pub mod extract;
pub mod internal;
