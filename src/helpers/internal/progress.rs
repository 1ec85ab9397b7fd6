//! Unified progress bar helpers
//!
//! Provides consistent progress bar styling for downloads and extraction.

use crate::core::output;
use indicatif::{ProgressBar, ProgressStyle};

const BYTES_TEMPLATE: &str =
    "     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})";

/// Create a download progress indicator.
///
/// Starts as a spinner; call [`upgrade_to_bytes`] once the content length is
/// known. Hidden when `enabled` is false.
pub fn create_download_progress(message: &str, enabled: bool) -> ProgressBar {
    if enabled {
        output::spinner(message)
    } else {
        ProgressBar::hidden()
    }
}

/// Upgrade a spinner to a byte progress bar when content length becomes known.
pub fn upgrade_to_bytes(pb: &ProgressBar, total_bytes: u64) {
    pb.set_length(total_bytes);
    if let Ok(style) = ProgressStyle::default_bar().template(BYTES_TEMPLATE) {
        pb.set_style(style.progress_chars("━╸━"));
    }
}

/// RAII guard that clears a progress bar when dropped.
///
/// Keeps bars from lingering on screen when a download fails halfway.
pub struct ProgressGuard<'a>(&'a ProgressBar);

impl<'a> ProgressGuard<'a> {
    pub fn new(pb: &'a ProgressBar) -> Self {
        Self(pb)
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
