//! Colored output and progress reporting for datasetup
//!
//! Uses owo-colors for terminal colors and indicatif for progress bars.
//! Everything written to stdout can be silenced with [`set_quiet`]; errors
//! always go to stderr.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress stdout notes and progress bars for the rest of the process.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print an action header (blue, bold)
/// Example: "==> Fetching flights"
pub fn action(message: &str) {
    if !is_quiet() {
        println!("{} {}", "==>".blue().bold(), message.bold());
    }
}

/// Print an action with a counter (cyan)
/// Example: "(1/3) Fetching waves"
pub fn action_numbered(current: usize, total: usize, message: &str) {
    if !is_quiet() {
        println!(
            "{} {}",
            format!("({}/{})", current, total).cyan(),
            message.bold()
        );
    }
}

/// Print a detail line (dimmed prefix)
/// Example: "     downloaded waves.csv (1024 bytes)"
pub fn detail(message: &str) {
    if !is_quiet() {
        println!("     {}", message.dimmed());
    }
}

/// Print a success message (green)
pub fn success(message: &str) {
    if !is_quiet() {
        println!("{} {}", "==>".green().bold(), message.green());
    }
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    if !is_quiet() {
        println!("{} {}", "::".cyan(), message);
    }
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Print a skip message (dimmed)
/// Example: "==> waves.csv already present, skipping"
pub fn skip(message: &str) {
    if !is_quiet() {
        println!("{} {}", "==>".dimmed(), message.dimmed());
    }
}

/// Print a catalog entry in list output
pub fn list_item(name: &str, status: &str, is_present: bool) {
    if is_present {
        println!("  {} {}", name.green(), status.dimmed());
    } else {
        println!("  {} {}", name, status.dimmed());
    }
}

/// Create a simple spinner for operations.
///
/// Returns a hidden bar when output is quiet so callers never branch.
pub fn spinner(message: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("     {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a progress bar and clear it
pub fn progress_done(pb: ProgressBar) {
    pb.finish_and_clear();
}
