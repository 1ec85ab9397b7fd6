//! Core infrastructure for dataset acquisition
//!
//! Configuration, destination locking and console output.

pub mod config;
pub mod lock;
pub mod output;
