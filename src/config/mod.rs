//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, defaults, limits)
//! - The library `Config` struct and the value enums used by the CLI

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{BackendKind, Config, CsvPivot, LogFormat, LogLevel, OutputFormat};
