//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for detection, initialization and emission
//! - The per-URL failure taxonomy (`ErrorType`) used for statistics
//! - Thread-safe processing statistics
//!
//! Per-URL failures are data: they become `Failure` outcomes and are counted
//! here. Only initialization and emission errors end a run.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{DetectionError, EmissionError, ErrorType, InfoType, InitializationError};
