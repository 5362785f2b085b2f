//! mass_detect library: batch technology detection over URL lists
//!
//! This library runs an external technology detector (a Wappalyzer-compatible
//! CLI or lookup API) over many URLs with bounded concurrency, and pivots the
//! results into a URL-by-technology table and its transpose.
//!
//! # Example
//!
//! ```no_run
//! use mass_detect::{run_batch, Config, OutputFormat};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("urls.txt"),
//!     format: OutputFormat::Csv,
//!     max_concurrency: 10,
//!     ..Default::default()
//! };
//!
//! let report = run_batch(config).await?;
//! println!("Processed {} URLs: {} succeeded, {} failed",
//!          report.total_urls, report.successful, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! The pieces are usable on their own: a [`Scheduler`] produces
//! [`DetectionOutcome`]s, [`aggregate`] pivots them and
//! [`export::emit_report`] writes the result.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregate;
pub mod app;
pub mod config;
pub mod detection;
pub mod error_handling;
pub mod export;
pub mod initialization;
mod run;
pub mod scheduler;

// Re-export public API
pub use aggregate::{aggregate, AggregatedReport, PivotByTechnology, PivotByUrl, TechnologyUniverse};
pub use config::{BackendKind, Config, CsvPivot, LogFormat, LogLevel, OutputFormat};
pub use detection::{DetectionBackend, DetectionOutcome, DetectionRequest, DetectorInvoker};
pub use run::{run_batch, BatchReport};
pub use scheduler::{ProgressSink, Scheduler};
