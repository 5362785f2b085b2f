//! Configuration types and CLI value enums.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and library configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_API_ENDPOINT, DEFAULT_DETECTION_TIMEOUT, DEFAULT_DETECTOR_ARGS,
    DEFAULT_DETECTOR_COMMAND, DEFAULT_MAX_CONCURRENCY, DEFAULT_OUTPUT_FILE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which detection strategy is used for every URL of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Spawn the detector command once per URL and parse its stdout
    Process,
    /// Query a Wappalyzer-compatible HTTP lookup API
    Api,
}

/// Report file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Spreadsheet with one sheet per pivot
    Xlsx,
    /// One pivot as comma-separated values
    Csv,
    /// Both pivots and the technology list
    Json,
}

impl OutputFormat {
    /// File extension (without the dot) for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Which pivot a CSV report serializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CsvPivot {
    /// One row per URL, one column per technology
    Url,
    /// One row per technology, one column per URL
    Technology,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use mass_detect::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("urls.txt"),
///     max_concurrency: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read URLs from (one per line)
    pub file: PathBuf,

    /// Output file; the format extension is appended when missing
    pub output: PathBuf,

    /// Report format
    pub format: OutputFormat,

    /// Pivot written by the CSV emitter
    pub csv_pivot: CsvPivot,

    /// Detection strategy
    pub backend: BackendKind,

    /// Detector command line (process backend)
    pub detector_command: String,

    /// Extra detector arguments, passed through verbatim
    pub detector_args: String,

    /// Lookup endpoint (API backend)
    pub api_endpoint: String,

    /// API key sent with every lookup (API backend)
    pub api_key: Option<String>,

    /// Maximum detector invocations in flight
    pub max_concurrency: usize,

    /// Per-URL timeout in seconds
    pub timeout_seconds: u64,

    /// Forward detector side-channel output and the command lines being run
    pub verbose: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Per-URL timeout as a `Duration`, never below one second.
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    /// Concurrency limit, never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urls.txt"),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            format: OutputFormat::Xlsx,
            csv_pivot: CsvPivot::Url,
            backend: BackendKind::Process,
            detector_command: DEFAULT_DETECTOR_COMMAND.to_string(),
            detector_args: DEFAULT_DETECTOR_ARGS.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_key: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_DETECTION_TIMEOUT.as_secs(),
            verbose: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Xlsx.extension(), "xlsx");
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.timeout_seconds, 500);
        assert_eq!(config.format, OutputFormat::Xlsx);
        assert_eq!(config.backend, BackendKind::Process);
        assert_eq!(config.csv_pivot, CsvPivot::Url);
        assert_eq!(config.output, PathBuf::from("WappalyzerResults"));
        assert!(config.detector_args.starts_with("--pretty --probe"));
        assert!(!config.verbose);
    }

    #[test]
    fn test_concurrency_never_zero() {
        let config = Config {
            max_concurrency: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn test_timeout_never_zero() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(config.detection_timeout(), Duration::from_secs(1));
    }
}
