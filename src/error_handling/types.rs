//! Error type definitions.
//!
//! This module defines the error, failure and info types used throughout the application.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
///
/// All of these are systemic: they are reported before any URL is dispatched
/// and end the run.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The detector command could not be split into words.
    #[error("Invalid detector command line: {0}")]
    InvalidCommand(String),

    /// The detector program is not installed or not executable.
    #[error("Detector '{program}' is not available: {reason}")]
    BackendUnavailable {
        /// Program or endpoint that was looked up
        program: String,
        /// Why it is considered unavailable
        reason: String,
    },

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The API endpoint is not a valid http(s) URL.
    #[error("Invalid API endpoint '{0}'")]
    InvalidEndpoint(String),
}

/// Failure of a single detector invocation.
///
/// Never escalated: the invoker turns every variant into a `Failure` outcome.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The detector process could not be started.
    #[error("failed to launch detector: {0}")]
    Spawn(#[source] std::io::Error),

    /// The invocation exceeded its per-URL timeout.
    #[error("detection timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The detector exited unsuccessfully.
    #[error("detector failed (exit code {}):\n{output}", exit_code_label(.code))]
    NonZeroExit {
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured stdout and stderr
        output: String,
    },

    /// The detector answered with something that is not a recognised result.
    #[error("malformed detector response: {0}")]
    Malformed(String),

    /// The lookup request failed at the transport level.
    #[error("lookup request failed: {0}")]
    Http(#[from] ReqwestError),

    /// The lookup API answered with a non-success status.
    #[error("lookup API returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// The run was interrupted before this URL completed.
    #[error("cancelled")]
    Cancelled,

    /// The task running the invocation panicked.
    #[error("detection task panicked: {0}")]
    TaskPanicked(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl DetectionError {
    /// Statistics bucket for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            DetectionError::Spawn(_) => ErrorType::DetectorLaunch,
            DetectionError::Timeout(_) => ErrorType::DetectorTimeout,
            DetectionError::NonZeroExit { .. } => ErrorType::DetectorExitStatus,
            DetectionError::Malformed(_) => ErrorType::MalformedResponse,
            DetectionError::Http(_) => ErrorType::LookupRequest,
            DetectionError::HttpStatus { .. } => ErrorType::LookupStatus,
            DetectionError::Cancelled => ErrorType::Cancelled,
            DetectionError::TaskPanicked(_) => ErrorType::TaskPanicked,
        }
    }
}

/// Error types for writing reports.
#[derive(Error, Debug)]
pub enum EmissionError {
    /// Filesystem error creating or writing the report.
    #[error("I/O error writing report: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet writer error.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Categories of per-URL failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    DetectorLaunch,
    DetectorTimeout,
    DetectorExitStatus,
    MalformedResponse,
    LookupRequest,
    LookupStatus,
    Cancelled,
    TaskPanicked,
}

/// Notable events on successful detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Final URL differs from the requested one
    Redirected,
    /// Detector succeeded but found nothing
    NoTechnologies,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DetectorLaunch => "Detector launch error",
            ErrorType::DetectorTimeout => "Detector timeout",
            ErrorType::DetectorExitStatus => "Detector non-zero exit",
            ErrorType::MalformedResponse => "Malformed detector response",
            ErrorType::LookupRequest => "Lookup request error",
            ErrorType::LookupStatus => "Lookup HTTP status error",
            ErrorType::Cancelled => "Cancelled",
            ErrorType::TaskPanicked => "Task panicked",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::Redirected => "Redirected",
            InfoType::NoTechnologies => "No technologies detected",
        }
    }
}
