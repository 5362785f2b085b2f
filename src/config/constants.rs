//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, concurrency defaults and detector command defaults.

use std::time::Duration;

/// Default number of detector invocations allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Per-URL timeout for a single detector invocation.
///
/// Headless-browser detectors can take several minutes on heavy pages.
/// Override with `--timeout-seconds`.
pub const DEFAULT_DETECTION_TIMEOUT: Duration = Duration::from_secs(500);

/// Interval between periodic progress log lines, in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Default output file stem. The format extension is appended automatically.
pub const DEFAULT_OUTPUT_FILE: &str = "WappalyzerResults";

/// Default detector command (split with shell-word rules before use).
pub const DEFAULT_DETECTOR_COMMAND: &str = "docker run --rm wappalyzer/cli";

/// Default extra arguments appended after the URL on the detector command line.
///
/// Includes a desktop Chrome User-Agent so sites serve their regular markup.
pub const DEFAULT_DETECTOR_ARGS: &str = concat!(
    "--pretty --probe --user-agent=\"",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.83 Safari/537.36",
    "\""
);

/// Default lookup endpoint for the HTTP API backend.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.wappalyzer.com/v2/lookup/";

/// Header carrying the API key for the HTTP API backend.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Scheme prepended to input lines that carry none.
pub const DEFAULT_URL_SCHEME: &str = "http://";

/// Prefixes marking comment lines in the input file.
pub const COMMENT_PREFIXES: &[char] = &['#', ';'];

/// Column header holding the URL as it was read from the input file.
pub const URLS_COLUMN: &str = "Urls";

/// Column header holding the final URL after redirects.
pub const LAST_URL_COLUMN: &str = "Last_Url";

/// First column header of the technology-by-URL pivot.
pub const TECHNOLOGY_COLUMN: &str = "Technology";

/// Separator between rendered technology attributes.
pub const ATTRIBUTE_SEPARATOR: &str = "; ";

/// Cell text for a technology that was detected without any attributes.
pub const DETECTED_MARKER: &str = "detected";
