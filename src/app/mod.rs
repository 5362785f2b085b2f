//! Application support: URL input, progress logging, shutdown handling and
//! statistics printing.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

pub use logging::LogProgress;
pub use shutdown::{shutdown_gracefully, spawn_interrupt_watcher};
pub use statistics::{print_error_statistics, print_simple_summary};
pub use url::{normalize_target_url, parse_url_lines, read_url_file};
