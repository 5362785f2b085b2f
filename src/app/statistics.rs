//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};

/// Logs the non-zero error and info counters.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

/// One-line run summary.
pub fn print_simple_summary(
    total_urls: usize,
    successful: usize,
    failed: usize,
    technologies: usize,
    elapsed_seconds: f64,
) {
    info!(
        "Processed {} URL{} ({} succeeded, {} failed, {} technolog{}) in {:.1}s",
        total_urls,
        if total_urls == 1 { "" } else { "s" },
        successful,
        failed,
        technologies,
        if technologies == 1 { "y" } else { "ies" },
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_no_errors() {
        let stats = ProcessingStats::new();
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_error_statistics_all_types() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::DetectorTimeout);
        stats.increment_error(ErrorType::DetectorTimeout);
        stats.increment_info(InfoType::Redirected);
        print_error_statistics(&stats);
        assert_eq!(stats.total_errors(), 2);
    }

    #[test]
    fn test_print_simple_summary() {
        print_simple_summary(1, 1, 0, 1, 0.5);
        print_simple_summary(0, 0, 0, 0, 0.0);
    }
}
