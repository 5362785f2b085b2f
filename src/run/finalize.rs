//! Batch finalization: statistics, aggregation and report emission.

use std::time::Instant;

use anyhow::{Context, Result};
use log::warn;

use crate::aggregate::{aggregate, log_universe};
use crate::app::{print_error_statistics, print_simple_summary};
use crate::config::Config;
use crate::detection::DetectionOutcome;
use crate::error_handling::ProcessingStats;
use crate::export::emit_report;

use super::BatchReport;

/// Aggregates `outcomes`, writes the report and builds the [`BatchReport`].
///
/// A run without a single success still writes its report, since the
/// `Urls` column records what was attempted.
pub(super) fn finalize_batch(
    config: &Config,
    outcomes: &[DetectionOutcome],
    stats: &ProcessingStats,
    start_time: Instant,
) -> Result<BatchReport> {
    print_error_statistics(stats);

    let total_urls = outcomes.len();
    let successful = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = total_urls - successful;

    let report = aggregate(outcomes);
    log_universe(&report.universe);
    if successful == 0 && total_urls > 0 {
        warn!("No URL produced a valid detector result");
    }

    let output_path = emit_report(&report, &config.output, config.format, config.csv_pivot)
        .with_context(|| format!("Failed to write report to {}", config.output.display()))?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_simple_summary(
        total_urls,
        successful,
        failed,
        report.universe.len(),
        elapsed_seconds,
    );

    Ok(BatchReport {
        total_urls,
        successful,
        failed,
        technologies: report.universe.len(),
        output_path,
        elapsed_seconds,
    })
}
