//! End-to-end batch run: read URLs, detect, aggregate, emit.

mod finalize;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::app::{read_url_file, shutdown_gracefully, spawn_interrupt_watcher, LogProgress};
use crate::config::Config;
use crate::detection::DetectorInvoker;
use crate::error_handling::ProcessingStats;
use crate::export::ReportTarget;
use crate::initialization::init_backend;
use crate::scheduler::Scheduler;

use finalize::finalize_batch;

/// Results of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of URLs read from the input file
    pub total_urls: usize,
    /// URLs the detector answered for
    pub successful: usize,
    /// URLs that failed, timed out or were cancelled
    pub failed: usize,
    /// Distinct technologies across all successes
    pub technologies: usize,
    /// Where the report was written
    pub output_path: ReportTarget,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs the detector over every URL in `config.file` and writes the report.
///
/// Per-URL failures never abort the run. A Ctrl-C stops dispatching new URLs,
/// and the report is written with whatever finished. Further Ctrl-Cs are
/// ignored until the report is written.
///
/// # Errors
///
/// Returns an error if the input file cannot be read, the backend cannot be
/// initialized, or the report cannot be written.
pub async fn run_batch(config: Config) -> Result<BatchReport> {
    let start_time = Instant::now();

    let requests = read_url_file(&config.file)
        .await
        .with_context(|| format!("Failed to read URL list {}", config.file.display()))?;
    let total_urls = requests.len();
    info!(
        "Loaded {} URL{} from {}",
        total_urls,
        if total_urls == 1 { "" } else { "s" },
        config.file.display()
    );

    let backend = init_backend(&config)
        .await
        .context("Failed to initialize detection backend")?;
    let invoker = DetectorInvoker::new(backend, config.detection_timeout());

    let interrupt = CancellationToken::new();
    let stop = CancellationToken::new();
    let stats = Arc::new(ProcessingStats::new());
    let progress = Arc::new(LogProgress::new(config.verbose));
    let background = vec![
        spawn_interrupt_watcher(interrupt.clone(), stop.clone()),
        progress.spawn_periodic(stop.clone()),
    ];

    let scheduler = Scheduler::new(invoker, config.concurrency())
        .with_progress(progress.clone())
        .with_stats(Arc::clone(&stats))
        .with_cancellation(interrupt);
    info!(
        "Running up to {} detector invocation{} at a time",
        scheduler.concurrency(),
        if scheduler.concurrency() == 1 { "" } else { "s" }
    );

    let outcomes = scheduler.run_all(requests).await;

    shutdown_gracefully(stop, background).await;
    progress.log_progress();

    finalize_batch(&config, &outcomes, &stats, start_time)
}
