//! Progress logging.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LOGGING_INTERVAL;
use crate::scheduler::ProgressSink;

/// Progress sink that feeds the periodic progress log.
///
/// Verbose detector lines are logged at info level when `verbose` is set,
/// otherwise at debug level.
pub struct LogProgress {
    verbose: bool,
    start: Instant,
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl LogProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            start: Instant::now(),
            completed: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn log_progress(&self) {
        let completed = self.completed();
        let total = self.total.load(Ordering::SeqCst);
        let elapsed_secs = self.elapsed().as_secs_f64();
        let rate = if elapsed_secs > 0.0 {
            completed as f64 / elapsed_secs
        } else {
            0.0
        };
        let percent = if total > 0 {
            completed as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        info!(
            "Processed {}/{} URLs ({:.0}%) in {:.2} seconds (~{:.2} URLs/sec)",
            completed, total, percent, elapsed_secs, rate
        );
    }

    /// Logs progress every `LOGGING_INTERVAL` seconds until `cancel` fires.
    pub fn spawn_periodic(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let progress = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
            // The first tick completes immediately
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => progress.log_progress(),
                    _ = cancel.cancelled() => break,
                }
            }
        })
    }
}

impl ProgressSink for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        let done = self.completed.fetch_max(completed, Ordering::SeqCst).max(completed);
        debug!("Completed {done}/{total}");
    }

    fn on_verbose_line(&self, text: &str) {
        if self.verbose {
            info!("{text}");
        } else {
            debug!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_never_go_back() {
        let progress = LogProgress::new(false);
        progress.on_progress(3, 10);
        progress.on_progress(2, 10);
        assert_eq!(progress.completed(), 3);
        progress.log_progress();
    }

    #[tokio::test]
    async fn test_periodic_task_stops_on_cancel() {
        let progress = Arc::new(LogProgress::new(true));
        let cancel = CancellationToken::new();
        let task = progress.spawn_periodic(cancel.clone());
        progress.on_verbose_line("Running: wappalyzer http://a.com");
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
