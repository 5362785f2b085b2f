//! Bounded, order-preserving batch execution.
//!
//! Every request is dispatched as its own Tokio task once it holds a
//! concurrency permit. Tasks carry the index of their request, so outcomes
//! land in input order no matter when they complete.

mod progress;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::detection::{DetectionOutcome, DetectionRequest, DetectorInvoker, Invocation};
use crate::error_handling::{DetectionError, ErrorType, InfoType, ProcessingStats};
use crate::initialization::init_semaphore;

pub use progress::{NoProgress, ProgressSink};

/// Runs detector invocations with at most `concurrency` in flight.
pub struct Scheduler {
    invoker: Arc<DetectorInvoker>,
    concurrency: usize,
    sink: Arc<dyn ProgressSink>,
    stats: Arc<ProcessingStats>,
    cancel: CancellationToken,
}

impl Scheduler {
    /// Creates a scheduler. A `concurrency` of 0 is treated as 1.
    pub fn new(invoker: DetectorInvoker, concurrency: usize) -> Self {
        Self {
            invoker: Arc::new(invoker),
            concurrency: concurrency.max(1),
            sink: Arc::new(NoProgress),
            stats: Arc::new(ProcessingStats::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_stats(mut self, stats: Arc<ProcessingStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Token that aborts the run: no new request is admitted and in-flight
    /// invocations are abandoned. Abandoned requests become
    /// `Failure{"cancelled"}` outcomes.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    /// Runs every request and returns one outcome per request, in input order.
    ///
    /// Never fails: per-URL errors, panics inside a task and cancellation all
    /// become `Failure` outcomes.
    pub async fn run_all(&self, requests: Vec<DetectionRequest>) -> Vec<DetectionOutcome> {
        let total = requests.len();
        let urls: Vec<String> = requests.iter().map(|r| r.url.clone()).collect();
        let mut slots: Vec<Option<DetectionOutcome>> = (0..total).map(|_| None).collect();

        let semaphore = init_semaphore(self.concurrency);
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks = FuturesUnordered::new();
        let mut abandoned = Vec::new();

        let mut pending = requests.into_iter().enumerate();
        for (index, request) in pending.by_ref() {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                abandoned.push((index, request));
                break;
            };

            let invoker = Arc::clone(&self.invoker);
            let sink = Arc::clone(&self.sink);
            let stats = Arc::clone(&self.stats);
            let completed = Arc::clone(&completed);
            let cancel = self.cancel.clone();

            let handle = tokio::spawn(async move {
                // Held until the outcome is recorded, so progress is reported
                // before the next request can take this slot.
                let _permit = permit;

                let invocation = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        Invocation::failed(&request, &DetectionError::Cancelled, Vec::new())
                    }
                    invoked = AssertUnwindSafe(invoker.invoke(&request)).catch_unwind() => {
                        invoked.unwrap_or_else(|panic| {
                            let error = DetectionError::TaskPanicked(panic_message(panic.as_ref()));
                            Invocation::failed(&request, &error, Vec::new())
                        })
                    }
                };

                for line in &invocation.diagnostics {
                    sink.on_verbose_line(line);
                }
                record_invocation(&stats, &request, &invocation);

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                sink.on_progress(done, total);
                invocation.outcome
            });

            tasks.push(async move { (index, handle.await) });
        }
        abandoned.extend(pending);

        while let Some((index, joined)) = tasks.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    warn!("Detection task for {} panicked: {:?}", urls[index], join_error);
                    self.stats.increment_error(ErrorType::TaskPanicked);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.sink.on_progress(done, total);
                    DetectionOutcome::failure(
                        &urls[index],
                        DetectionError::TaskPanicked(join_error.to_string()).to_string(),
                    )
                }
            };
            slots[index] = Some(outcome);
        }

        if !abandoned.is_empty() {
            warn!(
                "Run interrupted: {} URL{} not started",
                abandoned.len(),
                if abandoned.len() == 1 { "" } else { "s" }
            );
        }
        for (index, request) in abandoned {
            self.stats.increment_error(ErrorType::Cancelled);
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            self.sink.on_progress(done, total);
            slots[index] = Some(DetectionOutcome::failure(
                request.url,
                DetectionError::Cancelled.to_string(),
            ));
        }

        slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    DetectionOutcome::failure(url, DetectionError::Cancelled.to_string())
                })
            })
            .collect()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn record_invocation(stats: &ProcessingStats, request: &DetectionRequest, invocation: &Invocation) {
    if let Some(error_type) = invocation.error_type {
        stats.increment_error(error_type);
    }

    match &invocation.outcome {
        DetectionOutcome::Failure { error_detail, .. } => {
            warn!("Failed to analyze {}: {}", request.url, error_detail);
        }
        DetectionOutcome::Success {
            technologies,
            final_url,
            visited,
            ..
        } => {
            if technologies.is_empty() {
                stats.increment_info(InfoType::NoTechnologies);
            }
            if visited.len() > 1
                || final_url.trim_end_matches('/') != request.target_url().trim_end_matches('/')
            {
                stats.increment_info(InfoType::Redirected);
                debug!(
                    "{} redirected to {} ({} hop{})",
                    request.url,
                    final_url,
                    visited.len(),
                    if visited.len() == 1 { "" } else { "s" }
                );
            }
        }
    }
}
