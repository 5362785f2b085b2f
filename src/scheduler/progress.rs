//! Progress event sink.

/// Receives scheduler events.
///
/// Purely observational: nothing a sink does can change outcomes. Methods are
/// called from worker tasks, concurrently.
pub trait ProgressSink: Send + Sync {
    /// One more request finished. `completed` counts up to `total`, but calls
    /// from different tasks may arrive out of order.
    fn on_progress(&self, completed: usize, total: usize);

    /// Side-channel output of a detector invocation.
    fn on_verbose_line(&self, _text: &str) {}
}

/// Sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}
