//! Pluggable detection backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::error_handling::{DetectionError, InitializationError};

/// A strategy for detecting the technologies of one URL.
///
/// Implementations are selected once from configuration; everything
/// downstream of [`crate::detection::normalize`] is backend-agnostic.
#[async_trait]
pub trait DetectionBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks that the backend can run at all.
    ///
    /// Called once before any URL is dispatched. An error here is systemic
    /// and ends the run.
    async fn preflight(&self) -> Result<(), InitializationError>;

    /// Runs detection for `target_url` and returns the raw JSON payload.
    ///
    /// Side-channel output (command lines, stderr) goes to `diagnostics`
    /// as soon as it is known, whether detection succeeds or not. It is
    /// only shown to the user, never parsed.
    ///
    /// The caller applies the per-URL timeout and may drop this future at any
    /// point; implementations must not leave work running when dropped.
    async fn detect(
        &self,
        target_url: &str,
        diagnostics: &mut Vec<String>,
    ) -> Result<Value, DetectionError>;
}

/// Longest detector output kept in a failure detail.
pub(crate) const MAX_DETAIL_CHARS: usize = 300;

/// First `max` characters of `text`, with `...` when cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé...");
    }
}
