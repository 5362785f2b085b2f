//! Detector invocation for a single request.

use std::sync::Arc;
use std::time::Duration;

use super::backend::DetectionBackend;
use super::normalize::normalize;
use super::types::{DetectionOutcome, DetectionRequest};
use crate::error_handling::{DetectionError, ErrorType};

/// Everything one invocation produced.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub outcome: DetectionOutcome,
    /// Side-channel lines for verbose output
    pub diagnostics: Vec<String>,
    /// Failure category, `None` on success
    pub error_type: Option<ErrorType>,
}

impl Invocation {
    /// A failed invocation for `request`.
    pub fn failed(
        request: &DetectionRequest,
        error: &DetectionError,
        diagnostics: Vec<String>,
    ) -> Self {
        Self {
            outcome: DetectionOutcome::failure(&request.url, error.to_string()),
            diagnostics,
            error_type: Some(error.error_type()),
        }
    }
}

/// Runs a backend for one request under a total per-URL timeout.
///
/// Never fails: every detection-level error becomes a `Failure` outcome.
#[derive(Clone)]
pub struct DetectorInvoker {
    backend: Arc<dyn DetectionBackend>,
    timeout: Duration,
}

impl DetectorInvoker {
    pub fn new(backend: Arc<dyn DetectionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs detection for `request`.
    ///
    /// Diagnostics the backend produced before failing or timing out are
    /// kept on the returned invocation.
    pub async fn invoke(&self, request: &DetectionRequest) -> Invocation {
        let target_url = request.target_url();
        let mut diagnostics = Vec::new();

        let detected = tokio::time::timeout(
            self.timeout,
            self.backend.detect(&target_url, &mut diagnostics),
        )
        .await;
        let payload = match detected {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => return Invocation::failed(request, &e, diagnostics),
            Err(_) => {
                return Invocation::failed(
                    request,
                    &DetectionError::Timeout(self.timeout),
                    diagnostics,
                )
            }
        };

        match normalize(&target_url, &payload) {
            Ok(detection) => Invocation {
                outcome: DetectionOutcome::success(&request.url, detection),
                diagnostics,
                error_type: None,
            },
            Err(e) => Invocation::failed(request, &e, diagnostics),
        }
    }
}
