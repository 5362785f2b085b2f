// Shared test helpers: an in-memory detection backend with concurrency
// accounting, and outcome builders.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use mass_detect::detection::{NormalizedDetection, TechnologyAttributes};
use mass_detect::error_handling::{DetectionError, InitializationError};
use mass_detect::{DetectionBackend, DetectionOutcome};

/// Backend that answers after a random delay and tracks how many calls
/// overlap.
///
/// URLs containing `fail` get a non-zero exit error. Every other URL
/// reports `Nginx` plus a technology named after the host.
#[allow(dead_code)] // Not every test file uses every helper
pub struct MockBackend {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetectionBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn preflight(&self) -> Result<(), InitializationError> {
        Ok(())
    }

    async fn detect(
        &self,
        target_url: &str,
        _diagnostics: &mut Vec<String>,
    ) -> Result<Value, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        let delay = rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);

        if target_url.contains("fail") {
            return Err(DetectionError::NonZeroExit {
                code: Some(1),
                output: format!("could not reach {target_url}"),
            });
        }

        let host = target_url.trim_start_matches("http://");
        Ok(json!({
            "urls": {format!("{target_url}/"): {"status": 200}},
            "technologies": [
                {"name": "Nginx", "version": "1.18"},
                {"name": format!("Tech-{host}"), "confidence": 50}
            ]
        }))
    }
}

/// A success outcome with the given `(name, version)` technologies.
#[allow(dead_code)]
pub fn success(url: &str, final_url: &str, techs: &[(&str, Option<&str>)]) -> DetectionOutcome {
    let technologies: BTreeMap<String, TechnologyAttributes> = techs
        .iter()
        .map(|(name, version)| {
            (
                name.to_string(),
                TechnologyAttributes {
                    version: version.map(str::to_string),
                    ..Default::default()
                },
            )
        })
        .collect();
    DetectionOutcome::success(
        url,
        NormalizedDetection {
            technologies,
            final_url: final_url.to_string(),
            visited: Vec::new(),
        },
    )
}
