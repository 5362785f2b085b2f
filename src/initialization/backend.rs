//! Detection backend construction.

use std::sync::Arc;

use log::{debug, info};

use crate::config::{BackendKind, Config, DEFAULT_DETECTOR_ARGS};
use crate::detection::{ApiBackend, DetectionBackend, ProcessBackend};
use crate::error_handling::InitializationError;

/// Builds the backend selected by `config` and checks it can run.
///
/// Called once per run, before any URL is dispatched, so a missing detector
/// fails the run instead of every URL.
///
/// # Errors
///
/// Returns an `InitializationError` when the command line or endpoint is
/// invalid, or the backend's preflight check fails.
pub async fn init_backend(config: &Config) -> Result<Arc<dyn DetectionBackend>, InitializationError> {
    let backend: Arc<dyn DetectionBackend> = match config.backend {
        BackendKind::Process => Arc::new(ProcessBackend::new(
            &config.detector_command,
            &config.detector_args,
        )?),
        BackendKind::Api => {
            // The default arguments are detector CLI flags, not query parameters
            let extra_args = if config.detector_args == DEFAULT_DETECTOR_ARGS {
                ""
            } else {
                config.detector_args.as_str()
            };
            Arc::new(ApiBackend::new(
                &config.api_endpoint,
                config.api_key.clone(),
                extra_args,
                config.detection_timeout(),
            )?)
        }
    };

    debug!("Running preflight for {} backend", backend.name());
    backend.preflight().await?;
    info!("Using {} detection backend", backend.name());
    Ok(backend)
}
