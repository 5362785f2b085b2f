//! Technology detection for a single URL.
//!
//! A [`DetectionBackend`] produces a raw, detector-specific JSON payload. The
//! [`normalize`] adapter coerces that payload into the fixed
//! [`NormalizedDetection`] shape, and [`DetectorInvoker`] ties the two together
//! under a per-URL timeout, turning every failure into a
//! [`DetectionOutcome::Failure`].

mod backend;
mod http;
mod invoker;
mod normalize;
mod process;
mod types;

pub use backend::DetectionBackend;
pub use http::ApiBackend;
pub use invoker::{DetectorInvoker, Invocation};
pub use normalize::normalize;
pub use process::ProcessBackend;
pub use types::{
    DetectionOutcome, DetectionRequest, NormalizedDetection, TechnologyAttributes, VisitedUrl,
};
