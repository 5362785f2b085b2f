//! Detection data model.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::app::normalize_target_url;

/// One URL to analyze, exactly as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRequest {
    pub url: String,
}

impl DetectionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// URL handed to the backend (scheme added when missing).
    pub fn target_url(&self) -> String {
        normalize_target_url(&self.url)
    }
}

/// What a detector reported about one technology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechnologyAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Detection confidence in percent (0..=100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// Category names in the order the detector reported them
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// One hop of the redirect chain seen by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitedUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Detector output after normalization, before it is tied to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDetection {
    pub technologies: BTreeMap<String, TechnologyAttributes>,
    pub final_url: String,
    pub visited: Vec<VisitedUrl>,
}

/// Result of analyzing one request. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DetectionOutcome {
    Success {
        url: String,
        technologies: BTreeMap<String, TechnologyAttributes>,
        final_url: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        visited: Vec<VisitedUrl>,
    },
    Failure {
        url: String,
        error_detail: String,
    },
}

impl DetectionOutcome {
    pub fn success(url: impl Into<String>, detection: NormalizedDetection) -> Self {
        DetectionOutcome::Success {
            url: url.into(),
            technologies: detection.technologies,
            final_url: detection.final_url,
            visited: detection.visited,
        }
    }

    pub fn failure(url: impl Into<String>, error_detail: impl Into<String>) -> Self {
        DetectionOutcome::Failure {
            url: url.into(),
            error_detail: error_detail.into(),
        }
    }

    /// The URL as it was requested.
    pub fn url(&self) -> &str {
        match self {
            DetectionOutcome::Success { url, .. } | DetectionOutcome::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DetectionOutcome::Success { .. })
    }

    /// Final URL after redirects; `None` for failures.
    pub fn final_url(&self) -> Option<&str> {
        match self {
            DetectionOutcome::Success { final_url, .. } => Some(final_url),
            DetectionOutcome::Failure { .. } => None,
        }
    }

    /// Detected technologies; `None` for failures.
    pub fn technologies(&self) -> Option<&BTreeMap<String, TechnologyAttributes>> {
        match self {
            DetectionOutcome::Success { technologies, .. } => Some(technologies),
            DetectionOutcome::Failure { .. } => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match self {
            DetectionOutcome::Failure { error_detail, .. } => Some(error_detail),
            DetectionOutcome::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_adds_scheme() {
        let request = DetectionRequest::new("example.com");
        assert_eq!(request.url, "example.com");
        assert_eq!(request.target_url(), "http://example.com");
    }

    #[test]
    fn test_failure_accessors() {
        let outcome = DetectionOutcome::failure("b.com", "timeout");
        assert_eq!(outcome.url(), "b.com");
        assert!(!outcome.is_success());
        assert_eq!(outcome.final_url(), None);
        assert!(outcome.technologies().is_none());
        assert_eq!(outcome.error_detail(), Some("timeout"));
    }

    #[test]
    fn test_success_accessors() {
        let mut technologies = BTreeMap::new();
        technologies.insert(
            "Nginx".to_string(),
            TechnologyAttributes {
                version: Some("1.18".to_string()),
                ..Default::default()
            },
        );
        let outcome = DetectionOutcome::success(
            "a.com",
            NormalizedDetection {
                technologies,
                final_url: "https://a.com/".to_string(),
                visited: Vec::new(),
            },
        );
        assert!(outcome.is_success());
        assert_eq!(outcome.final_url(), Some("https://a.com/"));
        assert_eq!(outcome.technologies().map(|t| t.len()), Some(1));
        assert_eq!(outcome.error_detail(), None);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = DetectionOutcome::failure("b.com", "timeout");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["error_detail"], "timeout");
    }
}
