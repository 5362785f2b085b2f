//! HTTP lookup API backend.
//!
//! Queries a Wappalyzer-compatible lookup endpoint instead of spawning a
//! process: `GET <endpoint>?urls=<url>[&extra=args]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::backend::{truncate_chars, DetectionBackend, MAX_DETAIL_CHARS};
use crate::config::API_KEY_HEADER;
use crate::error_handling::{DetectionError, InitializationError};

/// Sends one lookup request per URL.
#[derive(Debug, Clone)]
pub struct ApiBackend {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    query: Vec<(String, String)>,
}

impl ApiBackend {
    /// Builds the backend.
    ///
    /// `extra_args` is split into words; each `key=value` word becomes an
    /// extra query parameter, a bare word becomes a parameter with an empty
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http(s) URL, `extra_args`
    /// has unbalanced quotes, or the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        extra_args: &str,
        timeout: Duration,
    ) -> Result<Self, InitializationError> {
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| InitializationError::InvalidEndpoint(endpoint.to_string()))?;

        let query = if extra_args.trim().is_empty() {
            Vec::new()
        } else {
            shlex::split(extra_args)
                .ok_or_else(|| InitializationError::InvalidCommand(extra_args.to_string()))?
                .into_iter()
                .map(|word| match word.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (word, String::new()),
                })
                .collect()
        };

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
            query,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DetectionBackend for ApiBackend {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn preflight(&self) -> Result<(), InitializationError> {
        // Reachability is a per-URL concern; a bad endpoint is rejected in new().
        Ok(())
    }

    async fn detect(
        &self,
        target_url: &str,
        diagnostics: &mut Vec<String>,
    ) -> Result<Value, DetectionError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("urls", target_url)])
            .query(&self.query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        diagnostics.push(format!("GET {} -> {}", response.url(), status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectionError::HttpStatus {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), MAX_DETAIL_CHARS),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            DetectionError::Malformed(format!(
                "lookup response is not valid JSON ({e}): {}",
                truncate_chars(body.trim(), MAX_DETAIL_CHARS)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = ApiBackend::new("ftp://example.com", None, "", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, InitializationError::InvalidEndpoint(_)));

        let err = ApiBackend::new("not a url", None, "", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, InitializationError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_extra_args_become_query_pairs() {
        let backend = ApiBackend::new(
            "https://api.example.com/lookup",
            Some(String::new()),
            "live=true recursive",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            backend.query,
            vec![
                ("live".to_string(), "true".to_string()),
                ("recursive".to_string(), String::new()),
            ]
        );
        assert!(backend.api_key.is_none());
        assert_eq!(backend.endpoint().host_str(), Some("api.example.com"));
    }
}
