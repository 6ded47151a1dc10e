//! Shared HTTP fetch client for the website and API readers.
//!
//! Wraps a [`reqwest::Client`] with an explicit timeout so a slow or
//! hung remote surfaces as [`SourceError::Unreachable`] instead of
//! stalling the run until some platform-level limit fires.

use std::time::Duration;

use crate::error::SourceError;

/// Default per-request timeout for source fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used by all network-backed source readers.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: reqwest::Client,
}

impl SourceClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("outfred-import/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Build a client with [`DEFAULT_FETCH_TIMEOUT`].
    pub fn with_default_timeout() -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }

    /// Fetch a URL and return the response body as text.
    ///
    /// Non-2xx statuses map to [`SourceError::Unreachable`].
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(url, e))?;

        let response = Self::ensure_success(url, response)?;
        response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(url, e))
    }

    /// Fetch a URL and parse the response body as JSON, optionally
    /// sending a bearer key.
    pub async fn get_json(
        &self,
        url: &str,
        api_key: Option<&str>,
    ) -> Result<serde_json::Value, SourceError> {
        let mut request = self.client.get(url);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(url, e))?;

        let response = Self::ensure_success(url, response)?;
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(url, e))?;

        serde_json::from_str(&body)
            .map_err(|e| SourceError::FormatInvalid(format!("{url}: response is not JSON: {e}")))
    }

    fn ensure_success(
        url: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SourceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unreachable(format!(
                "{url} returned status {status}"
            )));
        }
        Ok(response)
    }
}
