//! Page fetching.
//!
//! The orchestrator only talks to the [`Fetcher`] trait. [`HttpFetcher`] is the
//! `reqwest`-backed implementation; tests substitute scripted fetchers.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpFetcher;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::FetchError;

/// Result of a fetch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body as text.
    pub text: String,
}

impl FetchResponse {
    /// Creates a 200 response.
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            text: text.into(),
        }
    }

    /// Sets the status code.
    #[must_use]
    pub const fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Whether the fetch was successful (2xx status).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Protocol for HTTP fetching.
///
/// Implementations return non-2xx responses as `Ok`; deciding whether a status
/// is usable is left to the caller. `headers` is the complete set of request
/// headers; implementations add none of their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the result.
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        headers: &HashMap<String, String>,
    ) -> Result<FetchResponse, FetchError>;
}

/// Observability callbacks for fetch and extraction.
pub trait FetchObserver: Send + Sync {
    /// Called when a fetch starts.
    fn on_fetch_start(&self, url: &str, request_id: &str);

    /// Called when a fetch completes with any status.
    fn on_fetch_complete(&self, url: &str, request_id: &str, duration_ms: f64, status_code: u16);

    /// Called when a fetch fails or its response is unusable.
    fn on_fetch_error(&self, url: &str, request_id: &str, error: &FetchError);

    /// Called when a source's extraction completes.
    fn on_extract_complete(&self, source: &str, request_id: &str, duration_ms: f64, records: usize);
}

/// No-op implementation of [`FetchObserver`].
#[derive(Debug, Clone, Default)]
pub struct NoOpFetchObserver;

impl FetchObserver for NoOpFetchObserver {
    fn on_fetch_start(&self, _url: &str, _request_id: &str) {}
    fn on_fetch_complete(&self, _url: &str, _request_id: &str, _duration_ms: f64, _status_code: u16) {}
    fn on_fetch_error(&self, _url: &str, _request_id: &str, _error: &FetchError) {}
    fn on_extract_complete(&self, _source: &str, _request_id: &str, _duration_ms: f64, _records: usize) {}
}

/// [`FetchObserver`] that reports through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingFetchObserver;

impl FetchObserver for LoggingFetchObserver {
    fn on_fetch_start(&self, url: &str, request_id: &str) {
        tracing::debug!(url, request_id, "Fetch started");
    }

    fn on_fetch_complete(&self, url: &str, request_id: &str, duration_ms: f64, status_code: u16) {
        tracing::info!(url, request_id, duration_ms, status_code, "Fetch completed");
    }

    fn on_fetch_error(&self, url: &str, request_id: &str, error: &FetchError) {
        tracing::warn!(
            url,
            request_id,
            kind = error.kind(),
            %error,
            "Fetch failed, source degraded to empty"
        );
    }

    fn on_extract_complete(&self, source: &str, request_id: &str, duration_ms: f64, records: usize) {
        tracing::info!(source, request_id, duration_ms, records, "Extraction completed");
    }
}
