//! `reqwest`-backed [`Fetcher`].
//!
//! The client carries transport settings only (timeout, redirects). Every
//! request header, the user agent included, comes from the caller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::{FetchResponse, Fetcher};
use crate::config::FetchConfig;
use crate::errors::FetchError;

/// HTTP fetcher built on a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        headers: &HashMap<String, String>,
    ) -> Result<FetchResponse, FetchError> {
        let mut request = self.client.get(url).timeout(timeout);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, &e))?;

        let status_code = response.status().as_u16();
        let mut text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, &e))?;
        truncate_at_char_boundary(&mut text, self.config.max_response_size);

        Ok(FetchResponse { status_code, text })
    }
}

fn map_reqwest_error(url: &str, timeout: Duration, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::timeout(url, timeout.as_secs())
    } else if err.is_builder() {
        FetchError::InvalidRequest(err.to_string())
    } else {
        FetchError::transport(url, err.to_string())
    }
}

fn truncate_at_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
