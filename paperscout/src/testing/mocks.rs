//! Scripted fetchers for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::FetchError;
use crate::fetch::{FetchResponse, Fetcher};

/// What a scripted route does when matched.
#[derive(Debug, Clone)]
enum Reply {
    Respond(FetchResponse),
    Fail(FetchError),
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    reply: Reply,
    delay: Option<Duration>,
}

/// A recorded fetch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL.
    pub url: String,
    /// Per-request headers.
    pub headers: HashMap<String, String>,
}

/// A fetcher that answers from a script of URL-substring routes.
///
/// Routes are checked in the order they were added; the first whose pattern
/// occurs in the requested URL answers. Unmatched URLs fail with a transport
/// error.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedFetcher {
    /// Creates a fetcher with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers URLs containing `pattern` with a 200 HTML response.
    #[must_use]
    pub fn respond(self, pattern: &str, body: impl Into<String>) -> Self {
        let response = FetchResponse::ok(body);
        self.route(pattern, Reply::Respond(response), None)
    }

    /// Answers URLs containing `pattern` with the given status and body.
    #[must_use]
    pub fn respond_with_status(self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        let response = FetchResponse::ok(body).with_status(status);
        self.route(pattern, Reply::Respond(response), None)
    }

    /// Fails URLs containing `pattern` with `error`.
    #[must_use]
    pub fn fail(self, pattern: &str, error: FetchError) -> Self {
        self.route(pattern, Reply::Fail(error), None)
    }

    /// Answers URLs containing `pattern` only after `delay`.
    #[must_use]
    pub fn respond_after(self, pattern: &str, delay: Duration, body: impl Into<String>) -> Self {
        let response = FetchResponse::ok(body);
        self.route(pattern, Reply::Respond(response), Some(delay))
    }

    fn route(self, pattern: &str, reply: Reply, delay: Option<Duration>) -> Self {
        self.routes.lock().push(Route {
            pattern: pattern.to_string(),
            reply,
            delay,
        });
        self
    }

    /// Every request made so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests whose URL contains `pattern`.
    #[must_use]
    pub fn request_count(&self, pattern: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.contains(pattern))
            .count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        url: &str,
        _timeout: Duration,
        headers: &HashMap<String, String>,
    ) -> Result<FetchResponse, FetchError> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });

        let route = self
            .routes
            .lock()
            .iter()
            .find(|r| url.contains(&r.pattern))
            .cloned();
        let Some(route) = route else {
            return Err(FetchError::transport(url, "no scripted route"));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }

        match route.reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(error) => Err(error),
        }
    }
}
