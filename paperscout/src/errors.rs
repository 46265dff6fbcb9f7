//! Error types for paperscout.
//!
//! Only [`QueryValidationError`] is meant to reach a caller. Fetch failures are
//! absorbed per source by the orchestrator, and malformed markup is skipped
//! item by item inside the extractors.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for paperscout operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A page could not be fetched.
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// The search query was rejected before any work started.
    #[error("{0}")]
    InvalidQuery(#[from] QueryValidationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised by a [`Fetcher`](crate::fetch::Fetcher).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS, decoding or any other transport-level failure.
    #[error("Transport error fetching {url}: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The request did not complete within its deadline.
    #[error("Timed out fetching {url} after {seconds}s")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The deadline that elapsed, in whole seconds.
        seconds: u64,
    },

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be built (bad header, bad client settings).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(url: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            seconds,
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Whether the failure was a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Short name of the failure kind, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Error raised when a search query is too short to be useful.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Query '{query}' is too short: at least {min_len} characters are required")]
pub struct QueryValidationError {
    /// The rejected query, after trimming.
    pub query: String,
    /// Minimum accepted length in characters.
    pub min_len: usize,
}

impl QueryValidationError {
    /// Creates a new query validation error.
    #[must_use]
    pub fn new(query: impl Into<String>, min_len: usize) -> Self {
        Self {
            query: query.into(),
            min_len,
        }
    }

    /// Converts to a dictionary representation.
    ///
    /// The empty `videos`/`repos` arrays keep the shape of a normal search
    /// response so that clients can render a rejected request the same way.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("QueryValidationError"));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("min_len".to_string(), serde_json::json!(self.min_len));
        map.insert("videos".to_string(), serde_json::json!([]));
        map.insert("repos".to_string(), serde_json::json!([]));
        map
    }
}
