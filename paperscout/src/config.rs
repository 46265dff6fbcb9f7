//! Configuration types for fetching and per-source search settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Desktop browser identity sent to the scraped sites.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default number of records returned per source.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_size")]
    pub max_response_size: usize,
    /// Additional headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> f64 {
    15.0
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_max_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_response_size: default_max_size(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    ///
    /// Negative or non-finite values collapse to zero rather than panicking.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::ZERO)
    }
}

/// Settings for one scraped search source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Search page URL up to (and including) the query parameter name.
    pub base_url: String,
    /// Text appended to the raw query to bias results.
    #[serde(default)]
    pub query_suffix: String,
    /// Trailing URL fragment appended after the encoded query.
    #[serde(default)]
    pub url_tail: String,
    /// Maximum number of records extracted from the page.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Source-specific request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl SourceConfig {
    /// Video results page, biased toward explanatory content.
    #[must_use]
    pub fn video() -> Self {
        Self {
            base_url: "https://www.youtube.com/results?search_query=".to_string(),
            query_suffix: " research paper explanation".to_string(),
            url_tail: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            headers: HashMap::new(),
        }
    }

    /// Repository search page, biased toward implementations.
    #[must_use]
    pub fn repository() -> Self {
        let headers = HashMap::from([
            (
                "Accept".to_string(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                    .to_string(),
            ),
            ("Accept-Language".to_string(), "en-US,en;q=0.5".to_string()),
        ]);

        Self {
            base_url: "https://github.com/search?q=".to_string(),
            query_suffix: " research paper implementation".to_string(),
            url_tail: "&type=repositories".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            headers,
        }
    }

    /// Sets the result cap.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builds the search page URL for a query.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        let augmented = format!("{query}{}", self.query_suffix);
        format!(
            "{}{}{}",
            self.base_url,
            urlencoding::encode(&augmented),
            self.url_tail
        )
    }
}

/// Combined configuration for a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Fetch configuration shared by both sources.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Video source settings.
    #[serde(default = "SourceConfig::video")]
    pub video: SourceConfig,
    /// Repository source settings.
    #[serde(default = "SourceConfig::repository")]
    pub repository: SourceConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            video: SourceConfig::video(),
            repository: SourceConfig::repository(),
        }
    }
}

impl ScoutConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result cap for both sources.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.video.max_results = max;
        self.repository.max_results = max;
        self
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.fetch.timeout_seconds = seconds;
        self
    }

    /// Replaces the video source settings.
    #[must_use]
    pub fn with_video_source(mut self, source: SourceConfig) -> Self {
        self.video = source;
        self
    }

    /// Replaces the repository source settings.
    #[must_use]
    pub fn with_repository_source(mut self, source: SourceConfig) -> Self {
        self.repository = source;
        self
    }
}
