//! Search orchestration across the video and repository sources.
//!
//! A search fetches both result pages concurrently, runs each source's
//! extractor over whatever came back, and merges the records. A source whose
//! fetch fails contributes an empty body, so one unreachable site never
//! blocks or fails the other.


use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ScoutConfig, SourceConfig};
use crate::errors::{FetchError, QueryValidationError};
use crate::extract::{ExtractionInput, RepositoryExtractor, VideoExtractor};
use crate::fetch::{FetchObserver, Fetcher, LoggingFetchObserver};
use crate::models::SearchResult;
use crate::observability::SpanTimer;

/// Minimum query length in characters, after trimming.
pub const MIN_QUERY_LEN: usize = 3;

/// Trims `raw` and checks it is long enough to search for.
///
/// # Examples
///
/// ```
/// use paperscout::search::validate_query;
///
/// assert_eq!(validate_query("  bert  ").unwrap(), "bert");
/// assert!(validate_query(" ab ").is_err());
/// ```
pub fn validate_query(raw: &str) -> Result<String, QueryValidationError> {
    let query = raw.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(QueryValidationError::new(query, MIN_QUERY_LEN));
    }
    Ok(query.to_string())
}

/// Runs searches against both sources through a [`Fetcher`].
pub struct SearchOrchestrator<F> {
    fetcher: F,
    config: ScoutConfig,
    observer: Arc<dyn FetchObserver>,
    videos: VideoExtractor,
    repositories: RepositoryExtractor,
}

impl<F: Fetcher> SearchOrchestrator<F> {
    /// Creates an orchestrator with default configuration and a logging
    /// observer.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: ScoutConfig::default(),
            observer: Arc::new(LoggingFetchObserver),
            videos: VideoExtractor::new(),
            repositories: RepositoryExtractor::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replaces the repository extractor, e.g. to run a custom cascade.
    #[must_use]
    pub fn with_repository_extractor(mut self, extractor: RepositoryExtractor) -> Self {
        self.repositories = extractor;
        self
    }

    /// The active configuration.
    pub const fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// The underlying fetcher.
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Validates `raw` and searches for it.
    ///
    /// No request is made when the query is rejected.
    pub async fn search_validated(&self, raw: &str) -> Result<SearchResult, QueryValidationError> {
        let query = validate_query(raw)?;
        Ok(self.search(&query).await)
    }

    /// Searches both sources for `query`.
    ///
    /// Never fails: an unreachable source yields no videos, or the
    /// placeholder repository record.
    pub async fn search(&self, query: &str) -> SearchResult {
        let query = query.trim();
        let request_id = uuid::Uuid::new_v4().to_string();
        let timer = SpanTimer::start("search");

        let video_url = self.config.video.search_url(query);
        let repo_url = self.config.repository.search_url(query);

        let (video_body, repo_body) = tokio::join!(
            self.fetch_body(&video_url, &self.config.video, &request_id),
            self.fetch_body(&repo_url, &self.config.repository, &request_id),
        );

        let extract_timer = SpanTimer::start("video");
        let videos = self
            .videos
            .extract(&video_body, self.config.video.max_results);
        self.observer
            .on_extract_complete("video", &request_id, extract_timer.finish(), videos.len());

        let extract_timer = SpanTimer::start("repository");
        let outcome = self.repositories.extract_with_strategy(&ExtractionInput::new(
            &repo_body,
            query,
            &repo_url,
            self.config.repository.max_results,
        ));
        self.observer.on_extract_complete(
            "repository",
            &request_id,
            extract_timer.finish(),
            outcome.records.len(),
        );

        let result = SearchResult::new(videos, outcome.records);
        tracing::info!(
            request_id = %request_id,
            query,
            videos = result.videos.len(),
            repos = result.repos.len(),
            repo_strategy = outcome.strategy.unwrap_or("none"),
            duration_ms = timer.finish(),
            "Search completed"
        );
        result
    }

    /// Fetches one source page, degrading any failure to an empty body.
    async fn fetch_body(&self, url: &str, source: &SourceConfig, request_id: &str) -> String {
        self.observer.on_fetch_start(url, request_id);

        let timeout = self.config.fetch.timeout();
        let headers = self.request_headers(source);
        let timer = SpanTimer::start(url);

        let outcome = match tokio::time::timeout(timeout, self.fetcher.fetch(url, timeout, &headers)).await {
            Ok(Ok(response)) => {
                self.observer
                    .on_fetch_complete(url, request_id, timer.elapsed_ms(), response.status_code);
                if response.is_success() {
                    Ok(response.text)
                } else {
                    Err(FetchError::status(url, response.status_code))
                }
            }
            Ok(Err(error)) => Err(error),
            Err(_) => Err(FetchError::timeout(url, timeout.as_secs())),
        };

        outcome.unwrap_or_else(|error| {
            self.observer.on_fetch_error(url, request_id, &error);
            String::new()
        })
    }

    /// Shared headers, then source headers, then the browser identity.
    fn request_headers(&self, source: &SourceConfig) -> HashMap<String, String> {
        let mut headers = self.config.fetch.headers.clone();
        headers.extend(source.headers.clone());
        headers.insert("User-Agent".to_string(), self.config.fetch.user_agent.clone());
        headers
    }
}

impl<F> std::fmt::Debug for SearchOrchestrator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("config", &self.config)
            .field("repositories", &self.repositories)
            .finish_non_exhaustive()
    }
}
