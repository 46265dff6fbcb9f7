//! Records returned by a search.
//!
//! Only `url`/`title` of a video and `url`/`name`/`author` (plus whatever the
//! page happened to show) of a repository come from real page content. The
//! remaining fields are filled in by [`crate::synthetic`] and must be treated
//! as best-effort placeholders, not measurements.

use serde::{Deserialize, Serialize};

use crate::errors::ScoutError;

/// Author sentinel carried by the repository placeholder record.
pub const PLACEHOLDER_AUTHOR: &str = "github";

/// Language label carried by the repository placeholder record.
pub const PLACEHOLDER_LANGUAGE: &str = "Various";

/// A video found on the video results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Deduplication key. Not part of the response payload.
    #[serde(skip)]
    pub video_id: String,
    /// Canonical watch URL.
    pub url: String,
    /// Cleaned title.
    pub title: String,
    /// Canonical thumbnail URL.
    pub thumbnail_url: String,
    /// Synthetic view-count label.
    pub views_label: String,
    /// Synthetic publish-age label.
    pub published_label: String,
    /// Synthetic channel name.
    pub channel_name: String,
}

/// A repository found on the repository search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Canonical `https://github.com/<author>/<name>` URL; the dedup key.
    pub url: String,
    /// Display name.
    pub name: String,
    /// Star count, synthetic when the page did not show one.
    pub stars: u64,
    /// Fork count, synthetic when the page did not show one.
    pub forks: u64,
    /// Owner segment of the repository path.
    pub author: String,
    /// Primary language, or a default label.
    pub language: String,
    /// Description, or a templated one referencing the query.
    pub description: String,
}

impl RepositoryRecord {
    /// Whether this is the "search manually" record returned when nothing
    /// could be extracted.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.stars == 0
            && self.forks == 0
            && self.author == PLACEHOLDER_AUTHOR
            && self.language == PLACEHOLDER_LANGUAGE
    }
}

/// Response root of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Videos in page encounter order.
    pub videos: Vec<VideoRecord>,
    /// Repositories in page encounter order.
    pub repos: Vec<RepositoryRecord>,
}

impl SearchResult {
    /// Creates a result from both sources.
    #[must_use]
    pub fn new(videos: Vec<VideoRecord>, repos: Vec<RepositoryRecord>) -> Self {
        Self { videos, repos }
    }

    /// The `{"videos": [], "repos": []}` body of a rejected request.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether repository extraction fell back to the placeholder record.
    #[must_use]
    pub fn repos_degraded(&self) -> bool {
        matches!(self.repos.as_slice(), [only] if only.is_placeholder())
    }

    /// Serializes the result to compact JSON.
    pub fn to_json(&self) -> Result<String, ScoutError> {
        Ok(serde_json::to_string(self)?)
    }
}
