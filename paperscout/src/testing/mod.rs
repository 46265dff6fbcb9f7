//! Testing utilities for paperscout.
//!
//! This module provides:
//! - Page fixtures shaped like the scraped search pages
//! - A scripted [`Fetcher`](crate::fetch::Fetcher) for driving the orchestrator
//! - Assertions over search results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_canonical_repo_urls, assert_placeholder_only, assert_unique_urls};
pub use fixtures::{repo_anchor, results_page, video_page, ResultItem};
pub use mocks::{RecordedRequest, ScriptedFetcher};
