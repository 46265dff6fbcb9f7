//! # Paperscout
//!
//! Finds explainer videos and reference implementations for a research topic
//! by scraping public search pages that offer no structured API.
//!
//! Paperscout provides:
//!
//! - **Tolerant extraction**: an ordered cascade of strategies (structured
//!   selectors, regex scan, placeholder) for each source
//! - **Normalization**: abbreviated count parsing, canonical URLs, first-seen
//!   deduplication
//! - **Synthetic metadata**: deterministic, hash-keyed placeholder values for
//!   fields the pages do not expose
//! - **Failure isolation**: a failing source degrades to an empty result
//!   without blocking the other
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paperscout::prelude::*;
//!
//! let query = validate_query("transformer attention")?;
//! let orchestrator = SearchOrchestrator::new(HttpFetcher::new(FetchConfig::default())?);
//!
//! let result = orchestrator.search(&query).await;
//! println!("{}", result.to_json()?);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod observability;
pub mod search;
pub mod synthetic;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FetchConfig, ScoutConfig, SourceConfig};
    pub use crate::errors::{FetchError, QueryValidationError, ScoutError};
    pub use crate::extract::{
        ExtractionStrategy, ItemOutcome, RepositoryExtractor, StrategyChain, VideoExtractor,
    };
    #[cfg(feature = "http")]
    pub use crate::fetch::HttpFetcher;
    pub use crate::fetch::{
        FetchObserver, FetchResponse, Fetcher, LoggingFetchObserver, NoOpFetchObserver,
    };
    pub use crate::models::{RepositoryRecord, SearchResult, VideoRecord};
    pub use crate::observability::{init_tracing, LogFormat, SpanTimer};
    pub use crate::search::{validate_query, SearchOrchestrator, MIN_QUERY_LEN};
    pub use crate::utils::parse_count;
}
