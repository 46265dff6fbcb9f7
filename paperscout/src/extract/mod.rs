//! Record extraction from scraped search pages.
//!
//! Each source is scraped by an ordered list of [`ExtractionStrategy`]
//! implementations run through a [`StrategyChain`]: the first strategy that
//! yields anything wins, later ones only run when everything before them came
//! back empty. Within a strategy, every candidate item produces an
//! [`ItemOutcome`], so a malformed item is skipped without aborting the scan.

mod repository;
mod video;

pub use repository::{
    validate_repo_path, PathRejection, PlaceholderStrategy, RegexStrategy, RepoPath,
    RepositoryExtractor, StructuredStrategy, BLOCKED_PATH_KEYWORDS, DEFAULT_LANGUAGE,
    GITHUB_BASE_URL,
};
pub use video::{clean_title, VideoExtractor, MIN_TITLE_CHARS};

use std::fmt;

/// What a strategy is given to work with.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    /// Raw page body; empty when the fetch failed.
    pub body: &'a str,
    /// The user's search query, used in templated fields.
    pub query: &'a str,
    /// URL of the search page the body came from.
    pub page_url: &'a str,
    /// Maximum number of records to return.
    pub max_results: usize,
}

impl<'a> ExtractionInput<'a> {
    /// Creates a new extraction input.
    #[must_use]
    pub const fn new(body: &'a str, query: &'a str, page_url: &'a str, max_results: usize) -> Self {
        Self {
            body,
            query,
            page_url,
            max_results,
        }
    }
}

/// Why a candidate item was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The container had no name/link element.
    MissingLink,
    /// The link did not point at a repository.
    Rejected(PathRejection),
    /// The identifier is empty.
    MissingId,
    /// The title is too short to be a real title.
    ShortTitle,
    /// The record's key was already emitted.
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLink => write!(f, "missing name/link element"),
            Self::Rejected(rejection) => write!(f, "rejected path: {rejection}"),
            Self::MissingId => write!(f, "empty identifier"),
            Self::ShortTitle => write!(f, "title too short"),
            Self::Duplicate => write!(f, "duplicate key"),
        }
    }
}

/// Result of extracting a single candidate item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T> {
    /// The item produced a record.
    Extracted(T),
    /// The item was dropped.
    Skipped(SkipReason),
}

impl<T> ItemOutcome<T> {
    /// Returns the record, if any.
    pub fn into_record(self) -> Option<T> {
        match self {
            Self::Extracted(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }

    /// Whether the item was skipped.
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// One parsing approach in a fallback cascade.
pub trait ExtractionStrategy<T>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts up to `input.max_results` records. Never fails; an empty vector
    /// hands control to the next strategy.
    fn extract(&self, input: &ExtractionInput<'_>) -> Vec<T>;
}

/// Records produced by a chain, with the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome<T> {
    /// Name of the winning strategy, `None` when every strategy came back empty.
    pub strategy: Option<&'static str>,
    /// The extracted records.
    pub records: Vec<T>,
}

/// Ordered, short-circuiting list of strategies.
pub struct StrategyChain<T> {
    strategies: Vec<Box<dyn ExtractionStrategy<T>>>,
}

impl<T> StrategyChain<T> {
    /// Creates a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy to the end of the chain.
    #[must_use]
    pub fn with(mut self, strategy: impl ExtractionStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies in run order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs strategies in order until one yields records.
    ///
    /// A zero `max_results` returns immediately without running anything.
    pub fn run(&self, input: &ExtractionInput<'_>) -> StrategyOutcome<T> {
        if input.max_results > 0 {
            for strategy in &self.strategies {
                let mut records = strategy.extract(input);
                if records.is_empty() {
                    tracing::debug!(strategy = strategy.name(), "Strategy yielded nothing");
                    continue;
                }
                records.truncate(input.max_results);
                return StrategyOutcome {
                    strategy: Some(strategy.name()),
                    records,
                };
            }
        }

        StrategyOutcome {
            strategy: None,
            records: Vec::new(),
        }
    }
}

impl<T> Default for StrategyChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StrategyChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyChain")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        records: Vec<u32>,
        calls: Arc<AtomicUsize>,
    }

    impl ExtractionStrategy<u32> for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _input: &ExtractionInput<'_>) -> Vec<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.clone()
        }
    }

    fn fixed(name: &'static str, records: Vec<u32>, calls: &Arc<AtomicUsize>) -> Fixed {
        Fixed {
            name,
            records,
            calls: Arc::clone(calls),
        }
    }

    #[test]
    fn test_chain_stops_at_first_non_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = StrategyChain::new()
            .with(fixed("first", vec![], &calls))
            .with(fixed("second", vec![1, 2], &calls))
            .with(fixed("third", vec![3], &calls));

        let outcome = chain.run(&ExtractionInput::new("", "q", "", 5));
        assert_eq!(outcome.strategy, Some("second"));
        assert_eq!(outcome.records, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_chain_all_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = StrategyChain::new().with(fixed("only", vec![], &calls));

        let outcome = chain.run(&ExtractionInput::new("", "q", "", 5));
        assert_eq!(outcome.strategy, None);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_chain_enforces_cap() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = StrategyChain::new().with(fixed("many", (0..10).collect(), &calls));

        let outcome = chain.run(&ExtractionInput::new("", "q", "", 3));
        assert_eq!(outcome.records, vec![0, 1, 2]);
    }

    #[test]
    fn test_chain_zero_cap_runs_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = StrategyChain::new().with(fixed("many", vec![1], &calls));

        let outcome = chain.run(&ExtractionInput::new("", "q", "", 0));
        assert!(outcome.records.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(format!("{chain:?}"), r#"StrategyChain { strategies: ["many"] }"#);
    }

    #[test]
    fn test_item_outcome() {
        let ok: ItemOutcome<u32> = ItemOutcome::Extracted(7);
        assert!(!ok.is_skipped());
        assert_eq!(ok.into_record(), Some(7));

        let skipped: ItemOutcome<u32> = ItemOutcome::Skipped(SkipReason::MissingLink);
        assert!(skipped.is_skipped());
        assert_eq!(skipped.into_record(), None);
        assert_eq!(SkipReason::Duplicate.to_string(), "duplicate key");
    }
}
