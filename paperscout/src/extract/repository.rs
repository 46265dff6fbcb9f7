//! Repository extraction from a code-hosting search results page.
//!
//! Three strategies run in order:
//!
//! 1. [`StructuredStrategy`] walks the parsed document using the result list's
//!    test-id markers and attribute signatures.
//! 2. [`RegexStrategy`] scans the raw text for anchors pointing at
//!    `owner/repo` paths.
//! 3. [`PlaceholderStrategy`] returns a single "search manually" record so
//!    the response is never empty.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

use super::{ExtractionInput, ExtractionStrategy, ItemOutcome, SkipReason, StrategyChain, StrategyOutcome};
use crate::models::{RepositoryRecord, PLACEHOLDER_AUTHOR, PLACEHOLDER_LANGUAGE};
use crate::synthetic::{forks_for_stars, repo_stars};
use crate::utils::{collapse_whitespace, parse_count};

/// Origin all repository links are resolved against.
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// Language reported when the page does not show one.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Path segments that name site sections rather than repositories.
pub const BLOCKED_PATH_KEYWORDS: [&str; 12] = [
    "search",
    "topics",
    "settings",
    "pulls",
    "issues",
    "actions",
    "marketplace",
    "explore",
    "blog",
    "about",
    "pricing",
    "enterprise",
];

const MIN_REPO_NAME_LEN: usize = 2;
const MAX_REPO_NAME_LEN: usize = 100;

static RESULT_ITEM: LazyLock<Option<Selector>> = LazyLock::new(|| {
    Selector::parse("ul[data-testid='results-list'] li div[data-testid='results-list-item']").ok()
});
static NAME_LINK: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("a[href*='/'][data-hydro-click]").ok());
static DESCRIPTION: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("p").ok());
static LANGUAGE: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("[itemprop='programmingLanguage']").ok());
static STARS_LINK: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("a[href$='/stargazers']").ok());
static FORKS_LINK: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("a[href$='/network/members']").ok());

static ANCHOR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"href="(/[^"]+)"[^>]*>([^<]*)</a>"#).ok());

/// Why a path is not a repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathRejection {
    /// The link could not be resolved to an absolute URL.
    #[error("unresolvable link '{0}'")]
    Unresolvable(String),
    /// The link points to another host.
    #[error("foreign host '{0}'")]
    ForeignHost(String),
    /// The path carries a query string or fragment.
    #[error("query or fragment present")]
    QueryOrFragment,
    /// The path is not exactly `owner/repo`.
    #[error("expected 2 path segments, found {0}")]
    SegmentCount(usize),
    /// A segment names a site section.
    #[error("blocked keyword '{0}'")]
    Blocked(String),
    /// A segment has disallowed characters or length.
    #[error("invalid segment '{0}'")]
    InvalidSegment(String),
}

/// A validated `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath {
    /// Owner segment.
    pub owner: String,
    /// Repository name segment.
    pub name: String,
}

impl RepoPath {
    /// Canonical `https://github.com/<owner>/<name>` URL.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("{GITHUB_BASE_URL}/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str, min_len: usize) -> bool {
    (min_len..=MAX_REPO_NAME_LEN).contains(&segment.len())
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Validates an `owner/repo` path, with or without leading/trailing slashes.
///
/// The repository name must be 2–100 characters of ASCII alphanumerics, `-`,
/// `_` or `.`; the owner follows the same alphabet with a minimum of one
/// character. Segments equal to a [`BLOCKED_PATH_KEYWORDS`] entry (ignoring
/// case) are rejected.
pub fn validate_repo_path(path: &str) -> Result<RepoPath, PathRejection> {
    if path.contains(['?', '#']) {
        return Err(PathRejection::QueryOrFragment);
    }

    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let segments: Vec<&str> = trimmed.split('/').collect();
    let [owner, name] = segments.as_slice() else {
        return Err(PathRejection::SegmentCount(segments.len()));
    };

    if let Some(blocked) = segments.iter().find(|segment| {
        BLOCKED_PATH_KEYWORDS
            .iter()
            .any(|keyword| segment.eq_ignore_ascii_case(keyword))
    }) {
        return Err(PathRejection::Blocked((*blocked).to_string()));
    }
    if !is_valid_segment(owner, 1) {
        return Err(PathRejection::InvalidSegment((*owner).to_string()));
    }
    if !is_valid_segment(name, MIN_REPO_NAME_LEN) {
        return Err(PathRejection::InvalidSegment((*name).to_string()));
    }

    Ok(RepoPath {
        owner: (*owner).to_string(),
        name: (*name).to_string(),
    })
}

/// Resolves a possibly relative link and validates its repository path.
fn resolve_repo_link(href: &str) -> Result<RepoPath, PathRejection> {
    let resolved = Url::parse(GITHUB_BASE_URL)
        .and_then(|base| base.join(href))
        .map_err(|_| PathRejection::Unresolvable(href.to_string()))?;

    match resolved.host_str() {
        Some(host) if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com") => {}
        other => return Err(PathRejection::ForeignHost(other.unwrap_or_default().to_string())),
    }

    validate_repo_path(resolved.path())
}

fn default_description(query: &str) -> String {
    format!("Implementation of {query}")
}

/// Text of the first descendant matching `selector`, whitespace-collapsed.
fn select_text(item: ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    let element = item.select(selector?).next()?;
    let text = collapse_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Structured-selector pass over the parsed result list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredStrategy;

impl StructuredStrategy {
    /// Extracts one result item.
    fn extract_item(
        item: ElementRef<'_>,
        query: &str,
        seen: &HashSet<String>,
    ) -> ItemOutcome<RepositoryRecord> {
        let Some(link) = NAME_LINK.as_ref().and_then(|s| item.select(s).next()) else {
            return ItemOutcome::Skipped(SkipReason::MissingLink);
        };
        let href = link.value().attr("href").unwrap_or_default();
        let repo = match resolve_repo_link(href) {
            Ok(repo) => repo,
            Err(rejection) => return ItemOutcome::Skipped(SkipReason::Rejected(rejection)),
        };

        let url = repo.canonical_url();
        if seen.contains(&url) {
            return ItemOutcome::Skipped(SkipReason::Duplicate);
        }

        let link_text = collapse_whitespace(&link.text().collect::<String>());
        let name = if link_text.is_empty() {
            repo.name.clone()
        } else {
            link_text
        };

        let mut stars = select_text(item, STARS_LINK.as_ref()).map_or(0, |t| parse_count(&t));
        if stars == 0 {
            stars = repo_stars(&url);
        }
        let mut forks = select_text(item, FORKS_LINK.as_ref()).map_or(0, |t| parse_count(&t));
        if forks == 0 {
            forks = forks_for_stars(stars);
        }

        ItemOutcome::Extracted(RepositoryRecord {
            url,
            name,
            stars,
            forks,
            author: repo.owner,
            language: select_text(item, LANGUAGE.as_ref()).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            description: select_text(item, DESCRIPTION.as_ref()).unwrap_or_else(|| default_description(query)),
        })
    }
}

impl ExtractionStrategy<RepositoryRecord> for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Vec<RepositoryRecord> {
        let mut repos = Vec::new();
        let Some(item_selector) = RESULT_ITEM.as_ref() else {
            return repos;
        };
        if input.body.is_empty() {
            return repos;
        }

        let document = Html::parse_document(input.body);
        let mut seen = HashSet::new();
        for item in document.select(item_selector) {
            match Self::extract_item(item, input.query, &seen) {
                ItemOutcome::Extracted(record) => {
                    seen.insert(record.url.clone());
                    repos.push(record);
                    if repos.len() >= input.max_results {
                        break;
                    }
                }
                ItemOutcome::Skipped(reason) => {
                    tracing::debug!(strategy = self.name(), %reason, "Skipped result item");
                }
            }
        }

        repos
    }
}

/// Regex pass over raw anchor markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexStrategy;

impl RegexStrategy {
    fn extract_item(path: &str, query: &str, seen: &HashSet<String>) -> ItemOutcome<RepositoryRecord> {
        let repo = match validate_repo_path(path) {
            Ok(repo) => repo,
            Err(rejection) => return ItemOutcome::Skipped(SkipReason::Rejected(rejection)),
        };

        let url = repo.canonical_url();
        if seen.contains(&url) {
            return ItemOutcome::Skipped(SkipReason::Duplicate);
        }

        let stars = repo_stars(&url);
        ItemOutcome::Extracted(RepositoryRecord {
            url,
            name: repo.name,
            stars,
            forks: forks_for_stars(stars),
            author: repo.owner,
            language: DEFAULT_LANGUAGE.to_string(),
            description: default_description(query),
        })
    }
}

impl ExtractionStrategy<RepositoryRecord> for RegexStrategy {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Vec<RepositoryRecord> {
        let mut repos = Vec::new();
        let Some(pattern) = ANCHOR.as_ref() else {
            return repos;
        };

        let mut seen = HashSet::new();
        for caps in pattern.captures_iter(input.body) {
            let path = caps.get(1).map_or("", |m| m.as_str());
            match Self::extract_item(path, input.query, &seen) {
                ItemOutcome::Extracted(record) => {
                    seen.insert(record.url.clone());
                    repos.push(record);
                    if repos.len() >= input.max_results {
                        break;
                    }
                }
                ItemOutcome::Skipped(reason) => {
                    tracing::trace!(strategy = self.name(), path, %reason, "Skipped anchor");
                }
            }
        }

        repos
    }
}

/// Last resort: a single record pointing the caller at the search page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderStrategy;

impl ExtractionStrategy<RepositoryRecord> for PlaceholderStrategy {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> Vec<RepositoryRecord> {
        vec![RepositoryRecord {
            url: input.page_url.to_string(),
            name: format!("Search GitHub for \"{}\"", input.query),
            stars: 0,
            forks: 0,
            author: PLACEHOLDER_AUTHOR.to_string(),
            language: PLACEHOLDER_LANGUAGE.to_string(),
            description: "No repositories could be extracted automatically. Follow the link \
                          to browse GitHub search results for this topic."
                .to_string(),
        }]
    }
}

/// Extracts [`RepositoryRecord`]s through the structured → regex →
/// placeholder cascade.
#[derive(Debug)]
pub struct RepositoryExtractor {
    chain: StrategyChain<RepositoryRecord>,
}

impl RepositoryExtractor {
    /// Creates an extractor with the default cascade.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: StrategyChain::new()
                .with(StructuredStrategy)
                .with(RegexStrategy)
                .with(PlaceholderStrategy),
        }
    }

    /// Creates an extractor with a custom cascade.
    #[must_use]
    pub const fn with_chain(chain: StrategyChain<RepositoryRecord>) -> Self {
        Self { chain }
    }

    /// Runs the cascade and reports which strategy produced the records.
    pub fn extract_with_strategy(&self, input: &ExtractionInput<'_>) -> StrategyOutcome<RepositoryRecord> {
        let outcome = self.chain.run(input);
        if let Some(strategy) = outcome.strategy {
            tracing::debug!(strategy, records = outcome.records.len(), "Repository cascade resolved");
        }
        outcome
    }

    /// Extracts up to `max_results` repositories from `page_body`.
    ///
    /// `page_url` is the search page the body came from; it becomes the link
    /// of the placeholder record when nothing else could be extracted. A zero
    /// `max_results` yields an empty vector, without the placeholder.
    pub fn extract(
        &self,
        page_body: &str,
        query: &str,
        page_url: &str,
        max_results: usize,
    ) -> Vec<RepositoryRecord> {
        self.extract_with_strategy(&ExtractionInput::new(page_body, query, page_url, max_results))
            .records
    }
}

impl Default for RepositoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{STARS_MAX, STARS_MIN};
    use crate::testing::{repo_anchor, results_page, ResultItem};
    use pretty_assertions::assert_eq;

    const PAGE_URL: &str = "https://github.com/search?q=bert&type=repositories";

    fn input(body: &str) -> ExtractionInput<'_> {
        ExtractionInput::new(body, "bert", PAGE_URL, 5)
    }

    #[test]
    fn test_selectors_and_pattern_compile() {
        for selector in [&RESULT_ITEM, &NAME_LINK, &DESCRIPTION, &LANGUAGE, &STARS_LINK, &FORKS_LINK] {
            assert!(selector.is_some());
        }
        assert!(ANCHOR.is_some());
    }

    #[test]
    fn test_select_text_reads_first_match() {
        let page = Html::parse_fragment(
            "<div><p>  first\n   paragraph </p><p>second</p><span itemprop=\"programmingLanguage\"></span></div>",
        );
        let root = page.root_element();

        assert_eq!(select_text(root, DESCRIPTION.as_ref()), Some("first paragraph".to_string()));
        assert_eq!(select_text(root, LANGUAGE.as_ref()), None);
        assert_eq!(select_text(root, STARS_LINK.as_ref()), None);
        assert_eq!(select_text(root, None), None);
    }

    #[test]
    fn test_zero_cap_returns_nothing_not_even_placeholder() {
        let extractor = RepositoryExtractor::new();
        assert!(extractor.extract("", "bert", PAGE_URL, 0).is_empty());

        let body = results_page(&[ResultItem::new("google-research", "bert")]);
        let outcome = extractor.extract_with_strategy(&ExtractionInput::new(&body, "bert", PAGE_URL, 0));
        assert_eq!(outcome.strategy, None);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_validate_repo_path_accepts() {
        let repo = validate_repo_path("docs/readme-guide_v2.1").unwrap();
        assert_eq!(repo.owner, "docs");
        assert_eq!(repo.name, "readme-guide_v2.1");
        assert_eq!(repo.canonical_url(), "https://github.com/docs/readme-guide_v2.1");

        let repo = validate_repo_path("/google-research/bert/").unwrap();
        assert_eq!(repo.to_string(), "google-research/bert");
    }

    #[test]
    fn test_validate_repo_path_rejects() {
        assert_eq!(
            validate_repo_path("search/advanced"),
            Err(PathRejection::Blocked("search".to_string()))
        );
        assert_eq!(
            validate_repo_path("/owner/Issues"),
            Err(PathRejection::Blocked("Issues".to_string()))
        );
        assert_eq!(
            validate_repo_path("owner/repo/tree"),
            Err(PathRejection::SegmentCount(3))
        );
        assert_eq!(validate_repo_path("/login"), Err(PathRejection::SegmentCount(1)));
        assert_eq!(
            validate_repo_path("/owner/repo?tab=readme"),
            Err(PathRejection::QueryOrFragment)
        );
        assert_eq!(
            validate_repo_path("owner/x"),
            Err(PathRejection::InvalidSegment("x".to_string()))
        );
        assert_eq!(
            validate_repo_path("owner/bad name"),
            Err(PathRejection::InvalidSegment("bad name".to_string()))
        );
        assert_eq!(
            validate_repo_path(&format!("owner/{}", "a".repeat(101))),
            Err(PathRejection::InvalidSegment("a".repeat(101)))
        );
        assert!(validate_repo_path(&format!("owner/{}", "a".repeat(100))).is_ok());
        assert_eq!(
            validate_repo_path("/owner/"),
            Err(PathRejection::SegmentCount(1))
        );
    }

    #[test]
    fn test_resolve_repo_link() {
        assert_eq!(
            resolve_repo_link("/huggingface/transformers").unwrap().canonical_url(),
            "https://github.com/huggingface/transformers"
        );
        assert_eq!(
            resolve_repo_link("https://github.com/karpathy/nanoGPT").unwrap().owner,
            "karpathy"
        );
        assert_eq!(
            resolve_repo_link("https://gitlab.com/a/b"),
            Err(PathRejection::ForeignHost("gitlab.com".to_string()))
        );
    }

    #[test]
    fn test_structured_pass_reads_fields() {
        let body = results_page(&[
            ResultItem::new("google-research", "bert")
                .description("TensorFlow code and pre-trained models for BERT")
                .language("Python")
                .stars("37.2k")
                .forks("9.6k"),
            ResultItem::new("codertimo", "BERT-pytorch"),
        ]);

        let outcome = RepositoryExtractor::new().extract_with_strategy(&input(&body));
        assert_eq!(outcome.strategy, Some("structured"));
        assert_eq!(outcome.records.len(), 2);

        let first = &outcome.records[0];
        assert_eq!(first.url, "https://github.com/google-research/bert");
        assert_eq!(first.name, "google-research/bert");
        assert_eq!(first.author, "google-research");
        assert_eq!(first.language, "Python");
        assert_eq!(first.description, "TensorFlow code and pre-trained models for BERT");
        assert_eq!(first.stars, 37_200);
        assert_eq!(first.forks, 9_600);

        let second = &outcome.records[1];
        assert_eq!(second.url, "https://github.com/codertimo/BERT-pytorch");
        assert_eq!(second.description, "Implementation of bert");
        assert_eq!(second.language, DEFAULT_LANGUAGE);
        assert_eq!(second.stars, repo_stars(&second.url));
        assert_eq!(second.forks, forks_for_stars(second.stars));
    }

    #[test]
    fn test_structured_pass_skips_bad_items() {
        let body = results_page(&[
            ResultItem::without_link(),
            ResultItem::new("dup", "repo"),
            ResultItem::new("dup", "repo"),
            ResultItem::with_href("/topics/nlp"),
            ResultItem::new("ok", "second"),
        ]);

        let outcome = RepositoryExtractor::new().extract_with_strategy(&input(&body));
        assert_eq!(outcome.strategy, Some("structured"));
        let urls: Vec<_> = outcome.records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://github.com/dup/repo", "https://github.com/ok/second"]);
    }

    #[test]
    fn test_structured_pass_caps_results() {
        let items: Vec<_> = (0..8).map(|i| ResultItem::new("owner", &format!("repo-{i}"))).collect();
        let body = results_page(&items);

        let repos = RepositoryExtractor::new().extract(&body, "bert", PAGE_URL, 5);
        assert_eq!(repos.len(), 5);
        assert_eq!(repos[4].name, "owner/repo-4");
    }

    #[test]
    fn test_regex_fallback_when_no_containers() {
        let body = format!(
            "<html><body><ul data-testid=\"results-list\"></ul>{}{}{}{}{}</body></html>",
            repo_anchor("/search/advanced", "Advanced search"),
            repo_anchor("/pytorch/examples", "pytorch/examples"),
            repo_anchor("/owner/repo/issues", "Issues"),
            repo_anchor("/pytorch/examples", "again"),
            repo_anchor("/docs/readme-guide_v2.1", "guide"),
        );

        let outcome = RepositoryExtractor::new().extract_with_strategy(&input(&body));
        assert_eq!(outcome.strategy, Some("regex"));

        let urls: Vec<_> = outcome.records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com/pytorch/examples",
                "https://github.com/docs/readme-guide_v2.1",
            ]
        );

        let record = &outcome.records[0];
        assert_eq!(record.name, "examples");
        assert_eq!(record.author, "pytorch");
        assert_eq!(record.language, DEFAULT_LANGUAGE);
        assert_eq!(record.description, "Implementation of bert");
        assert!((STARS_MIN..STARS_MAX).contains(&record.stars));
        assert_eq!(record.stars, repo_stars(&record.url));
        assert!(record.forks >= 1);
    }

    #[test]
    fn test_placeholder_when_nothing_matches() {
        let body = "<html><body><p>Please sign in to continue.</p><a href=\"/login\">Sign in</a></body></html>";

        let outcome = RepositoryExtractor::new().extract_with_strategy(&input(body));
        assert_eq!(outcome.strategy, Some("placeholder"));
        assert_eq!(outcome.records.len(), 1);

        let placeholder = &outcome.records[0];
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.stars, 0);
        assert_eq!(placeholder.forks, 0);
        assert_eq!(placeholder.url, PAGE_URL);
        assert_eq!(placeholder.name, "Search GitHub for \"bert\"");
        assert_eq!(placeholder.language, "Various");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let body = results_page(&[ResultItem::new("a", "one"), ResultItem::new("b", "two")]);
        let extractor = RepositoryExtractor::new();

        let first = serde_json::to_string(&extractor.extract(&body, "bert", PAGE_URL, 5)).unwrap();
        let second = serde_json::to_string(&extractor.extract(&body, "bert", PAGE_URL, 5)).unwrap();
        assert_eq!(first, second);
    }
}
