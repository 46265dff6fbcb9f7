//! Assertions over search results.

use std::collections::HashSet;

use crate::extract::validate_repo_path;
use crate::models::SearchResult;

/// Asserts that repository extraction fell back to the single placeholder
/// record and that it mentions `query`.
pub fn assert_placeholder_only(result: &SearchResult, query: &str) {
    assert!(
        result.repos_degraded(),
        "Expected only the placeholder repository, got: {:?}",
        result.repos
    );
    assert!(
        result.repos[0].name.contains(query),
        "Expected placeholder name to mention '{}', got '{}'",
        query,
        result.repos[0].name
    );
}

/// Asserts that no URL appears twice within either list.
pub fn assert_unique_urls(result: &SearchResult) {
    let videos: HashSet<_> = result.videos.iter().map(|v| &v.url).collect();
    assert_eq!(videos.len(), result.videos.len(), "Duplicate video URLs");

    let repos: HashSet<_> = result.repos.iter().map(|r| &r.url).collect();
    assert_eq!(repos.len(), result.repos.len(), "Duplicate repository URLs");
}

/// Asserts that every non-placeholder repository URL is a canonical
/// `https://github.com/<owner>/<repo>` URL of a valid repository path.
pub fn assert_canonical_repo_urls(result: &SearchResult) {
    for repo in result.repos.iter().filter(|r| !r.is_placeholder()) {
        let path = repo.url.strip_prefix("https://github.com/");
        assert!(
            path.is_some_and(|p| validate_repo_path(p).is_ok()),
            "Expected canonical repository URL, got '{}'",
            repo.url
        );
    }
}
