//! Video extraction from a video search results page.
//!
//! The results page embeds its data as an inline JSON-like payload. That
//! payload is not a published contract, so this is a best-effort text scan
//! pairing each `videoId` with the next `"text"` field rather than a parse.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::{ItemOutcome, SkipReason};
use crate::models::VideoRecord;
use crate::synthetic::VideoMetadata;

/// Cleaned titles with this many characters or fewer are markup noise.
pub const MIN_TITLE_CHARS: usize = 5;

static VIDEO_ENTRY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"videoId":"(.*?)".*?"text":"(.*?)""#).ok());

/// Extracts [`VideoRecord`]s from a results page body.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoExtractor;

impl VideoExtractor {
    /// Creates a new video extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts up to `max_results` videos in page order.
    ///
    /// The first acceptable occurrence of an id wins. An empty or
    /// unrecognizable body yields an empty vector.
    pub fn extract(&self, page_body: &str, max_results: usize) -> Vec<VideoRecord> {
        let mut videos = Vec::new();
        if max_results == 0 || page_body.is_empty() {
            return videos;
        }
        let Some(pattern) = VIDEO_ENTRY.as_ref() else {
            return videos;
        };

        let mut seen = HashSet::new();
        for caps in pattern.captures_iter(page_body) {
            let video_id = caps.get(1).map_or("", |m| m.as_str());
            let raw_title = caps.get(2).map_or("", |m| m.as_str());

            match Self::extract_item(video_id, raw_title, &seen) {
                ItemOutcome::Extracted(record) => {
                    seen.insert(record.video_id.clone());
                    videos.push(record);
                    if videos.len() >= max_results {
                        break;
                    }
                }
                ItemOutcome::Skipped(reason) => {
                    tracing::debug!(video_id, %reason, "Skipped video candidate");
                }
            }
        }

        videos
    }

    /// Builds one record from a matched id/title pair.
    fn extract_item(
        video_id: &str,
        raw_title: &str,
        seen: &HashSet<String>,
    ) -> ItemOutcome<VideoRecord> {
        if video_id.is_empty() {
            return ItemOutcome::Skipped(SkipReason::MissingId);
        }
        if seen.contains(video_id) {
            return ItemOutcome::Skipped(SkipReason::Duplicate);
        }
        // The threshold applies to the title as returned.
        let title = clean_title(raw_title);
        if title.chars().count() <= MIN_TITLE_CHARS {
            return ItemOutcome::Skipped(SkipReason::ShortTitle);
        }

        let metadata = VideoMetadata::for_video(video_id);
        ItemOutcome::Extracted(VideoRecord {
            video_id: video_id.to_string(),
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            title,
            thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
            views_label: metadata.views_label,
            published_label: metadata.published_label.to_string(),
            channel_name: metadata.channel_name.to_string(),
        })
    }
}

/// Decodes ampersand escapes and strips leftover backslashes from a title.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    raw.replace("\\u0026", "&")
        .replace("&amp;", "&")
        .replace('\\', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, title: &str) -> String {
        format!(r#"{{"videoId":"{id}","thumbnail":{{"w":1}},"title":{{"runs":[{{"text":"{title}"}}]}}}},"#)
    }

    #[test]
    fn test_pattern_compiles() {
        assert!(VIDEO_ENTRY.is_some());
    }

    #[test]
    fn test_extracts_video_fields() {
        let body = entry("abcDEF12345", "Attention Is All You Need");
        let videos = VideoExtractor::new().extract(&body, 5);

        assert_eq!(videos.len(), 1);
        let video = &videos[0];
        assert_eq!(video.video_id, "abcDEF12345");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abcDEF12345");
        assert_eq!(video.thumbnail_url, "https://i.ytimg.com/vi/abcDEF12345/hqdefault.jpg");
        assert_eq!(video.title, "Attention Is All You Need");

        let metadata = VideoMetadata::for_video("abcDEF12345");
        assert_eq!(video.views_label, metadata.views_label);
        assert_eq!(video.published_label, metadata.published_label);
        assert_eq!(video.channel_name, metadata.channel_name);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let body = format!(
            "{}{}{}",
            entry("vid00000001", "First title here"),
            entry("vid00000002", "Second title here"),
            entry("vid00000001", "Repeated title here"),
        );
        let videos = VideoExtractor::new().extract(&body, 5);

        let ids: Vec<_> = videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["vid00000001", "vid00000002"]);
        assert_eq!(videos[0].title, "First title here");
    }

    #[test]
    fn test_title_length_threshold() {
        let body = format!(
            "{}{}",
            entry("short000001", "Intro"),
            entry("long0000001", "Intro!"),
        );
        let videos = VideoExtractor::new().extract(&body, 5);

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "long0000001");
        assert_eq!(videos[0].title, "Intro!");
    }

    #[test]
    fn test_title_threshold_applies_after_cleaning() {
        let body = format!(
            "{}{}{}",
            entry("escaped0001", r"Q\u0026A"),
            entry("escaped0002", r"R\u0026D lab"),
            entry("slashes0001", r"a\\b\\c\\d"),
        );
        let videos = VideoExtractor::new().extract(&body, 5);

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "R&D lab");
        assert!(videos.iter().all(|v| v.title.chars().count() > MIN_TITLE_CHARS));
    }

    #[test]
    fn test_short_title_does_not_claim_id() {
        let body = format!(
            "{}{}",
            entry("same0000001", "Hi"),
            entry("same0000001", "A proper title"),
        );
        let videos = VideoExtractor::new().extract(&body, 5);

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "A proper title");
    }

    #[test]
    fn test_caps_result_count() {
        let body: String = (0..12)
            .map(|i| entry(&format!("video{i:06}"), &format!("Lecture number {i}")))
            .collect();
        let videos = VideoExtractor::new().extract(&body, 5);

        assert_eq!(videos.len(), 5);
        assert_eq!(videos[4].video_id, "video000004");
    }

    #[test]
    fn test_empty_and_unrecognized_bodies() {
        let extractor = VideoExtractor::new();
        assert!(extractor.extract("", 5).is_empty());
        assert!(extractor.extract("<html><body>Access denied</body></html>", 5).is_empty());
        assert!(extractor.extract(&entry("abcDEF12345", "Some long title"), 0).is_empty());
        assert!(extractor.extract(&entry("", "Some long title"), 5).is_empty());
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title(r"Q\u0026A on transformers"), "Q&A on transformers");
        assert_eq!(clean_title("Tips &amp; tricks"), "Tips & tricks");
        assert_eq!(clean_title(r#"The \"best\" intro"#), r#"The "best" intro"#);
        assert_eq!(clean_title("plain"), "plain");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let body = format!(
            "{}{}",
            entry("vid00000001", "First title here"),
            entry("vid00000002", "Second title here"),
        );
        let extractor = VideoExtractor::new();
        let first = serde_json::to_string(&extractor.extract(&body, 5)).unwrap();
        let second = serde_json::to_string(&extractor.extract(&body, 5)).unwrap();
        assert_eq!(first, second);
    }
}
