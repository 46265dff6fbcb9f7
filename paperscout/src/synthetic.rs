//! Deterministic synthetic metadata.
//!
//! The scraped pages rarely expose view counts, publish dates, channel names
//! or reliable star counts. Instead of leaving those fields empty, paperscout
//! fabricates values that are a pure function of a stable key (a video id or a
//! canonical repository URL), so the same item renders identically on every
//! search, in every process.
//!
//! **Every value produced here is fabricated, not measured.**
//!
//! The key hash is 64-bit FNV-1a over the key's UTF-8 bytes. It is versioned
//! through [`HASH_VERSION`]; changing the algorithm or any of the tables below
//! changes user-visible output and must bump the version.

/// Version of the key hash and selection tables.
pub const HASH_VERSION: u32 = 1;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Relative publish labels, in selection order.
pub const PUBLISHED_LABELS: [&str; 4] = ["1 month ago", "2 months ago", "6 months ago", "1 year ago"];

/// Channel names, in selection order.
pub const CHANNEL_NAMES: [&str; 5] = [
    "ML Explained",
    "AI Coffee Break",
    "The AI Epiphany",
    "Code Emporium",
    "StatQuest",
];

/// Synthetic view counts fall in `[VIEWS_MIN_K, VIEWS_MAX_K)` thousand.
pub const VIEWS_MIN_K: u64 = 100;
/// Exclusive upper bound of synthetic view counts, in thousands.
pub const VIEWS_MAX_K: u64 = 1000;

/// Synthetic star counts fall in `[STARS_MIN, STARS_MAX)`.
pub const STARS_MIN: u64 = 50;
/// Exclusive upper bound of synthetic star counts.
pub const STARS_MAX: u64 = 1000;

/// 64-bit FNV-1a hash of `key`.
#[must_use]
pub fn stable_hash(key: &str) -> u64 {
    key.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Index into an enumeration of `len` items, or `None` when it is empty.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn index_for(key: &str, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // The remainder is below `len`, so it always fits back into usize.
    Some((stable_hash(key) % len as u64) as usize)
}

/// Value in the half-open range `[lo, hi)`. An empty range yields `lo`.
#[must_use]
pub fn value_in_range(key: &str, lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        return lo;
    }
    lo + stable_hash(key) % (hi - lo)
}

/// Picks an entry of `options` for `key`.
fn pick<'a>(key: &str, options: &[&'a str]) -> &'a str {
    index_for(key, options.len()).map_or("", |i| options[i])
}

/// Synthetic view-count label, e.g. `"523.0K views"`.
#[must_use]
pub fn views_label(key: &str) -> String {
    let thousands = value_in_range(key, VIEWS_MIN_K, VIEWS_MAX_K);
    format!("{thousands}.0K views")
}

/// Synthetic relative publish label.
#[must_use]
pub fn published_label(key: &str) -> &'static str {
    pick(key, &PUBLISHED_LABELS)
}

/// Synthetic channel name.
#[must_use]
pub fn channel_name(key: &str) -> &'static str {
    pick(key, &CHANNEL_NAMES)
}

/// Synthetic star count in `[STARS_MIN, STARS_MAX)`.
#[must_use]
pub fn repo_stars(key: &str) -> u64 {
    value_in_range(key, STARS_MIN, STARS_MAX)
}

/// Fork count derived from a star count: 30% of stars, at least 1.
#[must_use]
pub const fn forks_for_stars(stars: u64) -> u64 {
    let forks = stars * 3 / 10;
    if forks == 0 {
        1
    } else {
        forks
    }
}

/// Synthetic video metadata for one video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Fabricated view-count label.
    pub views_label: String,
    /// Fabricated publish-age label.
    pub published_label: &'static str,
    /// Fabricated channel name.
    pub channel_name: &'static str,
}

impl VideoMetadata {
    /// Derives all synthetic video fields from `video_id`.
    #[must_use]
    pub fn for_video(video_id: &str) -> Self {
        Self {
            views_label: views_label(video_id),
            published_label: published_label(video_id),
            channel_name: channel_name(video_id),
        }
    }
}
