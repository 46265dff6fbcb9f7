//! Text normalization helpers shared by the extractors.

mod numeric;

pub use numeric::parse_count;

/// Collapses runs of whitespace into single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  owner /\n   repo  "), "owner / repo");
        assert_eq!(collapse_whitespace("\n\t "), "");
    }
}
