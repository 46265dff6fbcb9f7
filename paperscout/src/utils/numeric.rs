//! Parsing of abbreviated, human-readable counts such as `"1.2k"` or `"3M"`.

/// Parses an abbreviated count into an integer.
///
/// Thousands separators are ignored and a trailing `k`/`m` (any case) scales
/// the value by 1 000 or 1 000 000. Fractional results are truncated toward
/// zero. Anything that does not parse as a finite, non-negative number
/// yields `0`.
///
/// ```
/// use paperscout::utils::parse_count;
///
/// assert_eq!(parse_count("1,234"), 1234);
/// assert_eq!(parse_count("2.5k"), 2500);
/// assert_eq!(parse_count("3M"), 3_000_000);
/// assert_eq!(parse_count("garbage"), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    let cleaned = text.replace(',', "").to_lowercase();
    let (numeral, multiplier) = if let Some(rest) = cleaned.strip_suffix('k') {
        (rest, 1_000.0)
    } else if let Some(rest) = cleaned.strip_suffix('m') {
        (rest, 1_000_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    match numeral.trim().parse::<f64>() {
        // `as` saturates at u64::MAX and truncates the fraction.
        Ok(value) if value.is_finite() && value >= 0.0 => (value * multiplier) as u64,
        _ => 0,
    }
}
