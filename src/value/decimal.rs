//! Comma-or-dot decimal parsing

/// Parse an operator-entered decimal.
///
/// Accepts `,` or `.` as the decimal separator and ignores any whitespace,
/// including thousands-style spaces (`"1 234,5"`). Returns `None` for empty
/// input or text that still isn't a number after normalization.
///
/// # Example
///
/// ```rust
/// use plantlog::value::parse_decimal;
///
/// assert_eq!(parse_decimal("597,5"), Some(597.5));
/// assert_eq!(parse_decimal(" 12.25 "), Some(12.25));
/// assert_eq!(parse_decimal(""), None);
/// ```
#[must_use]
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Same as [`parse_decimal`] but falls back to `0.0`.
///
/// Used wherever a missing or garbled value should count as zero, e.g. the
/// diameter averages on the bath indicators.
#[must_use]
pub fn tolerant_decimal_parse(text: &str) -> f64 {
    parse_decimal(text).unwrap_or(0.0)
}

/// Normalize a decimal to dot-decimal text with `places` fraction digits.
///
/// Empty input stays empty so optional columns remain absent. Unparsable
/// input also yields an empty string; callers that require a value validate
/// before saving.
#[must_use]
pub fn normalize_decimal(text: &str, places: usize) -> String {
    match parse_decimal(text) {
        Some(value) => format!("{value:.places$}"),
        None => String::new(),
    }
}
