//! Numeric value normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{NUMERIC_TOKEN, UNIT_WORDS};

/// Strip currency symbols and thousands separators from a raw token.
///
/// The decimal representation is otherwise kept as printed: `"$1,234.50"`
/// becomes `"1234.50"`. Empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a narrative figure, also dropping trailing unit words
/// (`"1,200,000 shares"` becomes `"1200000"`).
pub fn normalize_figure(raw: &str) -> String {
    normalize(&UNIT_WORDS.replace_all(raw, ""))
}

/// Normalized values of the numeric-looking tokens of a line, in order.
pub fn numeric_tokens(line: &str) -> Vec<String> {
    line.split_whitespace()
        .filter(|token| NUMERIC_TOKEN.is_match(token))
        .map(normalize)
        .filter(|value| !value.is_empty())
        .collect()
}

/// Parse a normalized value as a decimal.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned = normalize(value);
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
