//! Reporting period and month-name helpers.

use std::fmt;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Earliest supported reporting year.
pub const MIN_YEAR: i32 = 2015;
/// Latest supported reporting year.
pub const MAX_YEAR: i32 = 2030;

/// Month abbreviations as they appear in the brokerage report header.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The (year, month) pair an extraction run is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetPeriod {
    year: i32,
    month: u32,
}

impl TargetPeriod {
    /// Create a validated period.
    pub fn new(year: i32, month: u32) -> Result<Self, ExtractionError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ExtractionError::InvalidPeriod(format!(
                "year must be between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(ExtractionError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a `YYYYMM` hint. Returns `None` for anything that is not exactly
    /// six ASCII digits describing a supported period.
    pub fn from_hint(hint: &str) -> Option<Self> {
        if hint.len() != 6 || !hint.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = hint[..4].parse().ok()?;
        let month: u32 = hint[4..].parse().ok()?;
        Self::new(year, month).ok()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Three-letter abbreviation used in the report header (`Jan`..`Dec`).
    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[self.column_index()]
    }

    /// Zero-based month column (Jan = 0).
    pub fn column_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// Compact `YYYYMM` form used in file names.
    pub fn hint(&self) -> String {
        format!("{}{:02}", self.year, self.month)
    }
}

impl fmt::Display for TargetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Resolve a full month name or a three-letter abbreviation (any case) to 1..=12.
pub fn month_from_name(name: &str) -> Option<u32> {
    name.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Month number of a header token such as `Aug`, `AUG`, `Aug-25` or `August`.
///
/// Only the leading alphabetic run is considered, so `Margin` does not count
/// as `Mar`.
pub fn month_in_token(token: &str) -> Option<u32> {
    let alpha: String = token
        .trim_start_matches(|c: char| !c.is_alphabetic())
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    if alpha.len() < 3 {
        return None;
    }
    month_from_name(&alpha)
}

/// Whether a whitespace token is the header label for `abbreviation`.
pub fn token_is_month(token: &str, abbreviation: &str) -> bool {
    match (month_in_token(token), month_from_name(abbreviation)) {
        (Some(found), Some(wanted)) => found == wanted,
        _ => false,
    }
}

/// Month numbers of the header tokens in a line, in order of appearance.
pub fn months_in_line(line: &str) -> Vec<u32> {
    line.split_whitespace().filter_map(month_in_token).collect()
}
