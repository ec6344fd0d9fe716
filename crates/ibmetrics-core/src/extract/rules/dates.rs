//! Reporting date recognition in document text.

use super::patterns::{DateShape, DATE_PATTERNS};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::period::{month_from_name, MAX_YEAR, MIN_YEAR};

/// Year and/or month recognized by one date pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFinding {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl DateFinding {
    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.month.is_some()
    }

    /// Fill missing components from `other`; components already set are kept.
    pub fn merge(self, other: DateFinding) -> DateFinding {
        DateFinding {
            year: self.year.or(other.year),
            month: self.month.or(other.month),
        }
    }
}

fn parse_year(token: &str) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token.parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Recognizes report dates with the ordered date pattern list.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// The first complete date, or else the first year and first month seen
    /// by any pattern.
    pub fn find(&self, text: &str) -> DateFinding {
        let findings = self.extract_all(text);
        if let Some(full) = findings.iter().find(|f| f.value.is_complete()) {
            return full.value;
        }
        findings
            .iter()
            .fold(DateFinding::default(), |acc, f| acc.merge(f.value))
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<DateFinding>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .find(|m| m.value.is_complete())
    }

    /// All findings in pattern priority order, partial ones included.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lowered = text.to_lowercase();
        let mut results = Vec::new();

        for (rank, date_pattern) in DATE_PATTERNS.iter().enumerate() {
            for caps in date_pattern.pattern.captures_iter(&lowered) {
                let finding = match date_pattern.shape {
                    DateShape::Year => DateFinding {
                        year: parse_year(&caps[1]),
                        month: None,
                    },
                    DateShape::Month => DateFinding {
                        year: None,
                        month: month_from_name(&caps[1]),
                    },
                    DateShape::MonthYear => {
                        let (first, second) = (&caps[1], &caps[2]);
                        match parse_year(first) {
                            Some(year) => DateFinding {
                                year: Some(year),
                                month: month_from_name(second),
                            },
                            None => DateFinding {
                                year: parse_year(second),
                                month: month_from_name(first),
                            },
                        }
                    }
                };

                if finding.year.is_none() && finding.month.is_none() {
                    continue;
                }

                let Some(full_match) = caps.get(0) else {
                    continue;
                };
                results.push(
                    ExtractionMatch::new(finding, rank, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_for_month_year() {
        let finding = DateExtractor::new().find("Interactive Brokers reports metrics for August 2025");
        assert_eq!(
            finding,
            DateFinding {
                year: Some(2025),
                month: Some(8)
            }
        );
    }

    #[test]
    fn test_priority_order() {
        // "for" outranks the dated byline even though the byline comes first
        let text = "Greenwich, September 2, 2025. Brokerage metrics for August 2025.";
        let found = DateExtractor::new().extract(text).unwrap();
        assert_eq!(found.value.month, Some(8));
        assert_eq!(found.source, "for august 2025");
    }

    #[test]
    fn test_year_only_is_partial() {
        let finding = DateExtractor::new().find("Electronic Brokerage 2025 % Change");
        assert_eq!(finding.year, Some(2025));
        assert_eq!(finding.month, None);
        assert!(DateExtractor::new().extract("2025 % change").is_none());
    }

    #[test]
    fn test_month_only_is_partial() {
        let finding = DateExtractor::new().find("performance metrics for july");
        assert_eq!(finding, DateFinding { year: None, month: Some(7) });
    }

    #[test]
    fn test_out_of_range_year_ignored() {
        let finding = DateExtractor::new().find("for August 1999");
        assert_eq!(finding.year, None);
        assert_eq!(finding.month, Some(8));
    }

    #[test]
    fn test_no_dates() {
        assert_eq!(DateExtractor::new().find(""), DateFinding::default());
    }

    #[test]
    fn test_merge_keeps_existing() {
        let a = DateFinding { year: Some(2025), month: None };
        let b = DateFinding { year: Some(2024), month: Some(3) };
        assert_eq!(a.merge(b), DateFinding { year: Some(2025), month: Some(3) });
    }
}
