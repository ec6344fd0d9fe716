//! Coordinate strategy: locate the target month's column band on the first
//! page and read values from words inside it.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::matching::{best_metric, resolve_column};
use super::TabularStrategy;
use crate::error::ExtractionError;
use crate::extract::rules::{normalize, COORDINATE_NUMERIC};
use crate::extract::Result;
use crate::models::config::{PdfConfig, TabularConfig};
use crate::models::metrics::MetricMap;
use crate::models::period::{month_in_token, TargetPeriod};
use crate::pdf::layout::group_lines;
use crate::pdf::{Document, Word};

/// Minimum month labels needed to locate a column band.
const MIN_MONTH_HEADERS: usize = 3;

/// Smallest usable row bucket (points).
const MIN_ROW_BUCKET: f64 = 0.1;

/// Horizontal band `[start, end)` of the target month column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnBand {
    start: f64,
    end: f64,
}

impl ColumnBand {
    fn contains(&self, x: f64) -> bool {
        self.start <= x && x < self.end
    }
}

/// Reads metric values by word position.
pub struct CoordinateStrategy {
    year_tolerance: f64,
    column_tolerance: f64,
    row_bucket: f64,
    word_match_ratio: f64,
    y_tolerance: f64,
}

impl CoordinateStrategy {
    pub fn new(config: &TabularConfig, pdf: &PdfConfig) -> Self {
        Self {
            year_tolerance: config.year_tolerance,
            column_tolerance: config.column_tolerance,
            row_bucket: config.row_bucket,
            word_match_ratio: config.word_match_ratio,
            y_tolerance: pdf.y_tolerance,
        }
    }

    /// Find the month header row under the year label and the target band.
    fn column_band(&self, words: &[Word], period: TargetPeriod) -> Result<ColumnBand> {
        let year = period.year().to_string();
        let year_word = words
            .iter()
            .find(|w| w.text.contains(&year))
            .ok_or_else(|| {
                ExtractionError::Strategy(format!("year {} not found in word coordinates", year))
            })?;

        let candidates: Vec<Word> = words
            .iter()
            .filter(|w| {
                month_in_token(&w.text).is_some() && w.top > year_word.top - self.year_tolerance
            })
            .cloned()
            .collect();

        // The topmost line of month labels is the header
        let header: Vec<&Word> = group_lines(&candidates, self.y_tolerance)
            .into_iter()
            .find(|line| line.len() >= MIN_MONTH_HEADERS)
            .ok_or_else(|| {
                ExtractionError::Strategy(format!(
                    "insufficient month headers found: {}",
                    candidates.len()
                ))
            })?;

        let months: Vec<u32> = header
            .iter()
            .filter_map(|w| month_in_token(&w.text))
            .collect();
        resolve_column(&months, period)?;

        let position = header
            .iter()
            .position(|w| month_in_token(&w.text) == Some(period.month()))
            .ok_or_else(|| {
                ExtractionError::Strategy(format!(
                    "could not find column boundaries for {}",
                    period.abbreviation()
                ))
            })?;

        let start = header[position].x0 - self.column_tolerance;
        let end = header
            .get(position + 1)
            .map(|next| next.x0 - self.column_tolerance)
            .unwrap_or(f64::INFINITY);
        Ok(ColumnBand { start, end })
    }

    fn row_key(&self, top: f64) -> i64 {
        (top / self.row_bucket.max(MIN_ROW_BUCKET)).round() as i64
    }
}

impl TabularStrategy for CoordinateStrategy {
    fn name(&self) -> &'static str {
        "coordinate"
    }

    fn extract(&self, document: &Document, period: TargetPeriod) -> Result<MetricMap> {
        let page = document
            .first_page()
            .ok_or_else(|| ExtractionError::Strategy("document has no pages".to_string()))?;
        let words = page.words();
        if words.is_empty() {
            return Err(ExtractionError::Strategy(
                "no words extracted from first page".to_string(),
            ));
        }

        let band = self.column_band(words, period)?;
        debug!("Column band for {}: {:?}", period.abbreviation(), band);

        let mut rows: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
        for word in words {
            rows.entry(self.row_key(word.top)).or_default().push(word);
        }

        let mut metrics = MetricMap::new();
        for row in rows.values_mut() {
            row.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
            let text = row
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            let Some(metric) = best_metric(&text, self.word_match_ratio) else {
                continue;
            };
            if metrics.contains_key(&metric) {
                continue;
            }

            let value = row
                .iter()
                .filter(|w| COORDINATE_NUMERIC.is_match(&w.text) && band.contains(w.x0))
                .map(|w| normalize(&w.text))
                .find(|v| !v.is_empty());

            if let Some(value) = value {
                trace!("Coordinate: {} = {}", metric, value);
                metrics.insert(metric, value);
            }
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::BrokerageMetric;
    use crate::pdf::Page;
    use pretty_assertions::assert_eq;

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    fn column_x(index: usize) -> f64 {
        200.0 + index as f64 * 40.0
    }

    fn header(top: f64) -> Vec<Word> {
        let mut words = vec![Word::new("2025", 100.0, top - 12.0)];
        words.extend(
            MONTHS
                .iter()
                .enumerate()
                .map(|(i, m)| Word::new(*m, column_x(i), top)),
        );
        words
    }

    fn data_row(top: f64, label: &[&str], values: &[&str]) -> Vec<Word> {
        let mut words: Vec<Word> = label
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(*t, 20.0 + i as f64 * 30.0, top))
            .collect();
        words.extend(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Word::new(*v, column_x(i) + 2.0, top + 0.5)),
        );
        words
    }

    fn document(words: Vec<Word>) -> Document {
        Document::new(vec![Page::new("").with_words(words)])
    }

    #[test]
    fn test_reads_values_in_band() {
        let mut words = header(100.0);
        words.extend(data_row(
            120.0,
            &["Total", "Accounts"],
            &["2,500.1", "2,510.3", "2,520.4", "2,530.0", "2,535.5", "2,540.2", "2,545.8", "2,550.9"],
        ));
        words.extend(data_row(
            140.0,
            &["Client", "Equity"],
            &["$560.1", "$571.2", "$580.3", "$590.4", "$600.5", "$610.6", "$620.7", "$630.8"],
        ));

        let strategy = CoordinateStrategy::new(&TabularConfig::default(), &PdfConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let metrics = strategy.extract(&document(words), period).unwrap();

        assert_eq!(
            metrics.get(&BrokerageMetric::TotalAccounts).map(String::as_str),
            Some("2550.9")
        );
        assert_eq!(
            metrics.get(&BrokerageMetric::ClientEquity).map(String::as_str),
            Some("630.8")
        );
        assert_eq!(metrics.len(), 2);
    }

    #[test]
    fn test_header_lines_use_pdf_line_tolerance() {
        // Every other month label sits 4pt lower
        let mut words: Vec<Word> = header(100.0)
            .into_iter()
            .enumerate()
            .map(|(i, mut w)| {
                if i % 2 == 0 && i > 0 {
                    w.top += 4.0;
                }
                w
            })
            .collect();
        words.extend(data_row(
            120.0,
            &["Total", "Accounts"],
            &["1", "2", "3", "4", "5", "6", "7", "8"],
        ));
        let period = TargetPeriod::new(2025, 8).unwrap();
        let tabular = TabularConfig::default();

        let tight = CoordinateStrategy::new(&tabular, &PdfConfig::default());
        assert!(tight.extract(&document(words.clone()), period).is_err());

        let pdf = PdfConfig {
            y_tolerance: 5.0,
            ..PdfConfig::default()
        };
        let loose = CoordinateStrategy::new(&tabular, &pdf);
        let metrics = loose.extract(&document(words), period).unwrap();
        assert_eq!(
            metrics.get(&BrokerageMetric::TotalAccounts).map(String::as_str),
            Some("8")
        );
    }

    #[test]
    fn test_zero_row_bucket_is_clamped() {
        let tabular = TabularConfig {
            row_bucket: 0.0,
            ..TabularConfig::default()
        };
        let strategy = CoordinateStrategy::new(&tabular, &PdfConfig::default());
        assert_eq!(strategy.row_key(120.0), 1200);
        assert_eq!(strategy.row_key(120.02), 1200);
    }

    #[test]
    fn test_row_with_partial_label_skipped() {
        let mut words = header(100.0);
        words.extend(data_row(120.0, &["Client"], &["1", "2", "3", "4", "5", "6", "7", "8"]));

        let strategy = CoordinateStrategy::new(&TabularConfig::default(), &PdfConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let metrics = strategy.extract(&document(words), period).unwrap();
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_year_not_found() {
        let strategy = CoordinateStrategy::new(&TabularConfig::default(), &PdfConfig::default());
        let period = TargetPeriod::new(2024, 8).unwrap();
        let err = strategy.extract(&document(header(100.0)), period).unwrap_err();
        assert!(err.to_string().contains("2024"));
    }

    #[test]
    fn test_no_words() {
        let strategy = CoordinateStrategy::new(&TabularConfig::default(), &PdfConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        assert!(strategy.extract(&document(Vec::new()), period).is_err());
    }

    #[test]
    fn test_partial_year_header_unsupported() {
        let words: Vec<Word> = header(100.0).into_iter().take(9).collect();
        let strategy = CoordinateStrategy::new(&TabularConfig::default(), &PdfConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let err = strategy.extract(&document(words), period).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedLayout(_)));
    }
}
