//! Table strategy: read the target month column of detected tables.

use tracing::{debug, trace};

use super::matching::{best_metric, resolve_column};
use super::TabularStrategy;
use crate::error::ExtractionError;
use crate::extract::rules::{normalize, TABLE_NUMERIC};
use crate::extract::Result;
use crate::models::config::TabularConfig;
use crate::models::metrics::MetricMap;
use crate::models::period::{month_in_token, TargetPeriod};
use crate::pdf::{Document, Table};

fn cell_months(cell: &Option<String>) -> Vec<u32> {
    cell.as_deref()
        .map(|c| c.split_whitespace().filter_map(month_in_token).collect())
        .unwrap_or_default()
}

/// Reads metric values from the first page's tables.
pub struct TableStrategy {
    word_match_ratio: f64,
}

impl TableStrategy {
    pub fn new(config: &TabularConfig) -> Self {
        Self {
            word_match_ratio: config.word_match_ratio,
        }
    }

    /// Header row index and target column of a table.
    fn locate(table: &Table, period: TargetPeriod) -> Result<Option<(usize, usize)>> {
        let Some(header_idx) = table
            .iter()
            .position(|row| row.iter().any(|cell| !cell_months(cell).is_empty()))
        else {
            return Ok(None);
        };

        let header = &table[header_idx];
        let Some(column) = header
            .iter()
            .position(|cell| cell_months(cell).contains(&period.month()))
        else {
            return Ok(None);
        };

        let months: Vec<u32> = header.iter().flat_map(cell_months).collect();
        resolve_column(&months, period)?;
        Ok(Some((header_idx, column)))
    }

    fn read_table(&self, table: &Table, header_idx: usize, column: usize, metrics: &mut MetricMap) {
        for row in &table[header_idx + 1..] {
            let label = row.first().and_then(|c| c.as_deref()).unwrap_or("");
            let cell = row.get(column).and_then(|c| c.as_deref()).unwrap_or("");
            if label.is_empty() || cell.is_empty() {
                continue;
            }

            let Some(metric) = best_metric(label, self.word_match_ratio) else {
                continue;
            };
            if metrics.contains_key(&metric) {
                continue;
            }

            let value = normalize(cell);
            if TABLE_NUMERIC.is_match(&value) {
                trace!("Table: {} = {}", metric, value);
                metrics.insert(metric, value);
            }
        }
    }
}

impl TabularStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, document: &Document, period: TargetPeriod) -> Result<MetricMap> {
        let page = document
            .first_page()
            .ok_or_else(|| ExtractionError::Strategy("document has no pages".to_string()))?;
        let tables = page.tables();
        if tables.is_empty() {
            return Err(ExtractionError::Strategy("no tables found".to_string()));
        }

        let mut metrics = MetricMap::new();
        let mut layout_error = None;
        let mut located = 0;

        for (idx, table) in tables.iter().enumerate() {
            if table.len() < 2 {
                continue;
            }
            match Self::locate(table, period) {
                Ok(Some((header_idx, column))) => {
                    debug!("Table {}: header row {}, column {}", idx, header_idx, column);
                    located += 1;
                    self.read_table(table, header_idx, column, &mut metrics);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Table {} skipped: {}", idx, e);
                    layout_error.get_or_insert(e);
                }
            }
        }

        if located == 0 {
            return Err(layout_error.unwrap_or_else(|| {
                ExtractionError::Strategy(format!(
                    "no table with a {} column",
                    period.abbreviation()
                ))
            }));
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

    fn cells(items: &[&str]) -> Vec<Option<String>> {
        items
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    fn header() -> Vec<Option<String>> {
        cells(&[
            "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ])
    }

    fn document(tables: Vec<Table>) -> Document {
        Document::new(vec![Page::new("").with_tables(tables)])
    }

    #[test]
    fn test_reads_target_column() {
        let table = vec![
            header(),
            cells(&["Total Accounts", "2,500.1", "2,510.3", "2,520.4", "2,530.0", "2,535.5", "2,540.2", "2,545.8", "2,550.9"]),
            cells(&["Cash as % of Assets", "", "", "", "", "", "", "", "12%"]),
            cells(&["Client Margin Loans", "$60.1", "$61.2", "$62.3", "$63.4", "$64.5", "$65.6", "$66.7", "$67.8"]),
        ];

        let strategy = TableStrategy::new(&TabularConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let metrics = strategy.extract(&document(vec![table]), period).unwrap();

        assert_eq!(
            metrics.get(&BrokerageMetric::TotalAccounts).map(String::as_str),
            Some("2550.9")
        );
        assert_eq!(
            metrics.get(&BrokerageMetric::ClientMarginLoans).map(String::as_str),
            Some("67.8")
        );
        // "12%" is not purely numeric
        assert!(!metrics.contains_key(&BrokerageMetric::CashAsPercentOfAssets));
    }

    #[test]
    fn test_no_tables() {
        let strategy = TableStrategy::new(&TabularConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        assert!(strategy.extract(&document(Vec::new()), period).is_err());
    }

    #[test]
    fn test_table_without_target_month() {
        let table = vec![
            cells(&["", "Jan", "Feb", "Mar"]),
            cells(&["Total Accounts", "1", "2", "3"]),
        ];
        let strategy = TableStrategy::new(&TabularConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let err = strategy.extract(&document(vec![table]), period).unwrap_err();
        assert!(matches!(err, ExtractionError::Strategy(_)));
    }

    #[test]
    fn test_short_header_unsupported() {
        let table = vec![
            cells(&["", "Jun", "Jul", "Aug"]),
            cells(&["Total Accounts", "1", "2", "3"]),
        ];
        let strategy = TableStrategy::new(&TabularConfig::default());
        let period = TargetPeriod::new(2025, 8).unwrap();
        let err = strategy.extract(&document(vec![table]), period).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedLayout(_)));
    }
}
