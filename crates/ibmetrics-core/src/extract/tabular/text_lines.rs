//! Text-line strategy: regex catalogue over the lines under the month header.

use tracing::{debug, trace};

use super::matching::resolve_column;
use super::TabularStrategy;
use crate::error::{DocumentRole, ExtractionError};
use crate::extract::rules::{numeric_tokens, DART_PER_ACCOUNT, METRIC_RULES};
use crate::extract::Result;
use crate::models::config::TabularConfig;
use crate::models::metrics::{BrokerageMetric, MetricMap};
use crate::models::period::{months_in_line, token_is_month, TargetPeriod};
use crate::pdf::Document;

/// Matches metric rows in the document text and picks the value at the
/// target month's position among the row's numeric tokens.
pub struct TextLineStrategy {
    line_window: usize,
}

impl TextLineStrategy {
    pub fn new(config: &TabularConfig) -> Self {
        Self {
            line_window: config.line_window,
        }
    }

    /// Index of the first line naming Jan, Feb, Mar and the target month.
    fn find_header(lines: &[&str], period: TargetPeriod) -> Option<usize> {
        lines.iter().position(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            ["Jan", "Feb", "Mar", period.abbreviation()]
                .iter()
                .all(|abbr| tokens.iter().any(|t| token_is_month(t, abbr)))
        })
    }

    /// Extract metrics from raw text.
    pub fn extract_text(&self, text: &str, period: TargetPeriod) -> Result<MetricMap> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText(DocumentRole::Brokerage));
        }

        let year = period.year().to_string();
        if !text.contains(&year) {
            return Err(ExtractionError::Strategy(format!(
                "target year {} not found in document",
                year
            )));
        }

        let lines: Vec<&str> = text.lines().collect();
        let header = Self::find_header(&lines, period).ok_or_else(|| {
            ExtractionError::Strategy(format!(
                "could not find header line with {}",
                period.abbreviation()
            ))
        })?;
        trace!("Header line: {}", lines[header]);

        let column = resolve_column(&months_in_line(lines[header]), period)?;
        debug!(
            "Target month {} mapped to data column {}",
            period.abbreviation(),
            column
        );

        let mut metrics = MetricMap::new();
        let end = (header + 1 + self.line_window).min(lines.len());

        for idx in header + 1..end {
            let line = lines[idx].trim();
            if line.is_empty() {
                continue;
            }

            // Wrapped labels continue on the next line
            let combined = match lines.get(idx + 1).map(|l| l.trim()) {
                Some(next)
                    if !next.is_empty()
                        && (next.contains("Annualized") || line.split_whitespace().count() < 3) =>
                {
                    format!("{} {}", line, next)
                }
                _ => line.to_string(),
            };

            for rule in METRIC_RULES.iter() {
                if metrics.contains_key(&rule.metric) || !rule.matches(&combined) {
                    continue;
                }
                let values = numeric_tokens(&combined);
                trace!("Line: {} numeric parts: {:?}", combined, values);
                if let Some(value) = values.into_iter().nth(column) {
                    debug!("Found {}: {}", rule.metric, value);
                    metrics.insert(rule.metric, value);
                }
            }

            let dart = BrokerageMetric::ClearedAvgDartPerAccount;
            if DART_PER_ACCOUNT.is_match(line) && !metrics.contains_key(&dart) {
                if let Some(value) = numeric_tokens(&combined).into_iter().nth(column) {
                    debug!("Found {}: {}", dart, value);
                    metrics.insert(dart, value);
                }
            }
        }

        Ok(metrics)
    }
}

impl TabularStrategy for TextLineStrategy {
    fn name(&self) -> &'static str {
        "text-line"
    }

    fn extract(&self, document: &Document, period: TargetPeriod) -> Result<MetricMap> {
        self.extract_text(&document.text(), period)
    }
}
