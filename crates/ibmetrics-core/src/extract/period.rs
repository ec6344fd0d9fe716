//! Target period resolution for a document pair.

use tracing::{debug, info, warn};

use super::rules::{numeric_tokens, DateExtractor, DateFinding};
use super::Result;
use crate::error::ExtractionError;
use crate::models::config::{HintPolicy, PeriodConfig};
use crate::models::period::{months_in_line, TargetPeriod};
use crate::pdf::Document;

/// Minimum month tokens for a line to count as the table header.
const MIN_HEADER_MONTHS: usize = 3;

/// Infer the latest reported month from the brokerage table layout.
///
/// The header is the first line naming at least three months. The first later
/// line with at least `min_data_columns` numeric cells is taken as a data row;
/// its cell count is the number of months reported so far.
pub fn infer_month(text: &str, min_data_columns: usize) -> Option<u32> {
    let lines: Vec<&str> = text.lines().collect();
    let header = lines
        .iter()
        .position(|line| months_in_line(line).len() >= MIN_HEADER_MONTHS)?;
    let header_months = months_in_line(lines[header]).len();

    let cells = lines[header + 1..]
        .iter()
        .filter(|line| months_in_line(line).len() < MIN_HEADER_MONTHS)
        .map(|line| numeric_tokens(line).len())
        .find(|count| *count >= min_data_columns.max(1))?;

    let month = cells.min(header_months).min(12);
    debug!(
        "Inferred month {} from {} data cells under a {}-month header",
        month, cells, header_months
    );
    Some(month as u32)
}

/// Resolves the reporting period from a hint and document content.
pub struct PeriodResolver {
    config: PeriodConfig,
    dates: DateExtractor,
}

impl PeriodResolver {
    pub fn new(config: PeriodConfig) -> Self {
        Self {
            config,
            dates: DateExtractor::new(),
        }
    }

    /// Resolve the target period.
    ///
    /// A malformed hint is ignored. Content components found in the brokerage
    /// report are never overridden by the press release.
    pub fn resolve(
        &self,
        hint: Option<&str>,
        brokerage: &Document,
        press: Option<&Document>,
    ) -> Result<TargetPeriod> {
        let hinted = hint.and_then(|h| {
            let period = TargetPeriod::from_hint(h);
            if period.is_none() {
                warn!("Ignoring malformed period hint '{}'", h);
            }
            period
        });

        if let (Some(period), HintPolicy::PreferHint) = (hinted, self.config.hint_policy) {
            debug!("Using period hint {}", period);
            return Ok(period);
        }

        let finding = self.infer(brokerage, press);
        match (hinted, complete(finding)) {
            (Some(hinted), Some(found)) => {
                if hinted != found {
                    warn!(
                        "Period hint {} disagrees with document content {}, using content",
                        hinted, found
                    );
                }
                Ok(found)
            }
            (Some(hinted), None) => {
                debug!("Content period incomplete, using hint {}", hinted);
                Ok(hinted)
            }
            (None, Some(found)) => {
                info!("Resolved period {} from document content", found);
                Ok(found)
            }
            (None, None) => Err(ExtractionError::PeriodUnresolved {
                year: finding.year,
                month: finding.month,
            }),
        }
    }

    /// Content-based finding for a pair, brokerage first.
    pub fn infer(&self, brokerage: &Document, press: Option<&Document>) -> DateFinding {
        let mut finding = self.infer_text(&brokerage.text());
        if finding.is_complete() {
            return finding;
        }

        if let Some(press) = press {
            let other = self.infer_text(&press.text());
            debug!("Filling period from press release: {:?}", other);
            finding = finding.merge(other);
        }
        finding
    }

    fn infer_text(&self, text: &str) -> DateFinding {
        let mut finding = self.dates.find(text);
        if finding.year.is_some() && finding.month.is_none() {
            finding.month = infer_month(text, self.config.min_data_columns);
        }
        finding
    }
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new(PeriodConfig::default())
    }
}

fn complete(finding: DateFinding) -> Option<TargetPeriod> {
    match (finding.year, finding.month) {
        (Some(year), Some(month)) => TargetPeriod::new(year, month).ok(),
        _ => None,
    }
}
