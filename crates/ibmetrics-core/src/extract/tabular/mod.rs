//! Tabular extraction from the monthly brokerage report.
//!
//! Three strategies run in priority order: text lines, word coordinates and
//! detected tables. The first strategy that finds enough metrics wins.

mod coordinates;
pub mod matching;
mod tables;
mod text_lines;

pub use coordinates::CoordinateStrategy;
pub use tables::TableStrategy;
pub use text_lines::TextLineStrategy;

use tracing::{info, warn};

use super::{select_first_sufficient, Attempt, Result, StrategyOutcome};
use crate::models::config::{PdfConfig, TabularConfig};
use crate::models::metrics::MetricMap;
use crate::models::period::TargetPeriod;
use crate::pdf::Document;

/// One way of reading the metrics table.
pub trait TabularStrategy {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Extract metric values for the target month.
    fn extract(&self, document: &Document, period: TargetPeriod) -> Result<MetricMap>;
}

/// Metrics recovered by the cascade.
#[derive(Debug, Clone)]
pub struct TabularResult {
    pub metrics: MetricMap,
    /// Name of the strategy that produced `metrics`.
    pub strategy: &'static str,
    /// Diagnostics of strategies tried before it.
    pub diagnostics: Vec<String>,
}

/// Runs the tabular strategies in order.
pub struct TabularEngine {
    strategies: Vec<Box<dyn TabularStrategy>>,
    min_metrics: usize,
    fallback_min_metrics: usize,
}

impl TabularEngine {
    /// Create the engine with the standard strategy order.
    pub fn new(config: &TabularConfig, pdf: &PdfConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(TextLineStrategy::new(config)),
                Box::new(CoordinateStrategy::new(config, pdf)),
                Box::new(TableStrategy::new(config)),
            ],
            min_metrics: config.min_metrics,
            fallback_min_metrics: config.fallback_min_metrics,
        }
    }

    /// Create the engine with custom strategies.
    pub fn with_strategies(
        config: &TabularConfig,
        strategies: Vec<Box<dyn TabularStrategy>>,
    ) -> Self {
        Self {
            strategies,
            min_metrics: config.min_metrics,
            fallback_min_metrics: config.fallback_min_metrics,
        }
    }

    /// Run the cascade for one target month.
    pub fn extract(&self, document: &Document, period: TargetPeriod) -> Result<TabularResult> {
        let last = self.strategies.len().saturating_sub(1);

        let attempts = self.strategies.iter().enumerate().map(|(i, strategy)| {
            let threshold = if i == last {
                self.fallback_min_metrics
            } else {
                self.min_metrics
            };
            info!("Trying {} extraction...", strategy.name());
            let outcome = StrategyOutcome::classify(
                strategy.name(),
                strategy.extract(document, period),
                threshold,
            );
            if !matches!(outcome, StrategyOutcome::Sufficient(_)) && i != last {
                warn!("{} extraction insufficient, trying next strategy", strategy.name());
            }
            Attempt {
                strategy: strategy.name(),
                outcome,
            }
        });

        let selection = select_first_sufficient(attempts)?;
        info!(
            "{} extraction successful: {} metrics found",
            selection.strategy,
            selection.metrics.len()
        );
        Ok(TabularResult {
            metrics: selection.metrics,
            strategy: selection.strategy,
            diagnostics: selection.diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::metrics::BrokerageMetric;
    use crate::pdf::{Page, Table, Word};
    use pretty_assertions::assert_eq;

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    const ROWS: [(&str, [&str; 8]); 6] = [
        ("Total Accounts", ["2,500.1", "2,510.3", "2,520.4", "2,530.0", "2,535.5", "2,540.2", "2,545.8", "2,550.9"]),
        ("Net New Accounts", ["32.1", "31.0", "30.2", "29.9", "28.7", "27.5", "26.1", "25.0"]),
        ("Total Client DARTs", ["3,100", "3,200", "3,300", "3,400", "3,500", "3,600", "3,700", "3,800"]),
        ("Options Contracts", ["100", "110", "120", "130", "140", "150", "160", "170"]),
        ("Client Equity", ["$560.1", "$571.2", "$580.3", "$590.4", "$600.5", "$610.6", "$620.7", "$630.8"]),
        ("Client Margin Loans", ["$60.1", "$61.2", "$62.3", "$63.4", "$64.5", "$65.6", "$66.7", "$67.8"]),
    ];

    fn report_text() -> String {
        let mut text = format!("Electronic Brokerage 2025\n{}\n", MONTHS.join(" "));
        for (label, values) in ROWS {
            text.push_str(&format!("{} {}\n", label, values.join(" ")));
        }
        text
    }

    fn report_table() -> Table {
        let mut header = vec![None];
        header.extend(MONTHS.iter().map(|m| Some(m.to_string())));
        let mut table = vec![header];
        for (label, values) in ROWS {
            let mut row = vec![Some(label.to_string())];
            row.extend(values.iter().map(|v| Some(v.to_string())));
            table.push(row);
        }
        table
    }

    fn august() -> TargetPeriod {
        TargetPeriod::new(2025, 8).unwrap()
    }

    #[test]
    fn test_text_line_wins_when_sufficient() {
        let doc = Document::new(vec![Page::new(report_text())]);
        let engine = TabularEngine::new(&TabularConfig::default(), &PdfConfig::default());
        let result = engine.extract(&doc, august()).unwrap();

        assert_eq!(result.strategy, "text-line");
        assert_eq!(result.metrics.len(), 6);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_falls_through_to_tables() {
        // No text and no words: only the table strategy can read the page
        let doc = Document::new(vec![Page::new("").with_tables(vec![report_table()])]);
        let engine = TabularEngine::new(&TabularConfig::default(), &PdfConfig::default());
        let result = engine.extract(&doc, august()).unwrap();

        assert_eq!(result.strategy, "table");
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(
            result.metrics.get(&BrokerageMetric::TotalAccounts).map(String::as_str),
            Some("2550.9")
        );
    }

    #[test]
    fn test_text_and_table_agree() {
        let text_doc = Document::new(vec![Page::new(report_text())]);
        let table_doc = Document::new(vec![Page::new("").with_tables(vec![report_table()])]);
        let config = TabularConfig::default();

        let from_text = TextLineStrategy::new(&config)
            .extract(&text_doc, august())
            .unwrap();
        let from_table = TableStrategy::new(&config)
            .extract(&table_doc, august())
            .unwrap();

        assert_eq!(from_text.len(), ROWS.len());
        assert_eq!(from_text, from_table);
    }

    #[test]
    fn test_all_strategies_failed() {
        let doc = Document::new(vec![Page::new("nothing useful here")
            .with_words(vec![Word::new("nothing", 10.0, 10.0)])]);
        let engine = TabularEngine::new(&TabularConfig::default(), &PdfConfig::default());

        match engine.extract(&doc, august()) {
            Err(ExtractionError::AllStrategiesFailed { attempts }) => {
                assert_eq!(attempts.len(), 3);
                assert!(attempts[0].contains("text-line"));
                assert!(attempts[1].contains("coordinate"));
                assert!(attempts[2].contains("table"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    struct Unreachable;

    impl TabularStrategy for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        fn extract(&self, _: &Document, _: TargetPeriod) -> Result<MetricMap> {
            panic!("strategy after the winner must not run");
        }
    }

    #[test]
    fn test_later_strategies_not_run() {
        let config = TabularConfig::default();
        let engine = TabularEngine::with_strategies(
            &config,
            vec![Box::new(TextLineStrategy::new(&config)), Box::new(Unreachable)],
        );
        let doc = Document::new(vec![Page::new(report_text())]);
        let result = engine.extract(&doc, august()).unwrap();
        assert_eq!(result.strategy, "text-line");
    }

    #[test]
    fn test_insufficient_text_line_cascades() {
        // Two metrics are below the minimum for the first strategy
        let text = format!(
            "2025\n{}\nTotal Accounts {}\nClient Equity {}\n",
            MONTHS.join(" "),
            ROWS[0].1.join(" "),
            ROWS[4].1.join(" ")
        );
        let doc = Document::new(vec![Page::new(text)]);
        let engine = TabularEngine::new(&TabularConfig::default(), &PdfConfig::default());

        match engine.extract(&doc, august()) {
            Err(ExtractionError::AllStrategiesFailed { attempts }) => {
                assert!(attempts[0].contains("2 metrics"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
