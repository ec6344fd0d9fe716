//! Per-product figures from the press release text.

use tracing::{debug, info, warn};

use super::rules::{normalize, normalize_figure, PRODUCT_PATTERNS};
use super::Result;
use crate::error::{DocumentRole, ExtractionError};
use crate::models::config::NarrativeConfig;
use crate::models::metrics::{NarrativeData, PatternSet, Product, ProductFigures};

/// Figures recovered from the press release.
#[derive(Debug, Clone, Default)]
pub struct NarrativeResult {
    pub data: NarrativeData,
    /// Non-fatal problems, such as products no pattern matched.
    pub diagnostics: Vec<String>,
}

impl NarrativeResult {
    /// Products with no figures, in declaration order.
    pub fn missing(&self) -> Vec<Product> {
        Product::ALL
            .iter()
            .copied()
            .filter(|p| !self.data.contains_key(p))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.data.len() == Product::ALL.len()
    }
}

/// Applies the primary and then the backup product patterns.
pub struct NarrativeEngine {
    config: NarrativeConfig,
}

impl NarrativeEngine {
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    /// Extract order size and commission per product.
    ///
    /// A product resolved by an earlier pattern is not reprocessed.
    pub fn extract(&self, text: &str) -> Result<NarrativeResult> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText(DocumentRole::PressRelease));
        }

        let mut result = NarrativeResult::default();

        for rule in PRODUCT_PATTERNS.iter() {
            if rule.set == PatternSet::Backup && !self.config.use_backup_patterns {
                continue;
            }
            if result.data.contains_key(&rule.product) {
                continue;
            }

            let Some(caps) = rule.pattern.captures(text) else {
                continue;
            };
            let order_size = normalize_figure(&caps[1]);
            let commission = normalize(&caps[2]);
            if order_size.is_empty() || commission.is_empty() {
                debug!("{} {} pattern matched without values", rule.product, rule.set);
                continue;
            }

            info!(
                "Found {} via {} pattern: order size {}, commission {}",
                rule.product, rule.set, order_size, commission
            );
            result.data.insert(
                rule.product,
                ProductFigures {
                    order_size,
                    commission,
                    pattern_set: rule.set,
                },
            );
        }

        let missing = result.missing();
        if !missing.is_empty() {
            let err = ExtractionError::NarrativeIncomplete {
                missing: missing.iter().map(|p| p.name().to_string()).collect(),
            };
            warn!("{}", err);
            result.diagnostics.push(err.to_string());
        }

        Ok(result)
    }
}

impl Default for NarrativeEngine {
    fn default() -> Self {
        Self::new(NarrativeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::ProductMetric;
    use pretty_assertions::assert_eq;

    const RELEASE: &str = "\
Interactive Brokers Reports Brokerage Metrics for August 2025

Average commission per cleared commissionable order:
Stocks 1,200,000 shares $0.85
Equity Options 7.8 contracts $3.16
Futures and Future Options 3.2 contracts $4.05
";

    #[test]
    fn test_primary_patterns() {
        let result = NarrativeEngine::default().extract(RELEASE).unwrap();

        let stocks = &result.data[&Product::Stocks];
        assert_eq!(stocks.order_size, "1200000");
        assert_eq!(stocks.commission, "0.85");
        assert_eq!(stocks.pattern_set, PatternSet::Primary);

        let options = &result.data[&Product::EquityOptions];
        assert_eq!(options.get(ProductMetric::AverageOrderSize), "7.8");
        assert_eq!(options.get(ProductMetric::AverageCommission), "3.16");

        let futures = &result.data[&Product::Futures];
        assert_eq!(futures.order_size, "3.2");
        assert_eq!(futures.commission, "4.05");

        assert!(result.is_complete());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_backup_pattern_for_futures() {
        let text = "Stocks 950 shares $1.10\nFutures 2.5 contracts $3.90\n";
        let result = NarrativeEngine::default().extract(text).unwrap();

        let futures = &result.data[&Product::Futures];
        assert_eq!(futures.order_size, "2.5");
        assert_eq!(futures.commission, "3.90");
        assert_eq!(futures.pattern_set, PatternSet::Backup);

        assert_eq!(result.missing(), vec![Product::EquityOptions]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].contains("Equity Options"));
    }

    #[test]
    fn test_backup_pattern_for_stocks() {
        // The first Stocks row lost its digits in the text layer
        let text = "\
Prior month
Stocks , shares $0.80

Current month
Stocks 1,200,000 shares $0.85
Equity Options 7.8 contracts $3.16
Futures and Future Options 3.2 contracts $4.05
";
        let result = NarrativeEngine::default().extract(text).unwrap();

        let stocks = &result.data[&Product::Stocks];
        assert_eq!(stocks.order_size, "1200000");
        assert_eq!(stocks.commission, "0.85");
        assert_eq!(stocks.pattern_set, PatternSet::Backup);

        let options = &result.data[&Product::EquityOptions];
        assert_eq!(options.order_size, "7.8");
        assert_eq!(options.commission, "3.16");
        assert_eq!(options.pattern_set, PatternSet::Primary);

        let futures = &result.data[&Product::Futures];
        assert_eq!(futures.order_size, "3.2");
        assert_eq!(futures.pattern_set, PatternSet::Primary);

        assert!(result.is_complete());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_backup_patterns_disabled() {
        let engine = NarrativeEngine::new(NarrativeConfig {
            use_backup_patterns: false,
        });
        let result = engine.extract("Futures 2.5 contracts $3.90").unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.missing().len(), 3);
    }

    #[test]
    fn test_empty_text() {
        let err = NarrativeEngine::default().extract("   ").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::NoText(DocumentRole::PressRelease)
        ));
    }
}
