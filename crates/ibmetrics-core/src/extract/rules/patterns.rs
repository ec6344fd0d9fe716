//! Regex patterns for the brokerage report and the press release.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::metrics::{BrokerageMetric, PatternSet, Product};

/// A metric row recognizer of the text-line strategy.
pub struct MetricRule {
    pub metric: BrokerageMetric,
    pub pattern: Regex,
}

impl MetricRule {
    fn new(metric: BrokerageMetric, pattern: &str) -> Self {
        Self {
            metric,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// What a content date pattern can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// A single four-digit year group.
    Year,
    /// A single month-name group.
    Month,
    /// A month-name group and a year group, in either order.
    MonthYear,
}

/// A content date pattern, applied to lowercased text.
pub struct DatePattern {
    pub shape: DateShape,
    pub pattern: Regex,
}

impl DatePattern {
    fn new(shape: DateShape, pattern: &str) -> Self {
        Self {
            shape,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

/// A press release pattern capturing order size (group 1) and commission (group 2).
pub struct ProductPattern {
    pub product: Product,
    pub set: PatternSet,
    pub pattern: Regex,
}

impl ProductPattern {
    fn new(product: Product, set: PatternSet, pattern: &str) -> Self {
        Self {
            product,
            set,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

lazy_static! {
    // Metric row catalogue, tested in this order
    pub static ref METRIC_RULES: Vec<MetricRule> = vec![
        MetricRule::new(
            BrokerageMetric::TotalAccounts,
            r"(?i)Total Accounts[^\d]*(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::NetNewAccounts,
            r"(?i)Net New Accounts[^\d]*(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::TotalClientDarts,
            r"(?i)Total Client DARTs[^\d]*(\d+(?:,\d+)*)",
        ),
        MetricRule::new(
            BrokerageMetric::ClearedClientDarts,
            r"(?i)Cleared Client DARTs[^\d]*(\d+(?:,\d+)*)",
        ),
        MetricRule::new(
            BrokerageMetric::OptionsContracts,
            r"(?i)Options Contracts[^\d]*(\d+(?:,\d+)*)",
        ),
        MetricRule::new(
            BrokerageMetric::FuturesContracts,
            r"(?i)Futures Contracts[^\d]*(\d+(?:,\d+)*)",
        ),
        MetricRule::new(
            BrokerageMetric::StockShares,
            r"(?i)Stock Shares[^\d]*(\d+(?:,\d+)*)",
        ),
        MetricRule::new(
            BrokerageMetric::ClientEquity,
            r"(?i)Client Equity[^\d]*\$?(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::FdicProgramClientCredits,
            r"(?i)FDIC Program Client Credits[^\d]*\$?(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::ClientCreditsHeldAtBroker,
            r"(?i)Client Credits Held at Broker[^\d]*\$?(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::ClientCredits,
            r"(?i)Client Credits\(\d+\)[^\d]*\$?(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::ClientMarginLoans,
            r"(?i)Client Margin Loans[^\d]*\$?(\d+(?:,\d+)*\.?\d*)",
        ),
        MetricRule::new(
            BrokerageMetric::CashAsPercentOfAssets,
            r"(?i)Cash as % of Assets[^\d]*(\d+(?:\.?\d*))%?",
        ),
    ];

    // Literal triggers of the DART-per-account rule
    pub static ref DART_PER_ACCOUNT: Regex = Regex::new(
        r"Cleared Avg\. DART per Account|Annualized"
    ).unwrap();

    // Numeric cell shapes
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"^\$?[\d,]+\.?\d*$"
    ).unwrap();

    pub static ref COORDINATE_NUMERIC: Regex = Regex::new(
        r"^[$\d,.]+$"
    ).unwrap();

    pub static ref TABLE_NUMERIC: Regex = Regex::new(
        r"^\d+\.?\d*$"
    ).unwrap();

    // Content dates, in priority order
    pub static ref DATE_PATTERNS: Vec<DatePattern> = vec![
        DatePattern::new(DateShape::Year, r"(?i)(\d{4})\s*%?\s*change"),
        DatePattern::new(DateShape::Year, r"(?i)electronic\s+brokerage.*?(\d{4})"),
        DatePattern::new(DateShape::MonthYear, r"(?i)for\s+(\w+)\s+(\d{4})"),
        DatePattern::new(DateShape::MonthYear, r"(?i)(\w+)\s+(\d{4}),?\s*includes"),
        DatePattern::new(DateShape::MonthYear, r"(?i)(\w+)\s+\d+,\s+(\d{4})"),
        DatePattern::new(DateShape::Month, r"(?i)metrics\s+for\s+(\w+)"),
        DatePattern::new(DateShape::Month, r"(?i)performance\s+metrics\s+for\s+(\w+)"),
        DatePattern::new(DateShape::MonthYear, r"(?i)(\w+)\s+(\d{4})"),
    ];

    // Press release product figures
    pub static ref PRODUCT_PATTERNS: Vec<ProductPattern> = vec![
        ProductPattern::new(
            Product::Stocks,
            PatternSet::Primary,
            r"(?im)Stocks\s+([\d,]+\s+shares)\s+\$([\d.]+)",
        ),
        ProductPattern::new(
            Product::EquityOptions,
            PatternSet::Primary,
            r"(?im)Equity\s+Options\s+([\d.]+\s+contracts)\s+\$([\d.]+)",
        ),
        ProductPattern::new(
            Product::Futures,
            PatternSet::Primary,
            r"(?im)Futures\s+and\s+Future\s+Options\s+([\d.]+\s+contracts)\s+\$([\d.]+)",
        ),
        ProductPattern::new(
            Product::Stocks,
            PatternSet::Backup,
            r"(?im)Stocks\s+(\d+(?:,\d+)*)\s+shares\s+\$(\d+\.?\d*)",
        ),
        ProductPattern::new(
            Product::EquityOptions,
            PatternSet::Backup,
            r"(?im)Equity\s+Options\s+(\d+\.?\d*)\s+contracts\s+\$(\d+\.?\d*)",
        ),
        ProductPattern::new(
            Product::Futures,
            PatternSet::Backup,
            r"(?im)Futures\s+(\d+\.?\d*)\s+contracts\s+\$(\d+\.?\d*)",
        ),
    ];

    // Unit words trailing narrative figures
    pub static ref UNIT_WORDS: Regex = Regex::new(
        r"(?i)\s*\b(?:shares|contracts)\b"
    ).unwrap();
}

/// The catalogue rule for a metric, if it has one.
pub fn rule_for(metric: BrokerageMetric) -> Option<&'static MetricRule> {
    METRIC_RULES.iter().find(|r| r.metric == metric)
}
