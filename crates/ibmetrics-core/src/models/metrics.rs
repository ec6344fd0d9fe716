//! Metric vocabularies for both report documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A metric row of the monthly brokerage report.
///
/// Declaration order is the order used when iterating a [`MetricMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BrokerageMetric {
    TotalAccounts,
    NetNewAccounts,
    TotalClientDarts,
    ClearedClientDarts,
    ClearedAvgDartPerAccount,
    OptionsContracts,
    FuturesContracts,
    StockShares,
    ClientEquity,
    FdicProgramClientCredits,
    ClientCreditsHeldAtBroker,
    ClientCredits,
    ClientMarginLoans,
    CashAsPercentOfAssets,
}

impl BrokerageMetric {
    /// Every brokerage metric in declaration order.
    pub const ALL: [BrokerageMetric; 14] = [
        BrokerageMetric::TotalAccounts,
        BrokerageMetric::NetNewAccounts,
        BrokerageMetric::TotalClientDarts,
        BrokerageMetric::ClearedClientDarts,
        BrokerageMetric::ClearedAvgDartPerAccount,
        BrokerageMetric::OptionsContracts,
        BrokerageMetric::FuturesContracts,
        BrokerageMetric::StockShares,
        BrokerageMetric::ClientEquity,
        BrokerageMetric::FdicProgramClientCredits,
        BrokerageMetric::ClientCreditsHeldAtBroker,
        BrokerageMetric::ClientCredits,
        BrokerageMetric::ClientMarginLoans,
        BrokerageMetric::CashAsPercentOfAssets,
    ];

    /// Row label as printed in the report.
    pub fn name(&self) -> &'static str {
        match self {
            BrokerageMetric::TotalAccounts => "Total Accounts",
            BrokerageMetric::NetNewAccounts => "Net New Accounts",
            BrokerageMetric::TotalClientDarts => "Total Client DARTs",
            BrokerageMetric::ClearedClientDarts => "Cleared Client DARTs",
            BrokerageMetric::ClearedAvgDartPerAccount => {
                "Cleared Avg. DART per Account (Annualized)"
            }
            BrokerageMetric::OptionsContracts => "Options Contracts",
            BrokerageMetric::FuturesContracts => "Futures Contracts",
            BrokerageMetric::StockShares => "Stock Shares",
            BrokerageMetric::ClientEquity => "Client Equity",
            BrokerageMetric::FdicProgramClientCredits => "FDIC Program Client Credits",
            BrokerageMetric::ClientCreditsHeldAtBroker => "Client Credits Held at Broker",
            BrokerageMetric::ClientCredits => "Client Credits",
            BrokerageMetric::ClientMarginLoans => "Client Margin Loans",
            BrokerageMetric::CashAsPercentOfAssets => "Cash as % of Assets",
        }
    }

    /// Lowercased words of the label longer than three characters, stripped
    /// of surrounding punctuation.
    ///
    /// These are what the coordinate and table strategies match row labels on.
    pub fn significant_words(&self) -> Vec<String> {
        self.name()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().count() > 3)
            .map(|w| w.to_lowercase())
            .collect()
    }

    /// Look a metric up by its printed label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

impl fmt::Display for BrokerageMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metric name to normalized value for one target month.
pub type MetricMap = BTreeMap<BrokerageMetric, String>;

/// A product line reported in the press release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    Stocks,
    EquityOptions,
    Futures,
}

impl Product {
    pub const ALL: [Product; 3] = [Product::Stocks, Product::EquityOptions, Product::Futures];

    pub fn name(&self) -> &'static str {
        match self {
            Product::Stocks => "Stocks",
            Product::EquityOptions => "Equity Options",
            Product::Futures => "Futures",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-product figure reported in the press release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductMetric {
    AverageOrderSize,
    AverageCommission,
}

impl ProductMetric {
    pub fn name(&self) -> &'static str {
        match self {
            ProductMetric::AverageOrderSize => "Average Order Size",
            ProductMetric::AverageCommission => "Average Commission",
        }
    }
}

impl fmt::Display for ProductMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which narrative pattern set produced a product's figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSet {
    /// Narrative phrasing with the unit captured alongside the value.
    Primary,
    /// Stricter numeric-only phrasing.
    Backup,
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSet::Primary => write!(f, "primary"),
            PatternSet::Backup => write!(f, "backup"),
        }
    }
}

/// Order size and commission for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFigures {
    pub order_size: String,
    pub commission: String,
    pub pattern_set: PatternSet,
}

impl ProductFigures {
    pub fn get(&self, metric: ProductMetric) -> &str {
        match metric {
            ProductMetric::AverageOrderSize => &self.order_size,
            ProductMetric::AverageCommission => &self.commission,
        }
    }
}

/// Product figures recovered from the press release.
pub type NarrativeData = BTreeMap<Product, ProductFigures>;
