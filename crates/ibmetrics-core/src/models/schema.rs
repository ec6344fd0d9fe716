//! Canonical output schema and the static source mapping table.

use serde::{Deserialize, Serialize};

use super::metrics::{BrokerageMetric, Product, ProductMetric};
use super::period::TargetPeriod;

/// Where a canonical field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A row of the brokerage metrics table.
    Tabular(BrokerageMetric),
    /// A product figure from the press release.
    Narrative(Product, ProductMetric),
    /// Computed from other canonical fields after mapping.
    Derived,
}

/// One column of the canonical record.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Output identifier.
    pub id: &'static str,
    /// Human-readable caption written as the second header row.
    pub caption: &'static str,
    /// Source document and field.
    pub source: Source,
}

/// Identifier of the derived cash-as-percent-of-assets field.
pub const CASH_FIELD: &str = "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.CASH.M";
/// Identifier of the client credits total (derived numerator).
pub const CREDITS_TOTAL_FIELD: &str = "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.CREDITSTOTAL.M";
/// Identifier of the client equity field (derived denominator).
pub const EQUITY_FIELD: &str = "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.EQUITY.M";

/// Output columns in their fixed order.
pub static SCHEMA: [FieldSpec; 20] = [
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.ACCOUNTS.TOTAL.M",
        caption: "From Monthly Metrics:\n Accounts:\n Total Accounts:\n Thousands",
        source: Source::Tabular(BrokerageMetric::TotalAccounts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.ACCOUNTS.NETNEW.M",
        caption: "From Monthly Metrics:\n Accounts:\n Net New Accounts:\n Thousands",
        source: Source::Tabular(BrokerageMetric::NetNewAccounts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.DARTS.TOTAL.M",
        caption: "From Monthly Metrics:\n DARTs:\n Total Client DARTs:\n Thousands",
        source: Source::Tabular(BrokerageMetric::TotalClientDarts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.DARTS.CLEARED.M",
        caption: "From Monthly Metrics:\n DARTs:\n Cleared Client DARTs:\n Thousands",
        source: Source::Tabular(BrokerageMetric::ClearedClientDarts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.DARTS.CLEAREDAVG.M",
        caption: "From Monthly Metrics:\n DARTs:\n Cleared Avg. DART per Account:\n #",
        source: Source::Tabular(BrokerageMetric::ClearedAvgDartPerAccount),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.TRADING.OPTIONS.M",
        caption: "From Monthly Metrics:\n Trading Volumes:\n Options Contracts:\n Thousands",
        source: Source::Tabular(BrokerageMetric::OptionsContracts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.TRADING.FUTURES.M",
        caption: "From Monthly Metrics:\n Trading Volumes:\n Futures Contracts:\n Thousands",
        source: Source::Tabular(BrokerageMetric::FuturesContracts),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.TRADING.STOCKSHARES.M",
        caption: "From Monthly Metrics:\n Trading Volumes:\n Stock Shares:\n Thousands",
        source: Source::Tabular(BrokerageMetric::StockShares),
    },
    FieldSpec {
        id: EQUITY_FIELD,
        caption: "From Monthly Metrics:\n Account Levels ($):\n Client Equity:\n $ Bln.",
        source: Source::Tabular(BrokerageMetric::ClientEquity),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.FDIC.M",
        caption: "From Monthly Metrics:\n Account Levels ($):\n FDIC Program Client Credits:\n $ Bln.",
        source: Source::Tabular(BrokerageMetric::FdicProgramClientCredits),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.CREDITSATBROKER.M",
        caption: "From Monthly Metrics:\n Account Levels ($):\n Client Credits Held at Broker:\n $ Bln.",
        source: Source::Tabular(BrokerageMetric::ClientCreditsHeldAtBroker),
    },
    FieldSpec {
        id: CREDITS_TOTAL_FIELD,
        caption: "From Monthly Metrics:\n Account Levels ($):\n Client Credits (Total):\n $ Bln.",
        source: Source::Tabular(BrokerageMetric::ClientCredits),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.ACCOUNTLEVEL.MARGINLOANS.M",
        caption: "From Monthly Metrics:\n Account Levels ($):\n Client Margin Loans:\n $ Bln.",
        source: Source::Tabular(BrokerageMetric::ClientMarginLoans),
    },
    FieldSpec {
        id: CASH_FIELD,
        caption: "From Monthly Metrics:\n Account Levels ($):\n Cash as % of Assets:\n %",
        source: Source::Derived,
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGCOMMISSION.STOCK.M",
        caption: "From Press Release:\n Average Commission per Cleared Order:\n Stocks:\n $",
        source: Source::Narrative(Product::Stocks, ProductMetric::AverageCommission),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGCOMMISSION.EQUITYOPTIONS.M",
        caption: "From Press Release:\n Average Commission per Cleared Order:\n Equity Options:\n $",
        source: Source::Narrative(Product::EquityOptions, ProductMetric::AverageCommission),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGCOMMISSION.FUTURES.M",
        caption: "From Press Release:\n Average Commission per Cleared Order:\n Futures:\n $",
        source: Source::Narrative(Product::Futures, ProductMetric::AverageCommission),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGORDER.STOCK.M",
        caption: "From Press Release:\n Average Order Size:\n Stocks:\n # shares",
        source: Source::Narrative(Product::Stocks, ProductMetric::AverageOrderSize),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGORDER.EQUITYOPTIONS.M",
        caption: "From Press Release:\n Average Order Size:\n Equity Options:\n # contracts",
        source: Source::Narrative(Product::EquityOptions, ProductMetric::AverageOrderSize),
    },
    FieldSpec {
        id: "USA.OBD.INTERACTIVE.AVGORDER.FUTURES.M",
        caption: "From Press Release:\n Average Order Size:\n Futures:\n # contracts",
        source: Source::Narrative(Product::Futures, ProductMetric::AverageOrderSize),
    },
];

/// Position of a field identifier in [`SCHEMA`].
pub fn field_index(id: &str) -> Option<usize> {
    SCHEMA.iter().position(|spec| spec.id == id)
}

/// The normalized record produced for one document pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Reporting period.
    pub period: TargetPeriod,
    /// One value per [`SCHEMA`] entry, in schema order.
    pub values: Vec<Option<String>>,
}

impl CanonicalRecord {
    /// A record with every field empty.
    pub fn empty(period: TargetPeriod) -> Self {
        Self {
            period,
            values: vec![None; SCHEMA.len()],
        }
    }

    /// Value of a field by identifier.
    pub fn get(&self, id: &str) -> Option<&str> {
        field_index(id)
            .and_then(|i| self.values.get(i))
            .and_then(|v| v.as_deref())
    }

    /// Number of populated fields.
    pub fn populated(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// `(identifier, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        SCHEMA
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.id, value.as_deref()))
    }
}
