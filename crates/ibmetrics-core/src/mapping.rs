//! Maps both engines' outputs onto the canonical schema.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::extract::rules::parse_decimal;
use crate::models::metrics::{MetricMap, NarrativeData};
use crate::models::period::TargetPeriod;
use crate::models::schema::{
    CanonicalRecord, Source, CASH_FIELD, CREDITS_TOTAL_FIELD, EQUITY_FIELD, SCHEMA,
};

/// A mapped record and the fields left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub record: CanonicalRecord,
    /// Human-readable names of empty fields, in schema order.
    pub missing: Vec<String>,
}

/// Client credits as a percentage of client equity.
///
/// Returns `None` when either input is not numeric or equity is not positive.
pub fn cash_percent(credits: &str, equity: &str, decimal_places: u32) -> Option<String> {
    let credits = parse_decimal(credits)?;
    let equity = parse_decimal(equity)?;
    if equity <= Decimal::ZERO {
        return None;
    }

    let ratio = credits
        .checked_div(equity)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp(decimal_places);
    Some(format!("{:.*}", decimal_places as usize, ratio))
}

/// Build the canonical record for a period.
///
/// Without narrative data every press release field is empty. The derived
/// cash field is computed only from mapped values.
pub fn map_record(
    period: TargetPeriod,
    metrics: &MetricMap,
    narrative: Option<&NarrativeData>,
    decimal_places: u32,
) -> MappedRecord {
    let mut record = CanonicalRecord::empty(period);
    let mut missing = Vec::new();

    for (i, spec) in SCHEMA.iter().enumerate() {
        let value = match spec.source {
            Source::Tabular(metric) => {
                let value = metrics.get(&metric).cloned();
                if value.is_none() {
                    missing.push(format!("Monthly: {}", metric));
                }
                value
            }
            Source::Narrative(product, metric) => {
                let value = narrative
                    .and_then(|data| data.get(&product))
                    .map(|figures| figures.get(metric).to_string());
                if value.is_none() {
                    missing.push(format!("Press Release: {} {}", product, metric));
                }
                value
            }
            // Filled in below once its inputs are mapped
            Source::Derived => None,
        };
        record.values[i] = value.filter(|v| !v.is_empty());
    }

    let derived = match (record.get(CREDITS_TOTAL_FIELD), record.get(EQUITY_FIELD)) {
        (Some(credits), Some(equity)) => cash_percent(credits, equity, decimal_places),
        _ => None,
    };
    if let Some(index) = SCHEMA.iter().position(|s| s.id == CASH_FIELD) {
        match derived {
            Some(value) => {
                debug!("Derived cash percentage: {}", value);
                record.values[index] = Some(value);
            }
            None => {
                warn!("Cash percentage not computed: credits or equity unusable");
                missing.push("Derived: Cash as % of Assets".to_string());
            }
        }
    }

    MappedRecord { record, missing }
}
