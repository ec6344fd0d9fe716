//! Row label matching and month column resolution.

use crate::error::ExtractionError;
use crate::models::metrics::BrokerageMetric;
use crate::models::period::TargetPeriod;

use super::super::Result;

/// The metric whose label best covers `label`.
///
/// A metric qualifies when the lowercased label contains at least `ratio` of
/// its significant words. Among qualifying metrics the one with the most
/// matched words wins; ties go to the earlier metric.
pub fn best_metric(label: &str, ratio: f64) -> Option<BrokerageMetric> {
    let label = label.to_lowercase();
    let mut best: Option<(BrokerageMetric, usize)> = None;

    for metric in BrokerageMetric::ALL {
        let words = metric.significant_words();
        if words.is_empty() {
            continue;
        }
        let hits = words.iter().filter(|w| label.contains(w.as_str())).count();
        if hits == 0 || (hits as f64) < ratio * words.len() as f64 - f64::EPSILON {
            continue;
        }
        if best.is_none_or(|(_, best_hits)| hits > best_hits) {
            best = Some((metric, hits));
        }
    }

    best.map(|(metric, _)| metric)
}

/// Check that header months are the twelve calendar months starting at
/// January and that the target month is among them.
///
/// Returns the target's zero-based column index.
pub fn resolve_column(months: &[u32], period: TargetPeriod) -> Result<usize> {
    if !months.contains(&period.month()) {
        return Err(ExtractionError::Strategy(format!(
            "could not locate {} in header",
            period.abbreviation()
        )));
    }

    let chronological = months.len() >= 12 && months[..12].iter().copied().eq(1..=12);
    if !chronological {
        return Err(ExtractionError::UnsupportedLayout(format!(
            "header lists months {:?}, expected Jan through Dec",
            months
        )));
    }

    Ok(period.column_index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_best_metric_prefers_most_specific_label() {
        assert_eq!(
            best_metric("Client Credits Held at Broker $ 10.1", 1.0),
            Some(BrokerageMetric::ClientCreditsHeldAtBroker)
        );
        assert_eq!(
            best_metric("FDIC Program Client Credits", 1.0),
            Some(BrokerageMetric::FdicProgramClientCredits)
        );
        assert_eq!(
            best_metric("Client Credits(1)", 1.0),
            Some(BrokerageMetric::ClientCredits)
        );
        assert_eq!(
            best_metric("Total Client DARTs", 1.0),
            Some(BrokerageMetric::TotalClientDarts)
        );
        assert_eq!(
            best_metric("Net New Accounts", 1.0),
            Some(BrokerageMetric::NetNewAccounts)
        );
        assert_eq!(
            best_metric("Cleared Avg. DART per Account (Annualized)", 1.0),
            Some(BrokerageMetric::ClearedAvgDartPerAccount)
        );
    }

    #[test]
    fn test_best_metric_rejects_partial_cover() {
        assert_eq!(best_metric("Client", 1.0), None);
        assert_eq!(best_metric("Jan Feb Mar", 1.0), None);
        assert_eq!(
            best_metric("Client", 0.5),
            Some(BrokerageMetric::ClientEquity)
        );
    }

    #[test]
    fn test_resolve_column() {
        let period = TargetPeriod::new(2025, 8).unwrap();
        let all: Vec<u32> = (1..=12).collect();
        assert_eq!(resolve_column(&all, period).unwrap(), 7);

        let missing: Vec<u32> = (1..=7).collect();
        assert!(matches!(
            resolve_column(&missing, period),
            Err(ExtractionError::Strategy(_))
        ));

        let short: Vec<u32> = (1..=8).collect();
        assert!(matches!(
            resolve_column(&short, period),
            Err(ExtractionError::UnsupportedLayout(_))
        ));

        let mid_year: Vec<u32> = (7..=12).chain(1..=6).collect();
        assert!(matches!(
            resolve_column(&mid_year, period),
            Err(ExtractionError::UnsupportedLayout(_))
        ));
    }
}
