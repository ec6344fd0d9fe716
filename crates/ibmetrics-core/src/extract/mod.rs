//! Metric extraction: period resolution, the tabular strategy cascade and
//! the press release patterns.

pub mod narrative;
pub mod period;
pub mod rules;
pub mod tabular;

pub use narrative::{NarrativeEngine, NarrativeResult};
pub use period::PeriodResolver;
pub use tabular::{TabularEngine, TabularResult, TabularStrategy};

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::metrics::MetricMap;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Tagged result of running one tabular strategy.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// Enough metrics to stop the cascade.
    Sufficient(MetricMap),
    /// The strategy ran but found too few metrics.
    Insufficient { metrics: MetricMap, reason: String },
    /// The strategy could not run to completion.
    Failed(ExtractionError),
}

impl StrategyOutcome {
    /// Classify a strategy result against the metric threshold.
    pub fn classify(strategy: &str, result: Result<MetricMap>, min_metrics: usize) -> Self {
        match result {
            Ok(metrics) if metrics.len() >= min_metrics && !metrics.is_empty() => {
                StrategyOutcome::Sufficient(metrics)
            }
            Ok(metrics) => {
                let reason = ExtractionError::StrategyInsufficient {
                    strategy: strategy.to_string(),
                    found: metrics.len(),
                    reason: format!("need at least {}", min_metrics.max(1)),
                }
                .to_string();
                StrategyOutcome::Insufficient { metrics, reason }
            }
            Err(e) => StrategyOutcome::Failed(e),
        }
    }
}

/// One strategy run within a cascade.
#[derive(Debug)]
pub struct Attempt {
    pub strategy: &'static str,
    pub outcome: StrategyOutcome,
}

/// The winning strategy of a cascade.
#[derive(Debug, Clone)]
pub struct Selection {
    pub strategy: &'static str,
    pub metrics: MetricMap,
    /// Diagnostics of the strategies tried before the winner.
    pub diagnostics: Vec<String>,
}

/// Consume attempts until the first sufficient one.
///
/// Attempts are pulled lazily, so strategies after the winner never run.
/// When none is sufficient the error lists every attempt's diagnostic.
pub fn select_first_sufficient<I>(attempts: I) -> Result<Selection>
where
    I: IntoIterator<Item = Attempt>,
{
    let mut diagnostics = Vec::new();
    for attempt in attempts {
        match attempt.outcome {
            StrategyOutcome::Sufficient(metrics) => {
                return Ok(Selection {
                    strategy: attempt.strategy,
                    metrics,
                    diagnostics,
                });
            }
            StrategyOutcome::Insufficient { metrics, reason } => {
                debug!(
                    "{} strategy insufficient with {} metrics",
                    attempt.strategy,
                    metrics.len()
                );
                diagnostics.push(reason);
            }
            StrategyOutcome::Failed(e) => {
                debug!("{} strategy failed: {}", attempt.strategy, e);
                diagnostics.push(format!("{} strategy failed: {}", attempt.strategy, e));
            }
        }
    }
    Err(ExtractionError::AllStrategiesFailed {
        attempts: diagnostics,
    })
}
