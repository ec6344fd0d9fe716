//! Data models: configuration, reporting period, metric vocabularies and the
//! canonical output schema.

pub mod config;
pub mod metrics;
pub mod period;
pub mod schema;
