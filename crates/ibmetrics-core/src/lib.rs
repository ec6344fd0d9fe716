//! Core library for monthly brokerage metrics extraction.
//!
//! This crate provides:
//! - PDF access (per-page text, positioned words, detected tables, envelope unwrapping)
//! - Reporting period resolution from hints and document content
//! - Tabular metric extraction with an ordered strategy cascade
//! - Press release product figures via narrative patterns
//! - Mapping onto the canonical 20-column schema, including the derived cash ratio

pub mod error;
pub mod extract;
pub mod mapping;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use error::{DocumentRole, ExtractionError, IbmError, PdfError, Result};
pub use extract::{
    NarrativeEngine, NarrativeResult, PeriodResolver, TabularEngine, TabularResult,
    TabularStrategy,
};
pub use mapping::{map_record, MappedRecord};
pub use models::config::IbmConfig;
pub use models::metrics::{BrokerageMetric, MetricMap, NarrativeData, Product, ProductMetric};
pub use models::period::TargetPeriod;
pub use models::schema::{CanonicalRecord, FieldSpec, Source, SCHEMA};
pub use pdf::{Document, DocumentSource, Page, PdfExtractor};
pub use pipeline::{PairProcessor, PairReport};
