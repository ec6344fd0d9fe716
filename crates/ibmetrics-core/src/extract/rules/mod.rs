//! Rule-based recognizers shared by the extraction engines.

pub mod dates;
pub mod patterns;
pub mod values;

pub use dates::{DateExtractor, DateFinding};
pub use patterns::*;
pub use values::{normalize, normalize_figure, numeric_tokens, parse_decimal};

/// Trait for text field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A recognized value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the pattern that matched, in priority order.
    pub rank: usize,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rank: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            rank,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
