//! PDF processing module.

mod document;
pub mod envelope;
mod extractor;
pub mod layout;

pub use document::{Document, Page, Table, Word};
pub use extractor::PdfExtractor;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for document readers.
pub trait DocumentSource {
    /// Read a document from bytes.
    fn load(&self, data: &[u8]) -> Result<Document>;

    /// Read a document from a file.
    fn open(&self, path: &Path) -> Result<Document>;
}
