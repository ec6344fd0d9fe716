//! Error types for the ibmetrics-core library.

use std::fmt;

use thiserror::Error;

/// Main error type for the ibmetrics library.
#[derive(Error, Debug)]
pub enum IbmError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Metric extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The serialization envelope around the PDF could not be unpacked.
    #[error("failed to unwrap document envelope: {0}")]
    Envelope(String),

    /// Reading the source file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which of the two report documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The tabular monthly brokerage metrics report.
    Brokerage,
    /// The narrative press release.
    PressRelease,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Brokerage => write!(f, "brokerage"),
            DocumentRole::PressRelease => write!(f, "press release"),
        }
    }
}

/// Errors related to metric extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No year or no month could be established from the hint or either document.
    #[error("could not determine target period (year: {year:?}, month: {month:?})")]
    PeriodUnresolved { year: Option<i32>, month: Option<u32> },

    /// A year/month pair outside the supported range.
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// The document could not be opened or read.
    #[error("{role} document unreadable: {reason}")]
    DocumentUnreadable { role: DocumentRole, reason: String },

    /// A single tabular strategy did not find enough metrics.
    #[error("{strategy} strategy insufficient: {found} metrics ({reason})")]
    StrategyInsufficient {
        strategy: String,
        found: usize,
        reason: String,
    },

    /// Every tabular strategy was tried and none produced sufficient data.
    #[error("all parsing strategies failed to extract sufficient data: {}", attempts.join("; "))]
    AllStrategiesFailed { attempts: Vec<String> },

    /// The press release yielded partial or no product data.
    #[error("press release incomplete, missing products: {}", missing.join(", "))]
    NarrativeIncomplete { missing: Vec<String> },

    /// The document produced no extractable text.
    #[error("no text extracted from {0} document")]
    NoText(DocumentRole),

    /// The document layout cannot be mapped to twelve chronological columns.
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// A strategy-local failure (header not found, year missing, ...).
    #[error("{0}")]
    Strategy(String),
}

/// Result type for the ibmetrics library.
pub type Result<T> = std::result::Result<T, IbmError>;
