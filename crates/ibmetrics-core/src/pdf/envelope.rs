//! Unwrapping PDFs delivered inside a Java object serialization stream.
//!
//! Some report downloads arrive as a serialized Java byte array rather than a
//! plain PDF. The embedded document is the byte range from the first `%PDF-`
//! marker through the end of the last `%%EOF` marker.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::Result;
use crate::error::PdfError;

/// Java serialization stream magic.
const ENVELOPE_MAGIC: [u8; 2] = [0xAC, 0xED];
const PDF_START: &[u8] = b"%PDF-";
const PDF_END: &[u8] = b"%%EOF";

/// A document path that is valid for as long as this value lives.
///
/// The decoded variant owns a temporary file that is removed on drop.
#[derive(Debug)]
pub enum Unwrapped {
    /// The file was a plain document (or could not be unwrapped).
    Original(PathBuf),
    /// The document was extracted into a temporary file.
    Decoded(NamedTempFile),
}

impl Unwrapped {
    pub fn path(&self) -> &Path {
        match self {
            Unwrapped::Original(path) => path,
            Unwrapped::Decoded(file) => file.path(),
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Unwrapped::Decoded(_))
    }
}

/// Whether the bytes start with the serialization magic.
pub fn is_envelope(data: &[u8]) -> bool {
    data.starts_with(&ENVELOPE_MAGIC)
}

/// Locate the embedded document inside an envelope.
///
/// Returns `None` when either marker is missing or they are out of order.
pub fn embedded_pdf(data: &[u8]) -> Option<&[u8]> {
    let start = find(data, PDF_START)?;
    let end = rfind(data, PDF_END)? + PDF_END.len();
    (end > start).then(|| &data[start..end])
}

/// Unwrap `path` if it is an envelope, writing the embedded document to a
/// temporary file. Plain files and envelopes without both markers are passed
/// through unchanged.
pub fn unwrap(path: &Path) -> Result<Unwrapped> {
    let data = std::fs::read(path)?;
    if !is_envelope(&data) {
        return Ok(Unwrapped::Original(path.to_path_buf()));
    }

    debug!("Detected serialization envelope in {}", path.display());
    let Some(pdf) = embedded_pdf(&data) else {
        warn!(
            "No embedded PDF markers in {}, using original file",
            path.display()
        );
        return Ok(Unwrapped::Original(path.to_path_buf()));
    };

    let mut file = tempfile::Builder::new()
        .prefix("ibmetrics-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| PdfError::Envelope(format!("failed to create temporary file: {}", e)))?;
    file.write_all(pdf)?;
    file.flush()?;

    info!(
        "Unwrapped {} bytes of PDF from {}",
        pdf.len(),
        path.display()
    );
    Ok(Unwrapped::Decoded(file))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
