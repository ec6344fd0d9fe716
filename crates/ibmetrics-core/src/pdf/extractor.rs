//! PDF text and word extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document as PdfDocument;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace, warn};

use super::document::{Document, Page, Word};
use super::{envelope, layout, DocumentSource, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF document reader backed by lopdf and pdf-extract.
pub struct PdfExtractor {
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor with default settings.
    pub fn new() -> Self {
        Self {
            config: PdfConfig::default(),
        }
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Parse, decrypt if needed, and return the bytes pdf-extract should read.
    fn prepare(&self, data: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut doc = PdfDocument::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }
        Ok((raw, page_count))
    }

    fn collect_words(&self, raw: &[u8]) -> Result<Vec<PageWords>> {
        let doc = pdf_extract::Document::load_mem(raw).map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut collector = WordCollector::new(self.config.x_tolerance, self.config.y_tolerance);
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(collector.pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for PdfExtractor {
    fn load(&self, data: &[u8]) -> Result<Document> {
        let (raw, page_count) = self.prepare(data)?;

        let texts = pdf_extract::extract_text_from_mem_by_pages(&raw)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        // Positions are best effort: a page without words still has text.
        let mut positioned = match self.collect_words(&raw) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Word positions unavailable: {}", e);
                Vec::new()
            }
        };
        positioned.resize_with(page_count, PageWords::default);

        let pages: Vec<Page> = positioned
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                let text = texts.get(i).cloned().unwrap_or_default();
                let tables =
                    layout::detect_tables(&page.words, self.config.y_tolerance, self.config.x_tolerance * 2.0);
                Page::new(text)
                    .with_words(page.words)
                    .with_tables(tables)
                    .with_size(page.width, page.height)
            })
            .collect();

        debug!(
            "Loaded PDF with {} pages, {} words on first page",
            pages.len(),
            pages.first().map(|p| p.words().len()).unwrap_or(0)
        );
        Ok(Document::new(pages))
    }

    fn open(&self, path: &Path) -> Result<Document> {
        if !self.config.unwrap_envelopes {
            let data = std::fs::read(path)?;
            return self.load(&data);
        }

        // The temporary file, if any, lives until the end of this scope.
        let unwrapped = envelope::unwrap(path)?;
        let data = std::fs::read(unwrapped.path())?;
        self.load(&data)
    }
}

#[derive(Debug, Default)]
struct PageWords {
    words: Vec<Word>,
    width: f64,
    height: f64,
}

/// Glyph sink that assembles positioned words.
struct WordCollector {
    x_tolerance: f64,
    y_tolerance: f64,
    pages: Vec<PageWords>,
    page_height: f64,
    current: Option<PendingWord>,
}

struct PendingWord {
    text: String,
    x0: f64,
    top: f64,
    end: f64,
}

impl WordCollector {
    fn new(x_tolerance: f64, y_tolerance: f64) -> Self {
        Self {
            x_tolerance,
            y_tolerance,
            pages: Vec::new(),
            page_height: 0.0,
            current: None,
        }
    }

    fn flush(&mut self) {
        if let Some(word) = self.current.take() {
            let text = word.text.trim();
            if text.is_empty() {
                return;
            }
            if let Some(page) = self.pages.last_mut() {
                page.words.push(Word::new(text, word.x0, word.top));
            }
        }
    }
}

impl OutputDev for WordCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        trace!("Collecting words on page {}", page_num);
        self.page_height = media_box.ury - media_box.lly;
        self.pages.push(PageWords {
            words: Vec::new(),
            width: media_box.urx - media_box.llx,
            height: self.page_height,
        });
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        let x = trm.m31;
        let top = self.page_height - trm.m32;
        let scale = ((font_size * trm.m11 + font_size * trm.m21)
            * (font_size * trm.m12 + font_size * trm.m22))
            .abs()
            .sqrt();
        let end = x + width * scale;

        if char.trim().is_empty() {
            self.flush();
            return Ok(());
        }

        let continues = self.current.as_ref().is_some_and(|w| {
            (top - w.top).abs() <= self.y_tolerance
                && x >= w.end - self.x_tolerance
                && x - w.end <= self.x_tolerance
        });

        if continues {
            if let Some(word) = self.current.as_mut() {
                word.text.push_str(char);
                word.end = end;
            }
        } else {
            self.flush();
            self.current = Some(PendingWord {
                text: char.to_string(),
                x0: x,
                top,
                end,
            });
        }
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}
