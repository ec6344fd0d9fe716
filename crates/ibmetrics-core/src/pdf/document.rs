//! In-memory view of an opened report document.

use serde::Serialize;

/// A word on a page with its position (points, origin at the top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    /// Word text.
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Distance from the top of the page.
    pub top: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, x0: f64, top: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
        }
    }
}

/// A detected table: rows of optional cell strings.
pub type Table = Vec<Vec<Option<String>>>;

/// Content of a single page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    text: String,
    words: Vec<Word>,
    tables: Vec<Table>,
    width: f64,
    height: f64,
}

impl Page {
    /// Create a page holding only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Extracted page text; may be empty.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Positioned words in reading order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Tables detected on the page.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Page dimensions `(width, height)` in points.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// An opened document: an ordered sequence of pages.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The first page, where the metrics table lives.
    pub fn first_page(&self) -> Option<&Page> {
        self.pages.first()
    }

    /// Full text: page texts joined by newlines, empty pages contributing nothing.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
