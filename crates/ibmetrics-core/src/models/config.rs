//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::IbmError;

/// Main configuration for the ibmetrics pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IbmConfig {
    /// Document access configuration.
    pub pdf: PdfConfig,

    /// Target period resolution.
    pub period: PeriodConfig,

    /// Tabular extraction strategies.
    pub tabular: TabularConfig,

    /// Press release extraction.
    pub narrative: NarrativeConfig,

    /// Output serialization.
    pub output: OutputConfig,
}

impl Default for IbmConfig {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            period: PeriodConfig::default(),
            tabular: TabularConfig::default(),
            narrative: NarrativeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Horizontal gap (points) beyond which two glyphs start a new word.
    pub x_tolerance: f64,

    /// Vertical distance (points) within which glyphs share a line.
    pub y_tolerance: f64,

    /// Unwrap documents delivered inside a Java serialization envelope.
    pub unwrap_envelopes: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            unwrap_envelopes: true,
        }
    }
}

/// How an explicit period hint competes with content inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPolicy {
    /// A valid hint is used as-is; content is only read when the hint is unusable.
    PreferHint,
    /// Content is always read; a complete content period overrides the hint.
    PreferContent,
}

/// Target period resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Precedence between hint and content.
    pub hint_policy: HintPolicy,

    /// Minimum numeric cells on the first data line for month inference.
    ///
    /// Lines with fewer cells (page numbers, footnotes, unit captions) are
    /// skipped, so months before this one cannot be inferred from the table.
    pub min_data_columns: usize,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            hint_policy: HintPolicy::PreferHint,
            min_data_columns: 8,
        }
    }
}

/// Tabular extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularConfig {
    /// Lines scanned after the month header by the text-line strategy.
    pub line_window: usize,

    /// Metrics a strategy must find to be accepted.
    pub min_metrics: usize,

    /// Metrics the last strategy must find to be accepted.
    pub fallback_min_metrics: usize,

    /// How far (points) above the year word month labels may sit.
    pub year_tolerance: f64,

    /// Left offset (points) applied to column band edges.
    pub column_tolerance: f64,

    /// Vertical bucket size (points) used to group words into rows.
    pub row_bucket: f64,

    /// Fraction of a label's significant words a row must contain (0.0 - 1.0).
    pub word_match_ratio: f64,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            line_window: 25,
            min_metrics: 5,
            fallback_min_metrics: 1,
            year_tolerance: 15.0,
            column_tolerance: 8.0,
            row_bucket: 3.0,
            word_match_ratio: 1.0,
        }
    }
}

/// Press release extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Try the numeric-only pattern set when the narrative set misses a product.
    pub use_backup_patterns: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            use_backup_patterns: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimal places of the derived cash percentage.
    pub decimal_places: u32,

    /// Output file name prefix, followed by `YYYYMM`.
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            decimal_places: 11,
            file_prefix: "IBKR_DATA_OUTPUT_".to_string(),
        }
    }
}

impl IbmConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        config
            .validate()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        Ok(config)
    }

    /// Reject values the extractors cannot work with.
    pub fn validate(&self) -> Result<(), IbmError> {
        let tolerances = [
            ("pdf.x_tolerance", self.pdf.x_tolerance),
            ("pdf.y_tolerance", self.pdf.y_tolerance),
            ("tabular.row_bucket", self.tabular.row_bucket),
        ];
        for (key, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                return Err(IbmError::Config(format!(
                    "{} must be a positive number, got {}",
                    key, value
                )));
            }
        }

        let ratio = self.tabular.word_match_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(IbmError::Config(format!(
                "tabular.word_match_ratio must be in (0, 1], got {}",
                ratio
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
