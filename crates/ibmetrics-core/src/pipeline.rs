//! End-to-end processing of one brokerage report and press release pair.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DocumentRole, ExtractionError, Result};
use crate::extract::{NarrativeEngine, PeriodResolver, TabularEngine};
use crate::mapping::map_record;
use crate::models::config::IbmConfig;
use crate::models::metrics::MetricMap;
use crate::models::schema::{CanonicalRecord, SCHEMA};
use crate::pdf::{Document, DocumentSource, PdfExtractor};

/// Number of missing fields listed in the summary log.
const MISSING_PREVIEW: usize = 5;

/// Outcome of processing one document pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub record: CanonicalRecord,
    /// Tabular strategy that produced the metrics.
    pub strategy: &'static str,
    /// Raw tabular metrics, including rows without a canonical column.
    pub metrics: MetricMap,
    /// Products recovered from the press release.
    pub products: usize,
    /// Empty canonical fields.
    pub missing: Vec<String>,
    /// Non-fatal problems met along the way.
    pub diagnostics: Vec<String>,
}

/// Runs period resolution, both engines and the mapper for a pair.
pub struct PairProcessor<S: DocumentSource = PdfExtractor> {
    source: S,
    resolver: PeriodResolver,
    tabular: TabularEngine,
    narrative: NarrativeEngine,
    decimal_places: u32,
}

impl PairProcessor<PdfExtractor> {
    /// Create a processor reading PDF files.
    pub fn new(config: &IbmConfig) -> Self {
        Self::with_source(PdfExtractor::with_config(config.pdf.clone()), config)
    }
}

impl<S: DocumentSource> PairProcessor<S> {
    /// Create a processor over a custom document source.
    pub fn with_source(source: S, config: &IbmConfig) -> Self {
        Self {
            source,
            resolver: PeriodResolver::new(config.period.clone()),
            tabular: TabularEngine::new(&config.tabular, &config.pdf),
            narrative: NarrativeEngine::new(config.narrative.clone()),
            decimal_places: config.output.decimal_places,
        }
    }

    /// Open both documents and process them.
    ///
    /// An unreadable brokerage report is fatal. An unreadable press release
    /// leaves the press release fields empty.
    pub fn process(
        &self,
        brokerage: &Path,
        press: &Path,
        hint: Option<&str>,
    ) -> Result<PairReport> {
        info!("Processing brokerage report {}", brokerage.display());
        let brokerage_doc =
            self.source
                .open(brokerage)
                .map_err(|e| ExtractionError::DocumentUnreadable {
                    role: DocumentRole::Brokerage,
                    reason: e.to_string(),
                })?;

        let mut diagnostics = Vec::new();
        let press_doc = match self.source.open(press) {
            Ok(doc) => Some(doc),
            Err(e) => {
                let err = ExtractionError::DocumentUnreadable {
                    role: DocumentRole::PressRelease,
                    reason: e.to_string(),
                };
                warn!("{}", err);
                diagnostics.push(err.to_string());
                None
            }
        };

        self.run(&brokerage_doc, press_doc.as_ref(), hint, diagnostics)
    }

    /// Process documents that are already loaded.
    pub fn process_documents(
        &self,
        brokerage: &Document,
        press: Option<&Document>,
        hint: Option<&str>,
    ) -> Result<PairReport> {
        self.run(brokerage, press, hint, Vec::new())
    }

    fn run(
        &self,
        brokerage: &Document,
        press: Option<&Document>,
        hint: Option<&str>,
        mut diagnostics: Vec<String>,
    ) -> Result<PairReport> {
        let period = self.resolver.resolve(hint, brokerage, press)?;
        info!("Target period: {}", period);

        let tabular = self.tabular.extract(brokerage, period)?;
        diagnostics.extend(tabular.diagnostics);

        let narrative = match press {
            Some(doc) => match self.narrative.extract(&doc.text()) {
                Ok(result) => {
                    diagnostics.extend(result.diagnostics);
                    Some(result.data)
                }
                Err(e) => {
                    warn!("Press release extraction failed: {}", e);
                    diagnostics.push(e.to_string());
                    None
                }
            },
            None => None,
        };

        let mapped = map_record(
            period,
            &tabular.metrics,
            narrative.as_ref(),
            self.decimal_places,
        );

        let products = narrative.as_ref().map_or(0, |data| data.len());
        info!("Monthly metrics extracted: {}", tabular.metrics.len());
        info!("Press release products extracted: {}", products);
        info!(
            "Populated fields: {}/{}",
            mapped.record.populated(),
            SCHEMA.len()
        );
        if !mapped.missing.is_empty() {
            let preview: Vec<&str> = mapped
                .missing
                .iter()
                .take(MISSING_PREVIEW)
                .map(String::as_str)
                .collect();
            warn!(
                "Missing {} fields: {}",
                mapped.missing.len(),
                preview.join(", ")
            );
        }

        Ok(PairReport {
            record: mapped.record,
            strategy: tabular.strategy,
            metrics: tabular.metrics,
            products,
            missing: mapped.missing,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IbmError, PdfError};
    use crate::models::schema::CASH_FIELD;
    use crate::pdf::Page;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const BROKERAGE: &str = "\
Interactive Brokers Group Electronic Brokerage 2025
Jan Feb Mar Apr May Jun Jul Aug Sep Oct Nov Dec
Total Accounts 2,500.1 2,510.3 2,520.4 2,530.0 2,535.5 2,540.2 2,545.8 2,550.9
Net New Accounts 32.1 31.0 30.2 29.9 28.7 27.5 26.1 25.0
Total Client DARTs 3,100 3,200 3,300 3,400 3,500 3,600 3,700 3,800
Cleared Client DARTs 2,900 3,000 3,100 3,200 3,300 3,400 3,500 3,600
Client Equity $ 560.1 $ 571.2 $ 580.3 $ 590.4 $ 600.5 $ 610.6 $ 620.7 $ 630.8
Client Credits(1) $ 100.1 $ 101.2 $ 102.3 $ 103.4 $ 104.5 $ 105.6 $ 106.7 $ 107.8
";

    const PRESS: &str = "\
Stocks 1,200,000 shares $0.85
Equity Options 7.8 contracts $3.16
Futures and Future Options 3.2 contracts $4.05
";

    /// Serves documents from memory by file name.
    struct MemorySource {
        texts: HashMap<PathBuf, &'static str>,
    }

    impl MemorySource {
        fn new(entries: &[(&str, &'static str)]) -> Self {
            Self {
                texts: entries
                    .iter()
                    .map(|(name, text)| (PathBuf::from(name), *text))
                    .collect(),
            }
        }
    }

    impl DocumentSource for MemorySource {
        fn load(&self, _data: &[u8]) -> crate::pdf::Result<Document> {
            Err(PdfError::Parse("memory source reads by path".to_string()))
        }

        fn open(&self, path: &Path) -> crate::pdf::Result<Document> {
            self.texts
                .get(path)
                .map(|text| Document::new(vec![Page::new(*text)]))
                .ok_or_else(|| PdfError::Parse(format!("{} not found", path.display())))
        }
    }

    fn processor(source: MemorySource) -> PairProcessor<MemorySource> {
        PairProcessor::with_source(source, &IbmConfig::default())
    }

    #[test]
    fn test_full_pair() {
        let processor = processor(MemorySource::new(&[
            ("b.pdf", BROKERAGE),
            ("p.pdf", PRESS),
        ]));
        let report = processor
            .process(Path::new("b.pdf"), Path::new("p.pdf"), Some("202508"))
            .unwrap();

        let record = &report.record;
        assert_eq!(record.period.to_string(), "2025-08");
        assert_eq!(
            record.get("USA.OBD.INTERACTIVE.ACCOUNTS.TOTAL.M"),
            Some("2550.9")
        );
        assert_eq!(
            record.get("USA.OBD.INTERACTIVE.AVGORDER.STOCK.M"),
            Some("1200000")
        );
        assert_eq!(record.get(CASH_FIELD), Some("17.08941027267"));
        assert_eq!(report.strategy, "text-line");
        assert_eq!(report.products, 3);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_unreadable_press_release_degrades() {
        let processor = processor(MemorySource::new(&[("b.pdf", BROKERAGE)]));
        let report = processor
            .process(Path::new("b.pdf"), Path::new("missing.pdf"), Some("202508"))
            .unwrap();

        assert_eq!(report.products, 0);
        assert_eq!(
            report.record.get("USA.OBD.INTERACTIVE.AVGORDER.STOCK.M"),
            None
        );
        assert!(report.diagnostics[0].contains("press release"));
        assert_eq!(
            report.record.get("USA.OBD.INTERACTIVE.DARTS.TOTAL.M"),
            Some("3800")
        );
    }

    #[test]
    fn test_unreadable_brokerage_is_fatal() {
        let processor = processor(MemorySource::new(&[("p.pdf", PRESS)]));
        let err = processor
            .process(Path::new("b.pdf"), Path::new("p.pdf"), Some("202508"))
            .unwrap_err();
        assert!(matches!(
            err,
            IbmError::Extraction(ExtractionError::DocumentUnreadable {
                role: DocumentRole::Brokerage,
                ..
            })
        ));
    }

    #[test]
    fn test_period_from_content() {
        let processor = processor(MemorySource::new(&[]));
        let brokerage = Document::new(vec![Page::new(BROKERAGE)]);
        let press = Document::new(vec![Page::new(PRESS)]);
        let report = processor
            .process_documents(&brokerage, Some(&press), None)
            .unwrap();
        // Eight data cells under the header
        assert_eq!(report.record.period.to_string(), "2025-08");
    }

    #[test]
    fn test_tabular_failure_yields_no_record() {
        let processor = processor(MemorySource::new(&[]));
        let brokerage = Document::new(vec![Page::new("Electronic Brokerage 2025")]);
        let err = processor
            .process_documents(&brokerage, None, Some("202508"))
            .unwrap_err();
        assert!(matches!(
            err,
            IbmError::Extraction(ExtractionError::AllStrategiesFailed { .. })
        ));
    }
}
