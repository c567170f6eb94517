//! Label-based invoice extraction from the PDF text layer.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use super::locate::LabelLocator;
use super::normalize::Normalizer;
use super::rules::{extract_buyer_gstin, DateExtractor, FieldExtractor, InvoiceNumberExtractor};
use super::{InvoiceExtractor, GSTIN_KEY};
use crate::error::{ExtractionError, PdfError};
use crate::models::config::{InvexConfig, TextFallback};
use crate::models::invoice::InvoiceFields;
use crate::pdf::{PageLayout, PdfExtractor, PdfKind, PdfProcessor, WordTolerance};

/// What [`LabelInvoiceExtractor::inspect`] found in a single file.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub kind: PdfKind,
    pub pages: u32,
    /// Extracted fields; empty unless the file has a text layer.
    pub fields: InvoiceFields,
}

/// Reads fields by locating their labels on the first page.
pub struct LabelInvoiceExtractor {
    config: InvexConfig,
    normalizer: Normalizer,
    /// Lower-cased labels, used to reject a neighbouring label as a value.
    labels: HashSet<String>,
}

impl LabelInvoiceExtractor {
    /// Create an extractor for the configured fields.
    pub fn new(config: InvexConfig) -> super::Result<Self> {
        let label_list: Vec<String> = config.fields.iter().map(|f| f.label.clone()).collect();
        let normalizer = Normalizer::new(&config.normalize, &label_list)?;
        let labels = label_list.iter().map(|l| l.to_lowercase()).collect();

        Ok(Self {
            config,
            normalizer,
            labels,
        })
    }

    pub fn config(&self) -> &InvexConfig {
        &self.config
    }

    /// Fields found on an already laid-out page, normalised.
    pub fn extract_from_layout(&self, layout: &PageLayout) -> InvoiceFields {
        let locator = LabelLocator::new(layout, &self.config.layout, &self.labels);
        let mut fields = InvoiceFields::new();

        for spec in &self.config.fields {
            let raw = locator.value_for(spec);
            fields.set(&spec.key, self.normalizer.apply(spec.normalize, &raw));
        }

        fields
    }

    /// Fill empty fields from the plain document text.
    pub fn apply_text_rules(&self, fields: &mut InvoiceFields, text: &str) {
        if self.config.extraction.text_fallback {
            for spec in &self.config.fields {
                let Some(fallback) = spec.fallback else {
                    continue;
                };
                if !fields.is_blank(&spec.key) {
                    continue;
                }

                let found = match fallback {
                    TextFallback::InvoiceNumber => InvoiceNumberExtractor::new().extract(text),
                    TextFallback::Date => DateExtractor::new().extract(text),
                };

                if let Some(m) = found {
                    debug!("{}: text fallback '{}'", spec.key, m.value);
                    fields.set(&spec.key, self.normalizer.apply(spec.normalize, &m.value));
                }
            }
        }

        if self.config.extraction.include_gstin {
            fields.set(GSTIN_KEY, extract_buyer_gstin(text).unwrap_or_default());
        }
    }

    /// Classify a file and extract what it holds, without failing on scanned input.
    pub fn inspect(&self, path: &Path) -> crate::Result<Inspection> {
        let pdf = self.load(path)?;
        let kind = pdf.analyze();
        let pages = pdf.page_count();

        let fields = if kind.has_text() {
            self.extract_loaded(&pdf)?
        } else {
            InvoiceFields::new()
        };

        Ok(Inspection { kind, pages, fields })
    }

    fn load(&self, path: &Path) -> crate::Result<PdfExtractor> {
        let data = std::fs::read(path)?;
        let mut pdf = PdfExtractor::new().with_tolerance(WordTolerance {
            x: self.config.layout.x_tolerance,
            y: self.config.layout.y_tolerance,
        });
        pdf.load(&data)?;
        Ok(pdf)
    }

    fn extract_loaded(&self, pdf: &PdfExtractor) -> crate::Result<InvoiceFields> {
        let layout = pdf.page_layout(self.config.layout.page)?;
        let mut fields = self.extract_from_layout(&layout);

        if self.config.extraction.text_fallback || self.config.extraction.include_gstin {
            let text = pdf.extract_text().unwrap_or_else(|_| layout.text());
            self.apply_text_rules(&mut fields, &text);
        }

        if fields.filled() == 0 {
            return Err(ExtractionError::NoData.into());
        }

        Ok(fields)
    }
}

impl InvoiceExtractor for LabelInvoiceExtractor {
    fn field_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.config.fields.iter().map(|f| f.key.clone()).collect();
        if self.config.extraction.include_gstin {
            keys.push(GSTIN_KEY.to_string());
        }
        keys
    }

    fn extract(&self, path: &Path) -> crate::Result<InvoiceFields> {
        let pdf = self.load(path)?;

        let kind = pdf.analyze();
        if !kind.has_text() {
            debug!("{} has no text layer ({:?})", path.display(), kind);
            return Err(PdfError::NoTextLayer.into());
        }

        let fields = self.extract_loaded(&pdf)?;
        info!(
            "Extracted {}/{} fields from {}",
            fields.filled(),
            fields.len(),
            path.display()
        );
        Ok(fields)
    }
}
