//! PDF loading and text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace, warn};

use super::layout::{self, PageLayout, WordTolerance};
use super::{PdfKind, PdfProcessor, Result};
use crate::error::PdfError;
use crate::guard;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    /// The same file parsed by pdf-extract's lopdf, for glyph layout.
    layout_document: Option<pdf_extract::Document>,
    raw_data: Vec<u8>,
    tolerance: WordTolerance,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            layout_document: None,
            raw_data: Vec::new(),
            tolerance: WordTolerance::default(),
        }
    }

    /// Set word grouping tolerances.
    pub fn with_tolerance(mut self, tolerance: WordTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Whether any image XObject is present in the document.
    fn has_images(&self) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };

        doc.objects.values().any(|object| match object {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image"),
            _ => false,
        })
    }

    /// Text joined from the positioned word layer of every page.
    fn layout_text(&self) -> String {
        (1..=self.page_count())
            .filter_map(|page| self.page_layout(page).ok())
            .map(|layout| layout.text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        self.layout_document = match pdf_extract::Document::load_mem(&self.raw_data) {
            Ok(mut layout_doc) => {
                if layout_doc.is_encrypted() && layout_doc.decrypt("").is_err() {
                    warn!("Layout reader could not decrypt the PDF");
                    None
                } else {
                    Some(layout_doc)
                }
            }
            Err(e) => {
                warn!("Layout reader could not parse the PDF: {}", e);
                None
            }
        };

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> PdfKind {
        for page in 1..=self.page_count() {
            match self.page_layout(page) {
                Ok(layout) if layout.has_text() => {
                    debug!("PDF analysis: text layer on page {}", page);
                    return PdfKind::Text;
                }
                Ok(_) => trace!("No text on page {}", page),
                Err(e) => warn!("Could not read page {}: {}", page, e),
            }
        }

        let has_text = self
            .extract_text()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false);
        let has_images = self.has_images();

        let kind = match (has_text, has_images) {
            (true, _) => PdfKind::Text,
            (false, true) => PdfKind::Scanned,
            (false, false) => PdfKind::Empty,
        };

        debug!("PDF analysis: has_text={}, has_images={} -> {:?}", has_text, has_images, kind);
        kind
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // pdf-extract panics on some malformed fonts; one bad file must not end a batch
        let extracted = guard::contain(|| {
            pdf_extract::extract_text_from_mem(&self.raw_data).map_err(|e| e.to_string())
        })
        .unwrap_or_else(|message| Err(format!("pdf-extract panicked: {}", message)));

        match extracted {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("pdf-extract failed ({}), using layout text", e);
                let text = self.layout_text();
                if text.is_empty() {
                    Err(PdfError::TextExtraction(e))
                } else {
                    Ok(text)
                }
            }
        }
    }

    fn page_layout(&self, page: u32) -> Result<PageLayout> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        let doc = self
            .layout_document
            .as_ref()
            .ok_or(PdfError::Parse("Layout reader could not load the document".to_string()))?;

        layout::read_page(doc, page, self.tolerance)
    }
}
