//! PDF processing module.

mod extractor;
mod layout;

pub use extractor::PdfExtractor;
pub use layout::{group_words, BBox, Glyph, PageLayout, Word, WordTolerance};

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfKind {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Scanned,
    /// Neither text nor images.
    Empty,
}

impl PdfKind {
    pub fn has_text(&self) -> bool {
        matches!(self, PdfKind::Text)
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Analyze the PDF to determine its type.
    fn analyze(&self) -> PdfKind;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Positioned words and glyphs of a page (1-indexed).
    fn page_layout(&self, page: u32) -> Result<PageLayout>;
}
