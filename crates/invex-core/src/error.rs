//! Error types for the invex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected folder does not exist.
    #[error("folder does not exist: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// There are no rows to export.
    #[error("no data to export")]
    NoData,

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

    /// Failed to decode a page content stream.
    #[error("failed to read page content: {0}")]
    Content(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The PDF has no extractable text layer (scanned or blank).
    #[error("PDF has no text layer")]
    NoTextLayer,
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// None of the configured labels was found on the page.
    #[error("no invoice fields found")]
    NoData,

    /// A configured regex could not be built.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;

impl InvexError {
    /// Whether the error means the file is an image-only PDF rather than a broken one.
    pub fn is_scanned(&self) -> bool {
        matches!(self, InvexError::Pdf(PdfError::NoTextLayer))
    }
}
