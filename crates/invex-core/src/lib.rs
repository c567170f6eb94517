//! Core library for invoice folder extraction.
//!
//! This crate provides:
//! - PDF loading and a positioned text layer (words with bounding boxes)
//! - Label-based invoice field extraction with plain-text fallbacks
//! - Folder batch processing, a background worker and the result table
//! - CSV export of the extracted rows

pub mod batch;
pub mod error;
mod guard;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod table;
pub mod worker;

pub use batch::{process_folder, scan_folder, BatchEvent, BatchReport, ExtractionSession};
pub use error::{ExtractionError, InvexError, PdfError, Result};
pub use invoice::{InvoiceExtractor, LabelInvoiceExtractor};
pub use models::config::InvexConfig;
pub use models::invoice::{FieldValue, InvoiceFields, InvoiceRow};
pub use pdf::{PdfExtractor, PdfKind, PdfProcessor};
pub use table::ResultTable;
pub use worker::{ProcessingWorker, WorkerEvent};
