//! Invoice field extraction module.

mod label;
mod locate;
mod normalize;
pub mod rules;

pub use label::{Inspection, LabelInvoiceExtractor};
pub use locate::{find_label, LabelLocator};
pub use normalize::{clean, Normalizer};

use std::path::Path;

use crate::error::ExtractionError;
use crate::models::invoice::InvoiceFields;

/// Column holding the buyer's GSTIN when enabled.
pub const GSTIN_KEY: &str = "Buyer_GSTIN";

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Maps one invoice PDF to a row of named field values.
///
/// Implementations fail for files that cannot be read, carry no text layer,
/// or yield no fields at all.
pub trait InvoiceExtractor: Send + Sync {
    /// Field keys produced by [`InvoiceExtractor::extract`], in column order.
    fn field_keys(&self) -> Vec<String>;

    /// Extract the fields of one invoice.
    fn extract(&self, path: &Path) -> crate::Result<InvoiceFields>;
}
