//! Rule-based fallbacks that read fields from the plain document text.
//!
//! Used when the label search leaves a field empty, e.g. when the text
//! layer merges a label and its value into one run.

use std::ops::Range;

pub mod dates;
pub mod gstin;
pub mod invoice_number;
pub mod patterns;

pub use dates::{parse_date, DateExtractor};
pub use gstin::{extract_buyer_gstin, GstinExtractor};
pub use invoice_number::InvoiceNumberExtractor;

/// Reads one kind of field from free text.
pub trait FieldExtractor {
    type Output;

    /// Best match, if any.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Every match, best first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch<T> {
    pub value: T,
    /// How specific the rule that matched is, 0.0 to 1.0.
    pub confidence: f32,
    /// Byte range of the whole match in the searched text.
    pub span: Option<Range<usize>>,
    /// The matched text as written.
    pub matched: String,
}

impl<T> TextMatch<T> {
    pub fn new(value: T, confidence: f32, matched: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            span: None,
            matched: matched.into(),
        }
    }

    pub fn at(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }
}
