//! GSTIN (Indian GST identification number) extraction.

use super::patterns::{BUYER_GSTIN, GSTIN};
use super::{FieldExtractor, TextMatch};

/// GSTIN extractor returning every GSTIN in document order.
pub struct GstinExtractor;

impl GstinExtractor {
    pub fn new() -> Self {
        Self
    }

    /// GSTIN of the buyer.
    ///
    /// Prefers a GSTIN inside the "Bill To" / "Buyer" / "Consignee" / "Ship To"
    /// section, then the second GSTIN in the document (the first is usually
    /// the seller), then the only one.
    pub fn extract_buyer(&self, text: &str) -> Option<TextMatch<String>> {
        if let Some(m) = BUYER_GSTIN.captures(text).and_then(|caps| caps.get(1)) {
            return Some(
                TextMatch::new(m.as_str().to_uppercase(), 0.9, m.as_str())
                    .at(m.range()),
            );
        }

        let mut all = self.extract_all(text);
        if all.len() >= 2 {
            let mut second = all.swap_remove(1);
            second.confidence = 0.6;
            Some(second)
        } else {
            all.pop()
        }
    }
}

impl Default for GstinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = TextMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        GSTIN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                TextMatch::new(m.as_str().to_string(), 0.5, m.as_str())
                    .at(m.range())
            })
            .collect()
    }
}

/// Extract the buyer's GSTIN from text.
pub fn extract_buyer_gstin(text: &str) -> Option<String> {
    GstinExtractor::new().extract_buyer(text).map(|m| m.value)
}
