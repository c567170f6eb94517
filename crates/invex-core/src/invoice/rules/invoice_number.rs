//! Invoice number extraction from plain text.

use super::patterns::{BILL_NUMBER, INVOICE_NUMBER, TAX_INVOICE_NUMBER};
use super::{FieldExtractor, TextMatch};

/// Invoice number extractor.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = TextMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        let patterns = [
            (&*INVOICE_NUMBER, 0.9),
            (&*BILL_NUMBER, 0.8),
            (&*TAX_INVOICE_NUMBER, 0.6),
        ];

        for (pattern, confidence) in patterns {
            for caps in pattern.captures_iter(text) {
                let number = caps[1].trim().to_string();
                if number.is_empty() || results.iter().any(|r| r.value == number) {
                    continue;
                }

                let Some(full_match) = caps.get(0) else {
                    continue;
                };
                results.push(
                    TextMatch::new(number, confidence, full_match.as_str())
                        .at(full_match.range()),
                );
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_invoice_number(text: &str) -> Option<String> {
        InvoiceNumberExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_extract_labeled_invoice_number() {
        let text = "TAX INVOICE\nInvoice No: INV-2024/0042\nDate: 12/03/2024";
        assert_eq!(extract_invoice_number(text), Some("INV-2024/0042".to_string()));
    }

    #[test]
    fn test_extract_invoice_hash() {
        assert_eq!(extract_invoice_number("Invoice # 778812"), Some("778812".to_string()));
    }

    #[test]
    fn test_bill_number_is_lower_priority() {
        let text = "Bill No: B-17\nInvoice Number: PP1234567";
        let all = InvoiceNumberExtractor::new().extract_all(text);

        assert_eq!(all[0].value, "PP1234567");
        assert_eq!(all[1].value, "B-17");
    }

    #[test]
    fn test_no_invoice_number() {
        assert_eq!(extract_invoice_number("Thank you for your business"), None);
    }
}
