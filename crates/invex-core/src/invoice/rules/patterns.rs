//! Common regex patterns for invoice text fallbacks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number patterns, most specific first
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:Invoice\s*(?:No|Number|#)\.?[\s:]+)([A-Z0-9\-/]+)"
    ).unwrap();

    pub static ref BILL_NUMBER: Regex = Regex::new(
        r"(?i)(?:Bill\s*(?:No|Number)\.?[\s:]+)([A-Z0-9\-/]+)"
    ).unwrap();

    pub static ref TAX_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:Tax\s*Invoice[\s:]+)([A-Z0-9\-/]*\d[A-Z0-9\-/]*)"
    ).unwrap();

    // Date patterns (day first, '-' or '/' separated)
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)(?:Invoice\s*Date[\s:]+)(\d{1,2})[-/](\d{1,2})[-/](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)(?:Date[\s:]+)(\d{1,2})[-/](\d{1,2})[-/](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4}|\d{2})\b"
    ).unwrap();

    // GSTIN: 2 digits, 5 letters, 4 digits, letter, alphanumeric, 'Z', alphanumeric
    pub static ref GSTIN: Regex = Regex::new(
        r"\b([0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][A-Z0-9]Z[A-Z0-9])\b"
    ).unwrap();

    pub static ref BUYER_GSTIN: Regex = Regex::new(
        r"(?i)(?:Bill\s*To|Buyer|Consignee|Ship\s*To)[\s\S]{0,500}?([0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][A-Z0-9]Z[A-Z0-9])"
    ).unwrap();
}
