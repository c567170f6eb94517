//! Post-processing of values found next to labels.

use regex::Regex;

use super::Result;
use crate::error::ExtractionError;
use crate::models::config::{NormalizeConfig, Normalization};

/// Collapse runs of whitespace into single spaces and trim.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Applies [`Normalization`] modes to extracted values.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Any configured label, case-insensitive.
    labels: Option<Regex>,
    /// Prefix followed by enough digits.
    prefixed_number: Regex,
    /// A bare run of enough digits.
    bare_number: Regex,
    invoice_prefix: String,
    party_words: usize,
    currency_symbol: String,
}

impl Normalizer {
    /// Create a normaliser; `labels` are the labels printed on the invoice.
    pub fn new(config: &NormalizeConfig, labels: &[String]) -> Result<Self> {
        let labels = if labels.is_empty() {
            None
        } else {
            let alternation = labels
                .iter()
                .map(|l| regex::escape(l))
                .collect::<Vec<_>>()
                .join("|");
            Some(build("labels", &format!("(?i)(?:{})", alternation))?)
        };

        let prefixed_number = build(
            "invoice_prefix",
            &format!(
                r"(?i)\b{}\d{{{},}}\b",
                regex::escape(&config.invoice_prefix),
                config.invoice_min_digits
            ),
        )?;
        let bare_number = build(
            "invoice_min_digits",
            &format!(r"\b\d{{{},}}\b", config.invoice_min_digits),
        )?;

        Ok(Self {
            labels,
            prefixed_number,
            bare_number,
            invoice_prefix: config.invoice_prefix.clone(),
            party_words: config.party_words,
            currency_symbol: config.currency_symbol.clone(),
        })
    }

    /// Normalise a value according to `mode`. Empty values stay empty.
    pub fn apply(&self, mode: Normalization, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }

        match mode {
            Normalization::None => value.to_string(),
            Normalization::InvoiceNumber => self.invoice_number(value),
            Normalization::Party => self.party(value),
            Normalization::Amount => self.amount(value),
        }
    }

    fn invoice_number(&self, value: &str) -> String {
        // Neighbouring labels often end up in the same text run
        let cut = match self.labels.as_ref().and_then(|re| re.find(value)) {
            Some(m) => &value[..m.start()],
            None => value,
        };
        let cut = cut.trim();

        if let Some(m) = self.prefixed_number.find(cut) {
            return m.as_str().to_uppercase();
        }

        if let Some(m) = self.bare_number.find(cut) {
            return format!("{}{}", self.invoice_prefix, m.as_str());
        }

        cut.to_string()
    }

    fn party(&self, value: &str) -> String {
        value
            .split_whitespace()
            .take(self.party_words)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn amount(&self, value: &str) -> String {
        if !value.contains(self.currency_symbol.as_str()) && value.chars().any(|c| c.is_ascii_digit()) {
            format!("{} {}", self.currency_symbol, value)
        } else {
            value.to_string()
        }
    }
}

fn build(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ExtractionError::Pattern {
        field: field.to_string(),
        reason: e.to_string(),
    })
}
