//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for invex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Fields to extract, in column order.
    pub fields: Vec<FieldSpec>,

    /// Geometry used when looking for values around labels.
    pub layout: LayoutConfig,

    /// Post-processing of extracted values.
    pub normalize: NormalizeConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// CSV export configuration.
    pub export: ExportConfig,
}

impl Default for InvexConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            layout: LayoutConfig::default(),
            normalize: NormalizeConfig::default(),
            extraction: ExtractionConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// How an extracted value is cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Keep the value as found.
    #[default]
    None,
    /// Invoice numbers (`PP` + digits).
    InvoiceNumber,
    /// Party names, shortened to the first few words.
    Party,
    /// Monetary amounts, prefixed with the currency symbol.
    Amount,
}

/// Plain-text rule used when the label search finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFallback {
    /// "Invoice No", "Bill No", "Tax Invoice" followed by an identifier.
    InvoiceNumber,
    /// A day-first calendar date.
    Date,
}

/// A field to extract: the CSV column name and the label printed on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name in the result table.
    pub key: String,

    /// Label text as it appears in the PDF.
    pub label: String,

    /// Value sits in a table column directly below the label.
    #[serde(default)]
    pub column: bool,

    /// Post-processing mode.
    #[serde(default)]
    pub normalize: Normalization,

    /// Text rule for filling the field when it stays empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<TextFallback>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column: false,
            normalize: Normalization::None,
            fallback: None,
        }
    }

    pub fn in_column(mut self) -> Self {
        self.column = true;
        self
    }

    pub fn with_normalization(mut self, normalize: Normalization) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_fallback(mut self, fallback: TextFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Invoice_No", "Invoice No")
            .with_normalization(Normalization::InvoiceNumber)
            .with_fallback(TextFallback::InvoiceNumber),
        FieldSpec::new("Bill_From", "Bill From").with_normalization(Normalization::Party),
        FieldSpec::new("Bill_To", "Bill To").with_normalization(Normalization::Party),
        FieldSpec::new("Invoice_Date", "Invoice Date").with_fallback(TextFallback::Date),
        FieldSpec::new("CGST", "CGST").in_column(),
        FieldSpec::new("SGST", "SGST").in_column(),
        FieldSpec::new("Total", "Total")
            .in_column()
            .with_normalization(Normalization::Amount),
    ]
}

/// Geometry for the label search strategies, in PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Page to read fields from (1-indexed).
    pub page: u32,

    /// Width of the region to the right of a label.
    pub right_max_width: f32,

    /// Width of the region below a label.
    pub below_max_width: f32,

    /// Height of the region below a label.
    pub below_height: f32,

    /// Gap between a label and the region searched next to it.
    pub gap: f32,

    /// Minimum distance below a column header.
    pub column_y_gap: f32,

    /// Maximum distance below a column header.
    pub column_max_height: f32,

    /// Horizontal slack when aligning a word with a column header.
    pub column_tolerance: f32,

    /// Maximum horizontal gap between characters of the same word.
    pub x_tolerance: f32,

    /// Maximum vertical offset between characters of the same line.
    pub y_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: 1,
            right_max_width: 200.0,
            below_max_width: 200.0,
            below_height: 40.0,
            gap: 5.0,
            column_y_gap: 5.0,
            column_max_height: 60.0,
            column_tolerance: 10.0,
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// Value normalisation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Prefix of invoice numbers.
    pub invoice_prefix: String,

    /// Minimum number of digits in an invoice number.
    pub invoice_min_digits: usize,

    /// Number of words kept from party names.
    pub party_words: usize,

    /// Currency symbol added to amounts.
    pub currency_symbol: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: "PP".to_string(),
            invoice_min_digits: 6,
            party_words: 2,
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fill empty invoice number and date from the plain document text.
    pub text_fallback: bool,

    /// Add a `Buyer_GSTIN` column found in the buyer section.
    pub include_gstin: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            text_fallback: true,
            include_gstin: false,
        }
    }
}

/// CSV export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the column holding the source file name.
    pub file_name_column: String,

    /// Suggested file name when exporting from the application.
    pub default_file_name: String,

    /// Output file of the headless batch command.
    pub batch_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name_column: "File_Name".to_string(),
            default_file_name: "invoices_export.csv".to_string(),
            batch_file_name: "output.csv".to_string(),
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InvexConfig =
            serde_json::from_str(r#"{"layout": {"right_max_width": 150.0}}"#).unwrap();

        assert_eq!(config.layout.right_max_width, 150.0);
        assert_eq!(config.layout.below_height, 40.0);
        assert_eq!(config.fields.len(), 7);
        assert_eq!(config.normalize.invoice_prefix, "PP");
    }

    #[test]
    fn test_field_spec_json() {
        let spec: FieldSpec =
            serde_json::from_str(r#"{"key": "Total", "label": "Grand Total", "normalize": "amount"}"#)
                .unwrap();

        assert_eq!(spec.label, "Grand Total");
        assert!(!spec.column);
        assert_eq!(spec.normalize, Normalization::Amount);
        assert_eq!(spec.fallback, None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvexConfig::default();
        config.normalize.party_words = 3;
        config.save(&path).unwrap();

        let loaded = InvexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.normalize.party_words, 3);
        assert_eq!(loaded.fields, config.fields);
    }
}
