//! Extracted invoice rows.

use serde::{Deserialize, Serialize};

/// A single extracted field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Column name.
    pub key: String,
    /// Extracted text (empty when the field was not found).
    pub value: String,
}

/// Named field values extracted from one invoice, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub values: Vec<FieldValue>,
}

impl InvoiceFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.values.iter_mut().find(|f| f.key == key) {
            Some(field) => field.value = value,
            None => self.values.push(FieldValue { key, value }),
        }
    }

    /// Get a field value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Whether a field is missing or empty.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).is_none_or(|v| v.trim().is_empty())
    }

    /// Number of fields holding a non-empty value.
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|f| !f.value.trim().is_empty()).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|f| (f.key.as_str(), f.value.as_str()))
    }
}

/// One row of the result table: the source file and its extracted fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRow {
    /// File name of the source PDF (without directory).
    pub file_name: String,
    /// Extracted fields.
    pub fields: InvoiceFields,
}

impl InvoiceRow {
    pub fn new(file_name: impl Into<String>, fields: InvoiceFields) -> Self {
        Self {
            file_name: file_name.into(),
            fields,
        }
    }

    /// Get a field value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }
}
