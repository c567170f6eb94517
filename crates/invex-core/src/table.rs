//! In-memory result table and its CSV form.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::InvexError;
use crate::models::invoice::{InvoiceFields, InvoiceRow};
use crate::Result;

/// Rows of extracted invoices under a fixed set of columns.
///
/// The first column holds the source file name; the rest are field keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<InvoiceRow>,
}

impl ResultTable {
    /// Create an empty table with the file-name column followed by `keys`.
    pub fn new(file_name_column: impl Into<String>, keys: impl IntoIterator<Item = String>) -> Self {
        let mut columns = vec![file_name_column.into()];
        columns.extend(keys);
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Field columns, without the file-name column.
    pub fn field_columns(&self) -> &[String] {
        &self.columns[1..]
    }

    pub fn rows(&self) -> &[InvoiceRow] {
        &self.rows
    }

    pub fn push(&mut self, row: InvoiceRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Values of a row in column order; fields the row lacks are empty.
    pub fn record<'r>(&self, row: &'r InvoiceRow) -> Vec<&'r str> {
        let mut record = Vec::with_capacity(self.columns.len());
        record.push(row.file_name.as_str());
        for key in self.field_columns() {
            record.push(row.get(key).unwrap_or(""));
        }
        record
    }

    /// Write the table as CSV with a header row.
    ///
    /// Fails with [`InvexError::NoData`] when there are no rows; nothing is written then.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if self.rows.is_empty() {
            return Err(InvexError::NoData);
        }

        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(self.record(row))?;
        }
        wtr.flush()?;

        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read a table previously written by [`ResultTable::write_csv`].
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(path)?;
        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(InvexError::Config(format!(
                "{} has no header row",
                path.display()
            )));
        }

        let mut table = Self {
            columns,
            rows: Vec::new(),
        };

        for record in rdr.records() {
            let record = record?;
            let mut values = record.iter();
            let file_name = values.next().unwrap_or_default().to_string();

            let mut fields = InvoiceFields::new();
            for (key, value) in table.columns[1..].iter().zip(values) {
                fields.set(key.clone(), value);
            }
            table.rows.push(InvoiceRow::new(file_name, fields));
        }

        Ok(table)
    }
}
