//! Folder processing: scan for PDFs, extract each one, collect rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::InvexError;
use crate::invoice::InvoiceExtractor;
use crate::models::invoice::InvoiceRow;
use crate::table::ResultTable;
use crate::Result;

const SEPARATOR: &str = "--------------------------------------------------";

/// Progress notifications emitted while a folder is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// A line for the log pane.
    Log(String),
    /// A row was extracted.
    Row(InvoiceRow),
    /// `done` of `total` files have been handled.
    Progress { done: usize, total: usize },
}

/// Outcome of processing a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// PDF files found in the folder.
    pub found: usize,
    /// Files that produced a row.
    pub processed: usize,
    /// Files without a text layer.
    pub skipped: usize,
    /// Files that could not be read or yielded no fields.
    pub failed: usize,
    /// Extracted rows, in file order.
    pub rows: Vec<InvoiceRow>,
}

impl BatchReport {
    /// Files that did not produce a row.
    pub fn not_processed(&self) -> usize {
        self.skipped + self.failed
    }
}

/// PDF files directly inside `folder`, sorted by file name.
///
/// The extension check is case-insensitive; subdirectories are not entered.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(InvexError::FolderNotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    debug!("Found {} PDF files in {}", files.len(), folder.display());
    Ok(files)
}

/// Process every PDF in `folder`, reporting through `sink`.
///
/// Per-file failures are logged and counted; only an unreadable folder
/// aborts the run.
pub fn process_folder(
    folder: &Path,
    extractor: &dyn InvoiceExtractor,
    sink: &mut dyn FnMut(BatchEvent),
) -> Result<BatchReport> {
    let files = match scan_folder(folder) {
        Ok(files) => files,
        Err(e) => {
            sink(BatchEvent::Log(format!("Error: {}", e)));
            return Err(e);
        }
    };

    let mut report = BatchReport {
        found: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        sink(BatchEvent::Log("No PDF files found in selected folder.".to_string()));
        return Ok(report);
    }

    sink(BatchEvent::Log(format!("Found {} PDF file(s)", files.len())));
    sink(BatchEvent::Log(SEPARATOR.to_string()));

    let total = files.len();
    for (i, path) in files.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match extractor.extract(path) {
            Ok(fields) => {
                let row = InvoiceRow::new(file_name.as_str(), fields);
                report.processed += 1;
                report.rows.push(row.clone());
                sink(BatchEvent::Row(row));
                sink(BatchEvent::Log(format!("✓ Processed: {}", file_name)));
            }
            Err(e) if e.is_scanned() => {
                report.skipped += 1;
                sink(BatchEvent::Log(format!("⚠ Skipping scanned PDF: {}", file_name)));
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                report.failed += 1;
                sink(BatchEvent::Log(format!("✗ Error processing {}: {}", file_name, e)));
            }
        }

        sink(BatchEvent::Progress { done: i + 1, total });
    }

    sink(BatchEvent::Log(SEPARATOR.to_string()));
    sink(BatchEvent::Log(format!(
        "Processing complete: {} processed, {} skipped",
        report.processed,
        report.not_processed()
    )));

    info!(
        "Processed {}: {} rows, {} skipped, {} failed",
        folder.display(),
        report.processed,
        report.skipped,
        report.failed
    );

    Ok(report)
}

/// State behind the application window: the chosen folder and the last results.
pub struct ExtractionSession {
    extractor: Arc<dyn InvoiceExtractor>,
    file_name_column: String,
    folder: Option<PathBuf>,
    table: ResultTable,
}

impl ExtractionSession {
    pub fn new(extractor: Arc<dyn InvoiceExtractor>, file_name_column: impl Into<String>) -> Self {
        let file_name_column = file_name_column.into();
        let table = ResultTable::new(file_name_column.clone(), extractor.field_keys());
        Self {
            extractor,
            file_name_column,
            folder: None,
            table,
        }
    }

    pub fn extractor(&self) -> Arc<dyn InvoiceExtractor> {
        Arc::clone(&self.extractor)
    }

    pub fn set_folder(&mut self, folder: impl Into<PathBuf>) {
        self.folder = Some(folder.into());
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// An empty table with this session's columns.
    pub fn empty_table(&self) -> ResultTable {
        ResultTable::new(self.file_name_column.clone(), self.extractor.field_keys())
    }

    /// Replace the current results.
    pub fn set_rows(&mut self, rows: Vec<InvoiceRow>) {
        self.table.clear();
        for row in rows {
            self.table.push(row);
        }
    }

    /// Process the selected folder on the calling thread.
    pub fn process(&mut self, sink: &mut dyn FnMut(BatchEvent)) -> Result<BatchReport> {
        let Some(folder) = self.folder.clone() else {
            return Err(InvexError::Config("no folder selected".to_string()));
        };

        self.table.clear();
        let report = process_folder(&folder, self.extractor.as_ref(), sink)?;
        self.set_rows(report.rows.clone());
        Ok(report)
    }

    /// Export the current table, logging the outcome.
    pub fn export_csv(&self, path: &Path, log: &mut dyn FnMut(String)) -> Result<()> {
        match self.table.write_csv(path) {
            Ok(()) => {
                log(format!("✓ CSV exported successfully: {}", path.display()));
                Ok(())
            }
            Err(InvexError::NoData) => {
                log("No data to export".to_string());
                Err(InvexError::NoData)
            }
            Err(e) => {
                log(format!("✗ Error exporting CSV: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, PdfError};
    use crate::models::invoice::InvoiceFields;
    use pretty_assertions::assert_eq;

    /// Decides the outcome from the file name.
    struct NameExtractor;

    impl InvoiceExtractor for NameExtractor {
        fn field_keys(&self) -> Vec<String> {
            vec!["Invoice_No".to_string()]
        }

        fn extract(&self, path: &Path) -> Result<InvoiceFields> {
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            if name.starts_with("scan") {
                return Err(PdfError::NoTextLayer.into());
            }
            if name.starts_with("bad") {
                return Err(ExtractionError::NoData.into());
            }
            let mut fields = InvoiceFields::new();
            fields.set("Invoice_No", name.to_uppercase());
            Ok(fields)
        }
    }

    fn folder_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            std::fs::write(dir.path().join(f), b"%PDF-1.4").unwrap();
        }
        dir
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = folder_with(&["b.pdf", "A.PDF", "notes.txt", "c.Pdf"]);
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let names: Vec<String> = scan_folder(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["A.PDF", "b.pdf", "c.Pdf"]);
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(scan_folder(&missing), Err(InvexError::FolderNotFound(_))));
    }

    #[test]
    fn test_process_mixed_folder() {
        let dir = folder_with(&["inv1.pdf", "scan1.pdf", "bad1.pdf", "inv2.pdf"]);
        let mut logs = Vec::new();
        let mut rows = 0;

        let report = process_folder(dir.path(), &NameExtractor, &mut |event| match event {
            BatchEvent::Log(line) => logs.push(line),
            BatchEvent::Row(_) => rows += 1,
            BatchEvent::Progress { .. } => {}
        })
        .unwrap();

        assert_eq!(report.found, 4);
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.processed + report.not_processed(), report.found);
        assert_eq!(rows, 2);

        assert_eq!(logs[0], "Found 4 PDF file(s)");
        assert!(logs.contains(&"✗ Error processing bad1.pdf: extraction error: no invoice fields found".to_string()));
        assert!(logs.contains(&"⚠ Skipping scanned PDF: scan1.pdf".to_string()));
        assert!(logs.contains(&"✓ Processed: inv2.pdf".to_string()));
        assert_eq!(logs.last().unwrap(), "Processing complete: 2 processed, 2 skipped");
    }

    #[test]
    fn test_process_empty_folder() {
        let dir = folder_with(&["readme.txt"]);
        let mut logs = Vec::new();

        let report = process_folder(dir.path(), &NameExtractor, &mut |event| {
            if let BatchEvent::Log(line) = event {
                logs.push(line);
            }
        })
        .unwrap();

        assert_eq!(report, BatchReport::default());
        assert_eq!(logs, vec!["No PDF files found in selected folder."]);
    }

    #[test]
    fn test_session_process_and_export() {
        let dir = folder_with(&["inv1.pdf", "scan1.pdf"]);
        let out = dir.path().join("out.csv");
        let mut session = ExtractionSession::new(Arc::new(NameExtractor), "File_Name");
        let mut logs = Vec::new();

        assert!(session.process(&mut |_| {}).is_err());

        session.set_folder(dir.path());
        let report = session.process(&mut |_| {}).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(session.table().len(), 1);

        session.export_csv(&out, &mut |line| logs.push(line)).unwrap();
        let loaded = ResultTable::read_csv(&out).unwrap();
        assert_eq!(loaded.columns(), session.table().columns());
        assert_eq!(loaded.rows()[0].get("Invoice_No"), Some("INV1"));
        assert!(logs[0].starts_with("✓ CSV exported successfully"));
    }

    #[test]
    fn test_session_export_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let session = ExtractionSession::new(Arc::new(NameExtractor), "File_Name");
        let mut logs = Vec::new();

        let result = session.export_csv(&dir.path().join("x.csv"), &mut |line| logs.push(line));
        assert!(matches!(result, Err(InvexError::NoData)));
        assert_eq!(logs, vec!["No data to export"]);
    }
}
