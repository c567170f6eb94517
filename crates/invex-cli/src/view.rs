//! Terminal rendering of the result table, the log pane and message boxes.

use console::{measure_text_width, pad_str, style, Alignment};

use invex_core::ResultTable;

/// Cells wider than this are truncated in the terminal view only.
const MAX_CELL_WIDTH: usize = 32;

/// Application header with the selected folder.
pub fn header(folder: Option<&str>) -> String {
    let title = style("Invoice Extractor").bold().cyan();
    let folder = match folder {
        Some(path) => style(path.to_string()).green(),
        None => style("No folder selected".to_string()).dim(),
    };
    format!("{}\nFolder: {}", title, folder)
}

/// The result table with aligned columns and a record count.
pub fn table(table: &ResultTable) -> String {
    let columns = table.columns();
    let records: Vec<Vec<&str>> = table.rows().iter().map(|row| table.record(row)).collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            records
                .iter()
                .map(|record| measure_text_width(record[i]))
                .chain(std::iter::once(measure_text_width(name)))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&line(columns.iter().map(String::as_str), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');

    for record in &records {
        out.push_str(&line(record.iter().copied(), &widths));
        out.push('\n');
    }

    out.push_str(&record_count(table.len()));
    out
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, Some("…")).into_owned())
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

pub fn record_count(count: usize) -> String {
    format!("{} records", count)
}

/// The log pane: every line in order, under a heading.
pub fn log(lines: &[String]) -> String {
    let mut out = format!("{}", style("Processing Log").bold());
    for entry in lines {
        out.push('\n');
        out.push_str(entry);
    }
    out
}

/// Message box severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A framed dialog-style message.
pub fn message(level: Level, title: &str, body: &str) -> String {
    let title = match level {
        Level::Info => style(format!("ℹ {}", title)).blue().bold(),
        Level::Warning => style(format!("⚠ {}", title)).yellow().bold(),
        Level::Error => style(format!("✗ {}", title)).red().bold(),
    };
    let mut out = format!("┌ {}", title);
    for text in body.lines() {
        out.push_str("\n│ ");
        out.push_str(text);
    }
    out.push_str("\n└");
    out
}

/// Command reference shown by `help`.
pub fn help(default_export: &str) -> String {
    format!(
        "Commands:
  folder <path>   select the folder with invoice PDFs (alias: open)
  process         extract fields from every PDF in the folder
  table           show the extracted rows
  log             show the processing log
  export [path]   save the rows as CSV (default: {default_export})
  clear           clear the log
  help            show this help
  quit            exit (alias: exit)"
    )
}
