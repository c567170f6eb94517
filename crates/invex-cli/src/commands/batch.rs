//! Batch command: process a folder without the interactive application.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invex_core::{InvoiceExtractor, ProcessingWorker, ResultTable, WorkerEvent};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Folder containing invoice PDFs
    folder: PathBuf,

    /// Output CSV file (default from config: output.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the extracted rows as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Do not print per-file log lines
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.batch_file_name));
    let file_name_column = config.export.file_name_column.clone();
    let extractor = super::build_extractor(config)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut worker = ProcessingWorker::spawn(args.folder.clone(), extractor.clone());
    let report = loop {
        let Some(event) = worker.next_event().await else {
            anyhow::bail!("Processing stopped unexpectedly");
        };

        match event {
            WorkerEvent::Log(line) if !args.quiet => pb.suspend(|| println!("{}", line)),
            WorkerEvent::Log(_) | WorkerEvent::Row(_) => {}
            WorkerEvent::Progress { done, total } => {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            }
            WorkerEvent::Finished(report) => break report,
            WorkerEvent::Failed(message) => {
                pb.finish_and_clear();
                anyhow::bail!("{}", message);
            }
        }
    };
    pb.finish_and_clear();

    let mut table = ResultTable::new(file_name_column, extractor.field_keys());
    for row in report.rows.iter().cloned() {
        table.push(row);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    }

    if table.is_empty() {
        println!(
            "{} No data extracted from {} PDF file(s); no CSV written.",
            style("⚠").yellow(),
            report.found
        );
        return Ok(());
    }

    table.write_csv(&output)?;
    debug!("Wrote {} rows to {}", table.len(), output.display());

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.found,
        start.elapsed()
    );
    println!(
        "   {} extracted, {} scanned, {} failed",
        style(report.processed).green(),
        style(report.skipped).yellow(),
        style(report.failed).red()
    );
    println!(
        "{} Data saved to {}",
        style("✓").green(),
        output.display()
    );

    Ok(())
}
