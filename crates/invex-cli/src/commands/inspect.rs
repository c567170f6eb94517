//! Inspect command: classify one PDF and show the fields found in it.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invex_core::PdfKind;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Invoice PDF file
    file: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.file.exists() {
        anyhow::bail!("File not found: {}", args.file.display());
    }

    let config = super::load_config(config_path)?;
    let extractor = super::build_extractor(config)?;

    let file = args.file.clone();
    let inspection = tokio::task::spawn_blocking(move || extractor.inspect(&file)).await??;

    if args.json {
        let json = serde_json::json!({
            "file": args.file.display().to_string(),
            "kind": format!("{:?}", inspection.kind),
            "pages": inspection.pages,
            "fields": inspection.fields.values,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let kind = match inspection.kind {
        PdfKind::Text => style("text-based").green(),
        PdfKind::Scanned => style("scanned (no text layer)").yellow(),
        PdfKind::Empty => style("empty").red(),
    };

    println!("File:  {}", args.file.display());
    println!("Kind:  {}", kind);
    println!("Pages: {}", inspection.pages);

    if !inspection.kind.has_text() {
        println!(
            "{} Scanned PDFs are skipped during processing.",
            style("ℹ").blue()
        );
        return Ok(());
    }

    println!();
    let width = inspection
        .fields
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);

    for (key, value) in inspection.fields.iter() {
        let value = if value.is_empty() {
            style("(not found)".to_string()).dim()
        } else {
            style(value.to_string())
        };
        println!("  {:width$}  {}", key, value, width = width);
    }

    Ok(())
}
