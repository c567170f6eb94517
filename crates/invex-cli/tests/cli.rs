//! Tests for the `invex` binary.

use std::path::Path;

use assert_cmd::Command;
use lopdf::dictionary;
use lopdf::{Document, Object, Stream};
use predicates::prelude::*;

/// One-page invoice with the labels the default configuration looks for.
fn invoice_pdf() -> Vec<u8> {
    let items = [
        ("Invoice No", 40, 742),
        ("1234567", 110, 742),
        ("Bill From", 40, 682),
        ("Acme Traders Pvt Ltd", 40, 662),
        ("Total", 460, 482),
        ("1180.00", 455, 462),
    ];
    let content: String = items
        .iter()
        .map(|(text, x, y)| format!("BT /F1 10 Tf {x} {y} Td ({text}) Tj ET\n"))
        .collect();

    let mut doc = Document::with_version("1.4");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        page.set("Parent", pages_id);
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn invex() -> Command {
    Command::cargo_bin("invex").unwrap()
}

fn missing_config(dir: &Path) -> String {
    dir.join("no-config.json").display().to_string()
}

#[test]
fn batch_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let invoices = dir.path().join("invoices");
    std::fs::create_dir(&invoices).unwrap();
    std::fs::write(invoices.join("inv.pdf"), invoice_pdf()).unwrap();
    let out = dir.path().join("out.csv");

    invex()
        .args(["batch", invoices.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data saved to"));

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("File_Name,Invoice_No,Bill_From,Bill_To,Invoice_Date,CGST,SGST,Total")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("inv.pdf,PP1234567,Acme Traders,"));
    assert!(row.ends_with("₹ 1180.00"));
}

#[test]
fn batch_without_rows_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    invex()
        .args(["batch", dir.path().to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data extracted"));

    assert!(!out.exists());
}

#[test]
fn batch_missing_folder_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    invex()
        .args(["batch", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("folder does not exist"));
}

#[test]
fn inspect_prints_fields() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("inv.pdf");
    std::fs::write(&file, invoice_pdf()).unwrap();

    invex()
        .args(["inspect", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("text-based"))
        .stdout(predicate::str::contains("PP1234567"))
        .stdout(predicate::str::contains("(not found)"));
}

#[test]
fn config_init_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let config = config.to_str().unwrap();

    invex()
        .args(["config", "init", "-c", config])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    invex()
        .args(["config", "set", "normalize.party_words", "3", "-c", config])
        .assert()
        .success();

    invex()
        .args(["config", "get", "normalize.party_words", "-c", config])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));
}

#[test]
fn config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();

    invex()
        .args(["config", "show", "-c", &missing_config(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("No config file found"))
        .stdout(predicate::str::contains("\"Invoice_No\""));
}

#[test]
fn interactive_session_selects_and_processes() {
    let dir = tempfile::tempdir().unwrap();
    let invoices = dir.path().join("invoices");
    std::fs::create_dir(&invoices).unwrap();
    std::fs::write(invoices.join("inv.pdf"), invoice_pdf()).unwrap();
    let script = format!(
        "help\nfolder {}\nprocess\n",
        invoices.display()
    );

    invex()
        .current_dir(dir.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Extractor"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains(format!(
            "Folder selected: {}",
            invoices.display()
        )))
        .stdout(predicate::str::contains("Starting invoice processing..."));
}

#[test]
fn interactive_unknown_command() {
    invex()
        .write_stdin("dance\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'dance'"));
}
