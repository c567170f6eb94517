//! End-to-end tests over folders of generated PDFs.

use std::path::Path;
use std::sync::Arc;

use lopdf::dictionary;
use lopdf::{Document, Object, Stream};
use pretty_assertions::assert_eq;

use invex_core::{
    process_folder, BatchEvent, ExtractionSession, InvexConfig, InvoiceExtractor,
    LabelInvoiceExtractor, PdfKind, ProcessingWorker, ResultTable,
};

const PAGE_HEIGHT: f32 = 792.0;
const FONT_SIZE: f32 = 10.0;

/// Build a one-page PDF from text items placed at (x, top) in top-left coordinates.
fn text_pdf(items: &[(&str, f32, f32)]) -> Vec<u8> {
    let mut content = String::new();
    for (text, x, top) in items {
        let y = PAGE_HEIGHT - top - FONT_SIZE;
        content.push_str(&format!("BT /F1 {FONT_SIZE} Tf {x} {y} Td ({text}) Tj ET\n"));
    }

    let mut doc = Document::with_version("1.4");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };
    finish(doc, content.into_bytes(), resources)
}

/// A page that only paints an image, like a scanner would produce.
fn scanned_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0, 255, 255, 0],
    ));
    let resources = dictionary! {
        "XObject" => dictionary! { "Im1" => image_id },
    };
    finish(doc, b"q 200 0 0 200 100 500 cm /Im1 Do Q".to_vec(), resources)
}

fn finish(mut doc: Document, content: Vec<u8>, resources: lopdf::Dictionary) -> Vec<u8> {
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
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

fn invoice_pdf(number: &str, seller: &str, total: &str) -> Vec<u8> {
    text_pdf(&[
        ("Invoice No", 40.0, 40.0),
        (number, 110.0, 40.0),
        ("Invoice Date", 350.0, 40.0),
        ("05/03/2024", 420.0, 40.0),
        ("Bill From", 40.0, 100.0),
        ("Bill To", 350.0, 100.0),
        (seller, 40.0, 120.0),
        ("Globex Retail LLP", 350.0, 120.0),
        ("Item", 40.0, 300.0),
        ("CGST", 300.0, 300.0),
        ("SGST", 380.0, 300.0),
        ("Total", 460.0, 300.0),
        ("Widgets", 40.0, 320.0),
        ("90.00", 300.0, 320.0),
        ("90.00", 380.0, 320.0),
        (total, 455.0, 320.0),
    ])
}

fn write(dir: &Path, name: &str, data: &[u8]) {
    std::fs::write(dir.join(name), data).unwrap();
}

fn extractor() -> Arc<LabelInvoiceExtractor> {
    Arc::new(LabelInvoiceExtractor::new(InvexConfig::default()).unwrap())
}

#[test]
fn every_text_invoice_becomes_a_row() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "inv_001.pdf", &invoice_pdf("1234567", "Acme Traders Pvt Ltd", "1180.00"));
    write(dir.path(), "inv_002.pdf", &invoice_pdf("PP7654321", "Initech Supplies", "590.00"));
    write(dir.path(), "notes.txt", b"not an invoice");

    let report = process_folder(dir.path(), extractor().as_ref(), &mut |_| {}).unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.rows.len(), 2);

    let first = &report.rows[0];
    assert_eq!(first.file_name, "inv_001.pdf");
    assert_eq!(
        first.fields.iter().collect::<Vec<_>>(),
        vec![
            ("Invoice_No", "PP1234567"),
            ("Bill_From", "Acme Traders"),
            ("Bill_To", "Globex Retail"),
            ("Invoice_Date", "05/03/2024"),
            ("CGST", "90.00"),
            ("SGST", "90.00"),
            ("Total", "₹ 1180.00"),
        ]
    );

    let second = &report.rows[1];
    assert_eq!(second.get("Invoice_No"), Some("PP7654321"));
    assert_eq!(second.get("Bill_From"), Some("Initech Supplies"));
    assert_eq!(second.get("Total"), Some("₹ 590.00"));
}

#[test]
fn scanned_and_broken_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a_good.pdf", &invoice_pdf("1234567", "Acme Traders", "100.00"));
    write(dir.path(), "b_scan.pdf", &scanned_pdf());
    write(dir.path(), "c_broken.pdf", b"%PDF-1.4 truncated");
    write(dir.path(), "d_good.PDF", &invoice_pdf("2345678", "Acme Traders", "200.00"));

    let mut logs = Vec::new();
    let report = process_folder(dir.path(), extractor().as_ref(), &mut |event| {
        if let BatchEvent::Log(line) = event {
            logs.push(line);
        }
    })
    .unwrap();

    assert_eq!(report.found, 4);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 1);

    let names: Vec<&str> = report.rows.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["a_good.pdf", "d_good.PDF"]);

    assert!(logs.contains(&"⚠ Skipping scanned PDF: b_scan.pdf".to_string()));
    assert!(logs.iter().any(|l| l.starts_with("✗ Error processing c_broken.pdf")));
    assert_eq!(logs.last().unwrap(), "Processing complete: 2 processed, 2 skipped");
}

#[test]
fn label_words_shown_separately_are_found() {
    // Helvetica "Bill" at 10pt ends at x = 53.33, so "From" follows after about one space
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "split.pdf",
        &text_pdf(&[
            ("Bill", 40.0, 100.0),
            ("From", 62.23, 100.0),
            ("Acme Traders", 40.0, 120.0),
        ]),
    );

    let fields = extractor().extract(&dir.path().join("split.pdf")).unwrap();

    assert_eq!(fields.get("Bill_From"), Some("Acme Traders"));
}

#[test]
fn exported_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let invoices = dir.path().join("invoices");
    std::fs::create_dir(&invoices).unwrap();
    write(&invoices, "inv.pdf", &invoice_pdf("1234567", "Acme, Traders", "1180.00"));

    let mut session = ExtractionSession::new(extractor(), "File_Name");
    session.set_folder(&invoices);
    session.process(&mut |_| {}).unwrap();

    let out = dir.path().join("export.csv");
    session.export_csv(&out, &mut |_| {}).unwrap();

    let header = std::fs::read_to_string(&out).unwrap();
    assert!(header.starts_with(
        "File_Name,Invoice_No,Bill_From,Bill_To,Invoice_Date,CGST,SGST,Total\n"
    ));

    let loaded = ResultTable::read_csv(&out).unwrap();
    assert_eq!(&loaded, session.table());
    assert_eq!(loaded.rows()[0].get("Bill_From"), Some("Acme, Traders"));
}

#[test]
fn inspect_classifies_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "inv.pdf", &invoice_pdf("1234567", "Acme Traders", "10.00"));
    write(dir.path(), "scan.pdf", &scanned_pdf());
    let extractor = extractor();

    let text = extractor.inspect(&dir.path().join("inv.pdf")).unwrap();
    assert_eq!(text.kind, PdfKind::Text);
    assert_eq!(text.pages, 1);
    assert_eq!(text.fields.get("Invoice_No"), Some("PP1234567"));

    let scan = extractor.inspect(&dir.path().join("scan.pdf")).unwrap();
    assert_eq!(scan.kind, PdfKind::Scanned);
    assert!(scan.fields.is_empty());
}

#[tokio::test]
async fn worker_delivers_rows_for_generated_invoices() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3 {
        let number = format!("100000{i}");
        write(dir.path(), &format!("inv_{i}.pdf"), &invoice_pdf(&number, "Acme Traders", "1.00"));
    }

    let report = ProcessingWorker::spawn(dir.path().to_path_buf(), extractor())
        .join()
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    let numbers: Vec<&str> = report
        .rows
        .iter()
        .filter_map(|row| row.get("Invoice_No"))
        .collect();
    assert_eq!(numbers, vec!["PP1000000", "PP1000001", "PP1000002"]);
}
