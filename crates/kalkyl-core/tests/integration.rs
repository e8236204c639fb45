//! Integration tests for the PDF-to-Excel pipeline.
//!
//! Uses a MockExtractor that treats the input bytes as pre-extracted layout
//! text (pages separated by form feed), so these tests run without
//! poppler-utils installed.

use std::io::Cursor;

use calamine::{Reader, Xlsx};
use kalkyl_core::bundle::{convert_batch, write_bundle, DocumentInput};
use kalkyl_core::error::KalkylError;
use kalkyl_core::extraction::{ExtractOptions, PageContent, PdfExtractor};
use kalkyl_core::model::{PageKind, SCANNED_PLACEHOLDER};
use kalkyl_core::{convert_pdf, extract_document};

struct MockExtractor {
    /// Page numbers reported as image-bearing; None = no image info.
    images: Option<Vec<usize>>,
}

impl MockExtractor {
    fn new() -> Self {
        MockExtractor { images: None }
    }

    fn with_images(pages: &[usize]) -> Self {
        MockExtractor {
            images: Some(pages.to_vec()),
        }
    }
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, KalkylError> {
        let text = std::str::from_utf8(pdf_bytes)
            .map_err(|_| KalkylError::Extraction("unreadable stream".into()))?;
        if text == "corrupt" {
            return Err(KalkylError::Extraction("corrupt pdf".into()));
        }
        Ok(text
            .split('\x0c')
            .enumerate()
            .map(|(i, page_text)| PageContent {
                page_number: i + 1,
                lines: page_text.lines().map(|l| l.to_string()).collect(),
            })
            .collect())
    }

    fn image_pages(&self, _pdf_bytes: &[u8]) -> Result<Option<Vec<usize>>, KalkylError> {
        Ok(self.images.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn read_xlsx(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
    calamine::open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .expect("output should be readable xlsx")
}

fn cell(range: &calamine::Range<calamine::Data>, row: usize, col: usize) -> String {
    match range.get_value((row as u32, col as u32)) {
        Some(v) => format!("{v}"),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Table documents: one sheet per table, contents verbatim
// ---------------------------------------------------------------------------
#[test]
fn tables_become_sheets() {
    let pdf = "\
Invoice 2024-117

Item            Qty    Price
Widget          4      12.50
Gadget          1      99.00
\x0cTerms and conditions apply to all orders placed
through the web shop during the campaign period.
\x0cCode      Amount
A-1       10
A-2       20";

    let file = convert_pdf(
        pdf.as_bytes(),
        "invoice.pdf",
        &MockExtractor::new(),
        &ExtractOptions::default(),
    )
    .unwrap();
    assert_eq!(file.file_name, "invoice.xlsx");

    let mut wb = read_xlsx(&file.bytes);
    // One sheet per detected table; page 2 text is dropped.
    assert_eq!(
        wb.sheet_names(),
        vec!["p1_tbl1".to_string(), "p3_tbl1".to_string()]
    );

    let range = wb.worksheet_range("p1_tbl1").unwrap();
    assert_eq!(cell(&range, 0, 0), "Item");
    assert_eq!(cell(&range, 1, 0), "Widget");
    assert_eq!(cell(&range, 1, 2), "12.50");
    assert_eq!(cell(&range, 2, 1), "1");

    let range = wb.worksheet_range("p3_tbl1").unwrap();
    assert_eq!(cell(&range, 2, 1), "20");
}

// ---------------------------------------------------------------------------
// Text fallback: one Text sheet, one row per page
// ---------------------------------------------------------------------------
#[test]
fn text_document_gets_text_sheet() {
    let pdf = "A letter about nothing in particular.\x0cKind regards,\nThe sender";

    let file = convert_pdf(
        pdf.as_bytes(),
        "letter.pdf",
        &MockExtractor::new(),
        &ExtractOptions::default(),
    )
    .unwrap();

    let mut wb = read_xlsx(&file.bytes);
    assert_eq!(wb.sheet_names(), vec!["Text".to_string()]);

    let range = wb.worksheet_range("Text").unwrap();
    assert_eq!(cell(&range, 0, 0), "Page");
    assert_eq!(cell(&range, 1, 0), "1");
    assert_eq!(cell(&range, 1, 1), "A letter about nothing in particular.");
    assert_eq!(cell(&range, 2, 0), "2");
    assert_eq!(cell(&range, 2, 1), "Kind regards,\nThe sender");
    assert_eq!(range.height(), 3);
}

// ---------------------------------------------------------------------------
// Scanned documents: placeholder rows plus Info sheet
// ---------------------------------------------------------------------------
#[test]
fn scanned_document_gets_placeholders_and_info() {
    let pdf = "\x0c\x0c"; // three empty pages

    let file = convert_pdf(
        pdf.as_bytes(),
        "scan.pdf",
        &MockExtractor::with_images(&[1, 2, 3]),
        &ExtractOptions::default(),
    )
    .unwrap();

    let mut wb = read_xlsx(&file.bytes);
    assert_eq!(
        wb.sheet_names(),
        vec!["Text".to_string(), "Info".to_string()]
    );

    let range = wb.worksheet_range("Text").unwrap();
    for row in 1..=3 {
        assert_eq!(cell(&range, row, 1), SCANNED_PLACEHOLDER);
    }

    let info = wb.worksheet_range("Info").unwrap();
    assert_eq!(cell(&info, 1, 1), "1, 2, 3");
}

#[test]
fn pages_without_images_are_not_ocr_candidates() {
    let pdf = "\x0csome actual words on the middle page\x0c";

    // Image info says only page 3 holds an image.
    let doc = extract_document(
        pdf.as_bytes(),
        "mixed.pdf",
        &MockExtractor::with_images(&[3]),
        &ExtractOptions::default(),
    )
    .unwrap();

    assert_eq!(doc.scanned_pages(), vec![1, 3]);
    assert_eq!(doc.ocr_pages, vec![3]);
}

#[test]
fn scanned_threshold_is_configurable() {
    let pdf = "ab"; // two visible characters

    let strict = ExtractOptions {
        scanned_min_chars: 5,
        ..ExtractOptions::default()
    };
    let doc = extract_document(pdf.as_bytes(), "x.pdf", &MockExtractor::new(), &strict).unwrap();
    assert!(matches!(doc.pages[0].kind, PageKind::Scanned));

    let doc = extract_document(
        pdf.as_bytes(),
        "x.pdf",
        &MockExtractor::new(),
        &ExtractOptions::default(),
    )
    .unwrap();
    assert!(matches!(doc.pages[0].kind, PageKind::Text { .. }));
}

// ---------------------------------------------------------------------------
// Batch conversion and bundling
// ---------------------------------------------------------------------------
#[test]
fn batch_bundles_one_workbook_per_document() {
    let inputs = vec![
        DocumentInput {
            file_name: "alpha.pdf".into(),
            bytes: b"first document text".to_vec(),
        },
        DocumentInput {
            file_name: "reports/beta.pdf".into(),
            bytes: b"second document text".to_vec(),
        },
    ];

    let outcome = convert_batch(&inputs, &MockExtractor::new(), &ExtractOptions::default()).unwrap();
    assert_eq!(outcome.files.len(), 2);
    assert!(outcome.failures.is_empty());

    let bundle = write_bundle(&outcome.files).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bundle)).unwrap();
    assert_eq!(archive.len(), 2);
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"alpha.xlsx"));
    assert!(names.contains(&"beta.xlsx"));
}

#[test]
fn corrupt_document_does_not_block_others() {
    let inputs = vec![
        DocumentInput {
            file_name: "bad.pdf".into(),
            bytes: b"corrupt".to_vec(),
        },
        DocumentInput {
            file_name: "good.pdf".into(),
            bytes: b"perfectly fine text".to_vec(),
        },
    ];

    let outcome = convert_batch(&inputs, &MockExtractor::new(), &ExtractOptions::default()).unwrap();
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].file_name, "good.xlsx");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].file_name, "bad.pdf");
    assert!(outcome.failures[0].reason.contains("corrupt"));
}

#[test]
fn empty_batch_is_an_error() {
    let result = convert_batch(&[], &MockExtractor::new(), &ExtractOptions::default());
    assert!(matches!(result, Err(KalkylError::EmptyBatch)));
}

// ---------------------------------------------------------------------------
// Model serialization (consumed by the CLI's JSON output)
// ---------------------------------------------------------------------------
#[test]
fn extract_serializes_with_page_kinds() {
    let pdf = "Col A     Col B\n1         2\x0cjust words";

    let doc = extract_document(
        pdf.as_bytes(),
        "doc.pdf",
        &MockExtractor::new(),
        &ExtractOptions::default(),
    )
    .unwrap();

    let json = serde_json::to_string(&doc).unwrap();
    assert!(json.contains("\"kind\":\"tables\""));
    assert!(json.contains("\"kind\":\"text\""));

    let back: kalkyl_core::model::DocumentExtract = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}
