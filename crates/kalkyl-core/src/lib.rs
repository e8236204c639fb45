pub mod bundle;
pub mod error;
pub mod extraction;
pub mod model;
pub mod workbook;

use bundle::ConvertedFile;
use error::KalkylError;
use extraction::{table::detect_tables, ExtractOptions, PdfExtractor};
use model::{DocumentExtract, PageExtract, PageKind};

/// Extract a single PDF into per-page tables, text, or scanned flags.
///
/// Per page: table detection runs first; when it finds anything, text
/// extraction is skipped for that page. Pages with neither tables nor
/// visible text are flagged as likely scanned. Extraction errors are fatal
/// for the whole document.
pub fn extract_document(
    pdf_bytes: &[u8],
    file_name: &str,
    extractor: &dyn PdfExtractor,
    options: &ExtractOptions,
) -> Result<DocumentExtract, KalkylError> {
    let raw_pages = extractor.extract_pages(pdf_bytes)?;

    // Image info feeds the OCR recommendation; only fetched when some page
    // actually lacks text.
    let any_textless = raw_pages
        .iter()
        .any(|p| p.visible_chars() < options.scanned_min_chars);
    let image_pages = if options.check_images && any_textless {
        extractor.image_pages(pdf_bytes)?
    } else {
        None
    };

    let mut pages = Vec::new();
    let mut ocr_pages = Vec::new();

    for raw in &raw_pages {
        let tables = detect_tables(&raw.lines, &options.table);
        let kind = if !tables.is_empty() {
            PageKind::Tables { tables }
        } else if raw.visible_chars() >= options.scanned_min_chars {
            PageKind::Text {
                text: raw.lines.join("\n").trim().to_string(),
            }
        } else {
            // OCR is only worth recommending when we know the page holds
            // an image; with no image info, recommend anyway.
            let has_image = image_pages
                .as_ref()
                .map(|list| list.contains(&raw.page_number))
                .unwrap_or(true);
            if has_image {
                ocr_pages.push(raw.page_number);
            }
            PageKind::Scanned
        };

        pages.push(PageExtract {
            page_number: raw.page_number,
            kind,
        });
    }

    Ok(DocumentExtract {
        file_name: file_name.to_string(),
        pages,
        ocr_pages,
    })
}

/// Convert one PDF to a workbook file named after the source filename stem.
pub fn convert_pdf(
    pdf_bytes: &[u8],
    file_name: &str,
    extractor: &dyn PdfExtractor,
    options: &ExtractOptions,
) -> Result<ConvertedFile, KalkylError> {
    let doc = extract_document(pdf_bytes, file_name, extractor, options)?;
    let workbook = workbook::build_workbook(&doc);
    let bytes = workbook::xlsx::write_xlsx(&workbook)?;

    Ok(ConvertedFile {
        file_name: bundle::xlsx_name(file_name),
        bytes,
    })
}
