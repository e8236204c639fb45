use kalkyl_core::extraction::pdftotext::PdftotextExtractor;
use kalkyl_core::extraction::ExtractOptions;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), kalkyl_core::error::KalkylError> {
    let pdf_bytes = std::fs::read(&input_file)?;
    let extractor = PdftotextExtractor::new();
    let file_name = input_file.to_string_lossy().to_string();
    let doc = kalkyl_core::extract_document(
        &pdf_bytes,
        &file_name,
        &extractor,
        &ExtractOptions::default(),
    )?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&doc)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} page(s) ({} table(s)), written to {}",
                doc.pages.len(),
                doc.table_count(),
                path.display()
            );
            if !doc.ocr_pages.is_empty() {
                eprintln!(
                    "  warning: page(s) {} look scanned; OCR recommended",
                    doc.ocr_pages
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        None => {
            let output_str = match output_format {
                "json" => serde_json::to_string_pretty(&doc)?,
                _ => output::table::format_extract(&doc),
            };
            println!("{output_str}");
        }
    }

    Ok(())
}
