use kalkyl_core::bundle::{convert_batch, write_bundle, DocumentInput};
use kalkyl_core::error::KalkylError;
use kalkyl_core::extraction::pdftotext::PdftotextExtractor;
use kalkyl_core::extraction::table::TableOptions;
use kalkyl_core::extraction::ExtractOptions;
use std::path::PathBuf;

pub fn run(
    files: Vec<PathBuf>,
    out: Option<PathBuf>,
    scanned_min_chars: usize,
    no_image_check: bool,
    min_gap: usize,
) -> Result<(), KalkylError> {
    let options = ExtractOptions {
        table: TableOptions {
            min_gap,
            ..TableOptions::default()
        },
        scanned_min_chars,
        check_images: !no_image_check,
    };

    let mut inputs = Vec::new();
    for path in &files {
        inputs.push(DocumentInput {
            file_name: path.to_string_lossy().to_string(),
            bytes: std::fs::read(path)?,
        });
    }

    let extractor = PdftotextExtractor::new();
    let outcome = convert_batch(&inputs, &extractor, &options)?;

    for failure in &outcome.failures {
        eprintln!("warning: {} failed: {}", failure.file_name, failure.reason);
    }
    if outcome.files.is_empty() {
        return Err(KalkylError::AllFailed);
    }

    // Single document: write the workbook directly. Several: bundle them.
    if inputs.len() == 1 {
        let file = &outcome.files[0];
        let path = out.unwrap_or_else(|| PathBuf::from(&file.file_name));
        std::fs::write(&path, &file.bytes)?;
        eprintln!("Wrote {}", path.display());
    } else {
        let bundle = write_bundle(&outcome.files)?;
        let path = out.unwrap_or_else(|| PathBuf::from("converted.zip"));
        std::fs::write(&path, bundle)?;
        eprintln!(
            "Wrote {} ({} workbook(s))",
            path.display(),
            outcome.files.len()
        );
    }

    Ok(())
}
