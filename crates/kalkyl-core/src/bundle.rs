use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::KalkylError;
use crate::extraction::{ExtractOptions, PdfExtractor};

/// One PDF to convert: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A finished workbook file, named after its source PDF.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub file_name: String,
    pub reason: String,
}

/// Result of a batch run: converted workbooks plus per-document failures.
///
/// Documents are isolated; a corrupt input produces a failure entry and
/// the batch carries on with the rest.
#[derive(Debug)]
pub struct BatchOutcome {
    pub files: Vec<ConvertedFile>,
    pub failures: Vec<BatchFailure>,
}

/// Convert a batch of PDFs sequentially, one document at a time.
pub fn convert_batch(
    inputs: &[DocumentInput],
    extractor: &dyn PdfExtractor,
    options: &ExtractOptions,
) -> Result<BatchOutcome, KalkylError> {
    if inputs.is_empty() {
        return Err(KalkylError::EmptyBatch);
    }

    let mut files = Vec::new();
    let mut failures = Vec::new();

    for input in inputs {
        match crate::convert_pdf(&input.bytes, &input.file_name, extractor, options) {
            Ok(file) => files.push(file),
            Err(e) => failures.push(BatchFailure {
                file_name: input.file_name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(BatchOutcome { files, failures })
}

/// Bundle converted workbooks into one zip archive, one entry per file.
///
/// Entry names collide when two source PDFs share a filename stem; the
/// later one gets a `_2` style suffix so every entry stays unique.
pub fn write_bundle(files: &[ConvertedFile]) -> Result<Vec<u8>, KalkylError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut taken: Vec<String> = Vec::new();
    for file in files {
        let name = unique_entry_name(&file.file_name, &taken);
        zip.start_file(name.clone(), options)?;
        zip.write_all(&file.bytes)?;
        taken.push(name);
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Derive the output workbook name from the source PDF filename.
pub fn xlsx_name(pdf_name: &str) -> String {
    let stem = Path::new(pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if stem.is_empty() {
        "output.xlsx".to_string()
    } else {
        format!("{stem}.xlsx")
    }
}

fn unique_entry_name(wanted: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == wanted) {
        return wanted.to_string();
    }
    let (stem, ext) = match wanted.rsplit_once('.') {
        Some((s, e)) => (s.to_string(), format!(".{e}")),
        None => (wanted.to_string(), String::new()),
    };
    let mut suffix = 2;
    loop {
        let candidate = format!("{stem}_{suffix}{ext}");
        if !taken.iter().any(|t| *t == candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    #[test]
    fn test_xlsx_name() {
        assert_eq!(xlsx_name("report.pdf"), "report.xlsx");
        assert_eq!(xlsx_name("data/2024/report.pdf"), "report.xlsx");
        assert_eq!(xlsx_name("no_extension"), "no_extension.xlsx");
        assert_eq!(xlsx_name(""), "output.xlsx");
    }

    #[test]
    fn test_unique_entry_name() {
        let taken = vec!["a.xlsx".to_string(), "a_2.xlsx".to_string()];
        assert_eq!(unique_entry_name("b.xlsx", &taken), "b.xlsx");
        assert_eq!(unique_entry_name("a.xlsx", &taken), "a_3.xlsx");
    }

    #[test]
    fn test_write_bundle_entries() {
        let files = vec![
            ConvertedFile {
                file_name: "a.xlsx".into(),
                bytes: vec![1, 2, 3],
            },
            ConvertedFile {
                file_name: "a.xlsx".into(),
                bytes: vec![4, 5],
            },
        ];
        let bytes = write_bundle(&files).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
        assert!(names.contains(&"a.xlsx".to_string()));
        assert!(names.contains(&"a_2.xlsx".to_string()));

        use std::io::Read;
        let mut entry = archive.by_name("a_2.xlsx").unwrap();
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![4, 5]);
    }
}
