use crate::error::KalkylError;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext and pdfimages (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables, and
/// `pdfimages -list` to find pages that carry raster images (input to the
/// scanned-page heuristic).
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, KalkylError> {
        let tmpfile = stage_pdf(pdf_bytes)?;

        // Run pdftotext -layout for table-friendly text extraction.
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KalkylError::PdftotextNotFound
                } else {
                    KalkylError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(KalkylError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text))
    }

    fn image_pages(&self, pdf_bytes: &[u8]) -> Result<Option<Vec<usize>>, KalkylError> {
        let tmpfile = stage_pdf(pdf_bytes)?;
        list_image_pages(tmpfile.path())
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Write PDF bytes to a temp file so the poppler tools can read them.
fn stage_pdf(pdf_bytes: &[u8]) -> Result<tempfile::NamedTempFile, KalkylError> {
    let mut tmpfile =
        tempfile::NamedTempFile::new().map_err(|e| KalkylError::Extraction(e.to_string()))?;
    tmpfile
        .write_all(pdf_bytes)
        .map_err(|e| KalkylError::Extraction(e.to_string()))?;
    Ok(tmpfile)
}

/// Split pdftotext output into pages (form feed \x0c is the page separator).
///
/// Empty pages are kept; the scanned-page heuristic needs to see them.
fn split_pages(text: &str) -> Vec<PageContent> {
    let mut chunks: Vec<&str> = text.split('\x0c').collect();
    // pdftotext emits a form feed after every page, leaving one empty
    // trailing chunk.
    if chunks.last() == Some(&"") {
        chunks.pop();
    }

    chunks
        .iter()
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
        })
        .collect()
}

fn list_image_pages(pdf_path: &Path) -> Result<Option<Vec<usize>>, KalkylError> {
    let output = match Command::new("pdfimages").arg("-list").arg(pdf_path).output() {
        Ok(o) => o,
        // pdfimages missing is not fatal; the caller falls back to the
        // text-only heuristic.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(KalkylError::Extraction(format!("pdfimages failed: {}", e)));
        }
    };

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(KalkylError::Extraction(format!(
            "pdfimages -list failed with exit code {}: {}",
            code, stderr
        )));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    Ok(Some(parse_image_list(&listing)))
}

/// Parse `pdfimages -list` output into a sorted, deduplicated page list.
///
/// The listing has a two-line header followed by one row per image, with
/// the page number in the first column.
fn parse_image_list(listing: &str) -> Vec<usize> {
    let mut pages: Vec<usize> = listing
        .lines()
        .filter_map(|line| {
            let first = line.split_whitespace().next()?;
            first.parse::<usize>().ok()
        })
        .collect();
    pages.sort_unstable();
    pages.dedup();
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_keeps_empty_pages() {
        let text = "page one\nline two\n\x0c\x0cpage three\n\x0c";
        let pages = split_pages(text);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines, vec!["page one", "line two"]);
        assert!(pages[1].lines.is_empty());
        assert_eq!(pages[2].page_number, 3);
        assert_eq!(pages[2].lines, vec!["page three"]);
    }

    #[test]
    fn test_split_pages_single_page() {
        let pages = split_pages("only page\n\x0c");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
    }

    #[test]
    fn test_parse_image_list() {
        let listing = "\
page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
--------------------------------------------------------------------------------------------
   1     0 image    2550  3300  gray    1   1  ccitt  no         8  0   300   300 23.9K 2.2%
   1     1 image     100   100  rgb     3   8  jpeg   no        12  0    72    72 1024B 3.4%
   3     2 image    2550  3300  gray    1   1  ccitt  no        15  0   300   300 22.1K 2.0%
";
        assert_eq!(parse_image_list(listing), vec![1, 3]);
    }

    #[test]
    fn test_parse_image_list_no_images() {
        let listing = "\
page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
--------------------------------------------------------------------------------------------
";
        assert!(parse_image_list(listing).is_empty());
    }

    #[test]
    fn test_visible_chars() {
        let page = PageContent {
            page_number: 1,
            lines: vec!["  a b  ".into(), "".into(), "\t".into()],
        };
        assert_eq!(page.visible_chars(), 2);
    }
}
