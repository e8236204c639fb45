pub mod pdftotext;
pub mod table;

use crate::error::KalkylError;
use table::TableOptions;

/// Raw content extracted from a single page of a PDF.
///
/// Lines come from layout-preserving text extraction, so column alignment
/// of tabular data survives as runs of spaces.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    /// Count of non-whitespace characters across all lines.
    pub fn visible_chars(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }
}

/// Trait for PDF extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract layout text from PDF bytes, returning one PageContent per page.
    ///
    /// Empty pages must still be present in the result so the scanned-page
    /// heuristic can see them.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, KalkylError>;

    /// Page numbers (1-based) that contain at least one raster image.
    ///
    /// Returns `None` when the backend cannot tell; callers then fall back
    /// to the text-only scanned heuristic.
    fn image_pages(&self, pdf_bytes: &[u8]) -> Result<Option<Vec<usize>>, KalkylError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Tuning knobs for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub table: TableOptions,
    /// A page with fewer visible characters than this is considered to have
    /// no extractable text.
    pub scanned_min_chars: usize,
    /// When true, a text-less page is only recommended for OCR if image
    /// info proves the page carries a raster image.
    pub check_images: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            table: TableOptions::default(),
            scanned_min_chars: 1,
            check_images: true,
        }
    }
}
