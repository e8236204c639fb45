use serde::{Deserialize, Serialize};

/// Placeholder text written for pages with nothing to extract.
pub const SCANNED_PLACEHOLDER: &str = "No extractable content (page may be scanned)";

/// A rectangular grid of cell text extracted from one page.
///
/// Rows and columns are order-preserving; cells hold text verbatim, with
/// no numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }
}

/// What extraction produced for one page: tables, plain text, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    /// One or more tables; text extraction was skipped for this page.
    Tables { tables: Vec<Table> },
    /// No tables; the page's plain text.
    Text { text: String },
    /// Neither tables nor text; likely a scanned image.
    Scanned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageExtract {
    pub page_number: usize,
    #[serde(flatten)]
    pub kind: PageKind,
}

/// Everything extracted from one PDF document, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtract {
    /// Original filename of the source PDF (names the output workbook).
    pub file_name: String,
    pub pages: Vec<PageExtract>,
    /// Scanned pages worth running OCR on (image-bearing when image info
    /// was available).
    pub ocr_pages: Vec<usize>,
}

impl DocumentExtract {
    /// True when at least one table was found anywhere in the document.
    pub fn has_tables(&self) -> bool {
        self.pages
            .iter()
            .any(|p| matches!(p.kind, PageKind::Tables { .. }))
    }

    /// Page numbers flagged as likely scanned.
    pub fn scanned_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| matches!(p.kind, PageKind::Scanned))
            .map(|p| p.page_number)
            .collect()
    }

    /// Total number of tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages
            .iter()
            .map(|p| match &p.kind {
                PageKind::Tables { tables } => tables.len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_page(n: usize, text: &str) -> PageExtract {
        PageExtract {
            page_number: n,
            kind: PageKind::Text { text: text.into() },
        }
    }

    #[test]
    fn test_has_tables_and_counts() {
        let doc = DocumentExtract {
            file_name: "report.pdf".into(),
            pages: vec![
                text_page(1, "intro"),
                PageExtract {
                    page_number: 2,
                    kind: PageKind::Tables {
                        tables: vec![
                            Table {
                                rows: vec![vec!["a".into(), "b".into()]],
                            },
                            Table {
                                rows: vec![vec!["c".into(), "d".into()]],
                            },
                        ],
                    },
                },
                PageExtract {
                    page_number: 3,
                    kind: PageKind::Scanned,
                },
            ],
            ocr_pages: vec![3],
        };

        assert!(doc.has_tables());
        assert_eq!(doc.table_count(), 2);
        assert_eq!(doc.scanned_pages(), vec![3]);
    }

    #[test]
    fn test_page_kind_json_tag() {
        let page = PageExtract {
            page_number: 1,
            kind: PageKind::Scanned,
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"kind\":\"scanned\""));
    }
}
