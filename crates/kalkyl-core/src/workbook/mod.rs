pub mod xlsx;

use serde::{Deserialize, Serialize};

use crate::model::{DocumentExtract, PageKind, SCANNED_PLACEHOLDER};

/// One sheet of cell text, written verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Spreadsheet output for one document. The sheet set is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Build a workbook from one document's extracted pages.
///
/// If any table was found anywhere in the document: one sheet per table,
/// named `p{page}_tbl{n}`, ordered by page then table index; page text is
/// dropped. Otherwise a single `Text` sheet with one row per page. Pages
/// flagged for OCR get an extra `Info` sheet either way.
pub fn build_workbook(doc: &DocumentExtract) -> Workbook {
    let mut names = SheetNames::new();
    let mut sheets = Vec::new();

    if doc.has_tables() {
        for page in &doc.pages {
            if let PageKind::Tables { tables } = &page.kind {
                for (i, table) in tables.iter().enumerate() {
                    let name = names.claim(&format!("p{}_tbl{}", page.page_number, i + 1));
                    sheets.push(Sheet {
                        name,
                        rows: table.rows.clone(),
                    });
                }
            }
        }
    } else {
        let mut rows = vec![vec!["Page".to_string(), "Text".to_string()]];
        for page in &doc.pages {
            let text = match &page.kind {
                PageKind::Text { text } => text.clone(),
                PageKind::Scanned => SCANNED_PLACEHOLDER.to_string(),
                // Unreachable: has_tables() was false.
                PageKind::Tables { .. } => String::new(),
            };
            rows.push(vec![page.page_number.to_string(), text]);
        }
        if doc.pages.is_empty() {
            rows.push(vec![String::new(), "No extractable content found.".to_string()]);
        }
        sheets.push(Sheet {
            name: names.claim("Text"),
            rows,
        });
    }

    if !doc.ocr_pages.is_empty() {
        let pages = doc
            .ocr_pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        sheets.push(Sheet {
            name: names.claim("Info"),
            rows: vec![
                vec!["Note".to_string(), "Pages".to_string()],
                vec![
                    "Some pages appear scanned (image-only). OCR recommended.".to_string(),
                    pages,
                ],
            ],
        });
    }

    Workbook { sheets }
}

/// Excel sheet names must be <= 31 chars and cannot contain : \ / ? * [ ]
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => ' ',
            c => c,
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "Sheet".to_string();
    }
    collapsed.chars().take(31).collect()
}

/// Allocates unique sanitized sheet names, suffixing duplicates.
struct SheetNames {
    taken: Vec<String>,
}

impl SheetNames {
    fn new() -> Self {
        SheetNames { taken: Vec::new() }
    }

    fn claim(&mut self, wanted: &str) -> String {
        let base = sanitize_sheet_name(wanted);
        let mut name = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&name) {
            name = sanitize_sheet_name(&format!("{base}_{suffix}"));
            suffix += 1;
        }
        self.taken.push(name.clone());
        name
    }
}
