use kalkyl_core::model::{DocumentExtract, PageKind, Table};

/// Human-readable rendering of one document's extraction result.
pub fn format_extract(doc: &DocumentExtract) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} — {} page(s), {} table(s)\n",
        doc.file_name,
        doc.pages.len(),
        doc.table_count()
    ));

    for page in &doc.pages {
        match &page.kind {
            PageKind::Tables { tables } => {
                out.push_str(&format!(
                    "\nPage {}: {} table(s)\n",
                    page.page_number,
                    tables.len()
                ));
                for (i, table) in tables.iter().enumerate() {
                    out.push_str(&format!(
                        "  [p{}_tbl{}] {} x {}\n",
                        page.page_number,
                        i + 1,
                        table.row_count(),
                        table.col_count()
                    ));
                    out.push_str(&render_grid(table, "    "));
                }
            }
            PageKind::Text { text } => {
                let lines = text.lines().filter(|l| !l.trim().is_empty()).count();
                out.push_str(&format!(
                    "\nPage {}: text ({} line(s))\n",
                    page.page_number, lines
                ));
            }
            PageKind::Scanned => {
                out.push_str(&format!(
                    "\nPage {}: likely scanned (no extractable content)\n",
                    page.page_number
                ));
            }
        }
    }

    if !doc.ocr_pages.is_empty() {
        out.push_str(&format!(
            "\nOCR recommended for page(s): {}\n",
            doc.ocr_pages
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    out
}

/// Render a grid with columns padded to their widest cell.
fn render_grid(table: &Table, indent: &str) -> String {
    let cols = table.col_count();
    let mut widths = vec![0usize; cols];
    for row in &table.rows {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &table.rows {
        let rendered: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| format!("{:<width$}", cell, width = widths[c]))
            .collect();
        out.push_str(indent);
        out.push_str(rendered.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
