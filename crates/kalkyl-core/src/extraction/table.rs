use crate::model::Table;

/// Table detection over pdftotext -layout output.
///
/// -layout preserves column alignment using spaces, so a table shows up as
/// a run of consecutive lines whose cells are separated by aligned gaps of
/// two or more spaces. Detection finds those runs, infers the column
/// boundaries shared by the whole run, and slices each line into cells.

/// Tuning knobs for table detection.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Minimum data rows for an accepted table.
    pub min_rows: usize,
    /// Minimum columns for an accepted table.
    pub min_cols: usize,
    /// Minimum width (in spaces) of a column separator.
    pub min_gap: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            min_rows: 2,
            min_cols: 2,
            min_gap: 2,
        }
    }
}

/// Detect tables within one page of layout text.
///
/// Returns accepted tables in top-to-bottom order. Lines that do not form
/// an accepted table are left for the caller's text fallback.
pub fn detect_tables(lines: &[String], options: &TableOptions) -> Vec<Table> {
    let mut tables = Vec::new();

    for region in find_regions(lines, options) {
        let grid = extract_grid(&lines[region.0..region.1], options.min_gap);
        let grid = clean_grid(grid);

        if grid.len() >= options.min_rows
            && grid.first().map(|r| r.len()).unwrap_or(0) >= options.min_cols
        {
            tables.push(Table { rows: grid });
        }
    }

    tables
}

/// Find candidate table regions: maximal runs of consecutive lines that
/// each split into at least two cells. Returns half-open line ranges.
fn find_regions(lines: &[String], options: &TableOptions) -> Vec<(usize, usize)> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        if cell_count(line, options.min_gap) >= 2 {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if i - s >= options.min_rows {
                regions.push((s, i));
            }
        }
    }

    if let Some(s) = start {
        if lines.len() - s >= options.min_rows {
            regions.push((s, lines.len()));
        }
    }

    regions
}

/// Number of cells a single line splits into on gaps of `min_gap`+ spaces.
fn cell_count(line: &str, min_gap: usize) -> usize {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let mut cells = 1;
    let mut run = 0;
    for c in trimmed.chars() {
        if c == ' ' {
            run += 1;
        } else {
            if run >= min_gap {
                cells += 1;
            }
            run = 0;
        }
    }
    cells
}

/// Slice a region of lines into a rectangular grid of trimmed cells.
///
/// A character index is part of a separator when every line of the region
/// has a space there (indices past a line's end count as space). Separator
/// runs of `min_gap`+ characters cut the region into column spans.
fn extract_grid(lines: &[String], min_gap: usize) -> Vec<Vec<String>> {
    let chars: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
    let width = chars.iter().map(|l| l.len()).max().unwrap_or(0);

    let is_separator: Vec<bool> = (0..width)
        .map(|idx| chars.iter().all(|l| l.get(idx).map_or(true, |c| *c == ' ')))
        .collect();

    let spans = column_spans(&is_separator, min_gap);

    chars
        .iter()
        .map(|line| {
            spans
                .iter()
                .map(|&(start, end)| {
                    let end = end.min(line.len());
                    if start >= end {
                        String::new()
                    } else {
                        line[start..end].iter().collect::<String>().trim().to_string()
                    }
                })
                .collect()
        })
        .collect()
}

/// Split the index range into column spans, cutting at separator runs of
/// `min_gap`+ characters. Thin interior runs stay inside a span (they are
/// ordinary spaces within cell text); edge runs always cut.
fn column_spans(is_separator: &[bool], min_gap: usize) -> Vec<(usize, usize)> {
    let width = is_separator.len();
    let mut cut = vec![false; width];

    let mut idx = 0;
    while idx < width {
        if !is_separator[idx] {
            idx += 1;
            continue;
        }
        let run_start = idx;
        while idx < width && is_separator[idx] {
            idx += 1;
        }
        if idx - run_start >= min_gap || run_start == 0 || idx == width {
            for c in run_start..idx {
                cut[c] = true;
            }
        }
    }

    let mut spans = Vec::new();
    let mut idx = 0;
    while idx < width {
        if cut[idx] {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < width && !cut[idx] {
            idx += 1;
        }
        spans.push((start, idx));
    }

    spans
}

/// Drop fully-empty rows and columns; the grid stays rectangular.
fn clean_grid(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));
    if rows.is_empty() {
        return rows;
    }

    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(cols, String::new());
    }

    let keep: Vec<usize> = (0..cols)
        .filter(|&c| rows.iter().any(|row| !row[c].is_empty()))
        .collect();

    rows.iter()
        .map(|row| keep.iter().map(|&c| row[c].clone()).collect())
        .collect()
}
