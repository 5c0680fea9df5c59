//! Table detection from aligned text runs.
//!
//! Runs are grouped into lines and adjacent runs on a line are merged into
//! segments. Consecutive lines with at least two segments form a candidate
//! block; the x-extents of the block's segments are projected onto one axis
//! and every gap in that projection separates two columns.

use crate::geometry::BBox;
use crate::layout::{TextLine, Word, cluster_words_into_lines};
use crate::table::{RawCell, RawTable};

/// Tolerances for stream detection, in PDF points unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSettings {
    /// Runs on one line closer than this are merged into a segment.
    pub x_tolerance: f64,
    /// Runs whose vertical midpoints differ by at most this share a line.
    pub y_tolerance: f64,
    /// Minimum lines (header included) for a block to count as a table.
    pub min_rows: usize,
    /// Minimum columns for a block to count as a table.
    pub min_columns: usize,
    /// Largest vertical gap between rows of one table, in line heights.
    pub max_row_gap: f64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            min_rows: 2,
            min_columns: 2,
            max_row_gap: 2.0,
        }
    }
}

/// Detect tables on one page from its text runs.
///
/// Tables are returned top-to-bottom. A block's first line becomes the
/// header.
pub fn extract_tables(runs: &[Word], settings: &StreamSettings) -> Vec<RawTable> {
    let lines = segment_lines(runs, settings);
    candidate_blocks(&lines, settings)
        .into_iter()
        .filter_map(|block| {
            let columns = column_spans(block, settings.x_tolerance);
            if columns.len() < settings.min_columns {
                return None;
            }
            RawTable::from_grid(block.iter().map(|line| row_cells(line, &columns)).collect())
        })
        .collect()
}

/// Group runs into lines and merge touching runs into segments.
pub fn segment_lines(runs: &[Word], settings: &StreamSettings) -> Vec<TextLine> {
    let runs: Vec<Word> = runs
        .iter()
        .filter(|r| !r.text.trim().is_empty())
        .cloned()
        .collect();

    cluster_words_into_lines(&runs, settings.y_tolerance)
        .into_iter()
        .map(|line| {
            let mut segments: Vec<Word> = Vec::new();
            for run in line.words {
                match segments.last_mut() {
                    Some(seg) if run.bbox.x0 - seg.bbox.x1 <= settings.x_tolerance => {
                        if run.bbox.x0 - seg.bbox.x1 > 1.0 && !seg.text.ends_with(' ') {
                            seg.text.push(' ');
                        }
                        seg.text.push_str(&run.text);
                        seg.bbox = seg.bbox.union(&run.bbox);
                    }
                    _ => segments.push(run),
                }
            }
            TextLine {
                words: segments,
                bbox: line.bbox,
            }
        })
        .collect()
}

/// Runs of consecutive multi-segment lines.
fn candidate_blocks<'a>(lines: &'a [TextLine], settings: &StreamSettings) -> Vec<&'a [TextLine]> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        let tabular = line.words.len() >= 2;
        let continues = match (start, i.checked_sub(1)) {
            (Some(_), Some(prev)) => {
                let prev = &lines[prev].bbox;
                let gap = line.bbox.top - prev.bottom;
                gap <= prev.height().max(1.0) * settings.max_row_gap
            }
            _ => false,
        };

        match (tabular, start) {
            (true, Some(_)) if continues => {}
            (true, _) => {
                if let Some(s) = start {
                    blocks.push(&lines[s..i]);
                }
                start = Some(i);
            }
            (false, Some(s)) => {
                blocks.push(&lines[s..i]);
                start = None;
            }
            (false, None) => {}
        }
    }
    if let Some(s) = start {
        blocks.push(&lines[s..]);
    }

    blocks.retain(|b| b.len() >= settings.min_rows);
    blocks
}

/// Column x-ranges of a block: the union of segment extents, split at gaps.
fn column_spans(block: &[TextLine], tolerance: f64) -> Vec<(f64, f64)> {
    let mut extents: Vec<(f64, f64)> = block
        .iter()
        .flat_map(|line| line.words.iter().map(|w| (w.bbox.x0, w.bbox.x1)))
        .collect();
    extents.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut spans: Vec<(f64, f64)> = Vec::new();
    for (x0, x1) in extents {
        match spans.last_mut() {
            Some(span) if x0 <= span.1 + tolerance => span.1 = span.1.max(x1),
            _ => spans.push((x0, x1)),
        }
    }
    spans
}

fn row_cells(line: &TextLine, columns: &[(f64, f64)]) -> Vec<RawCell> {
    let mut row: Vec<RawCell> = vec![None; columns.len()];
    for segment in &line.words {
        let col = column_for(&segment.bbox, columns);
        if let Some(text) = &mut row[col] {
            text.push(' ');
            text.push_str(&segment.text);
        } else {
            row[col] = Some(segment.text.clone());
        }
    }
    row
}

fn column_for(bbox: &BBox, columns: &[(f64, f64)]) -> usize {
    let (x, _) = bbox.center();
    columns
        .iter()
        .position(|&(x0, x1)| x >= x0 && x <= x1)
        .unwrap_or_else(|| {
            columns
                .iter()
                .rposition(|&(x0, _)| x0 <= x)
                .unwrap_or(0)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x0: f64, top: f64, x1: f64) -> Word {
        Word::new(text, BBox::new(x0, top, x1, top + 10.0))
    }

    fn cell(s: &str) -> RawCell {
        Some(s.to_string())
    }

    #[test]
    fn aligned_runs_form_a_table() {
        let runs = vec![
            run("Name", 72.0, 100.0, 100.0),
            run("Qty", 200.0, 100.0, 220.0),
            run("apple", 72.0, 114.0, 104.0),
            run("3", 210.0, 114.0, 216.0),
            run("pear", 72.0, 128.0, 98.0),
            run("12", 205.0, 128.0, 218.0),
        ];
        let tables = extract_tables(&runs, &StreamSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, vec![cell("Name"), cell("Qty")]);
        assert_eq!(
            tables[0].rows,
            vec![vec![cell("apple"), cell("3")], vec![cell("pear"), cell("12")]]
        );
    }

    #[test]
    fn paragraph_lines_are_not_tables() {
        let runs = vec![
            run("A single sentence of prose.", 72.0, 100.0, 300.0),
            run("Another line of prose.", 72.0, 114.0, 260.0),
        ];
        assert!(extract_tables(&runs, &StreamSettings::default()).is_empty());
    }

    #[test]
    fn touching_runs_merge_into_one_segment() {
        let runs = vec![
            run("Hel", 72.0, 100.0, 90.0),
            run("lo", 90.0, 100.0, 100.0),
            run("world", 102.0, 100.0, 130.0),
        ];
        let lines = segment_lines(&runs, &StreamSettings::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words.len(), 1);
        assert_eq!(lines[0].words[0].text, "Hello world");
    }

    #[test]
    fn missing_cell_stays_empty() {
        let runs = vec![
            run("Item", 72.0, 100.0, 100.0),
            run("Price", 200.0, 100.0, 230.0),
            run("Note", 300.0, 100.0, 330.0),
            run("tea", 72.0, 114.0, 92.0),
            run("4.50", 200.0, 114.0, 225.0),
        ];
        let tables = extract_tables(&runs, &StreamSettings::default());
        assert_eq!(tables[0].width(), 3);
        assert_eq!(tables[0].rows[0], vec![cell("tea"), cell("4.50"), None]);
    }

    #[test]
    fn prose_splits_tables() {
        let runs = vec![
            run("a", 72.0, 100.0, 80.0),
            run("b", 200.0, 100.0, 210.0),
            run("c", 72.0, 114.0, 80.0),
            run("d", 200.0, 114.0, 210.0),
            run("Some prose between the tables.", 72.0, 128.0, 300.0),
            run("e", 72.0, 142.0, 80.0),
            run("f", 200.0, 142.0, 210.0),
            run("g", 72.0, 156.0, 80.0),
            run("h", 200.0, 156.0, 210.0),
        ];
        let tables = extract_tables(&runs, &StreamSettings::default());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].header, vec![cell("e"), cell("f")]);
    }

    #[test]
    fn large_vertical_gap_splits_tables() {
        let runs = vec![
            run("a", 72.0, 100.0, 80.0),
            run("b", 200.0, 100.0, 210.0),
            run("c", 72.0, 114.0, 80.0),
            run("d", 200.0, 114.0, 210.0),
            run("e", 72.0, 400.0, 80.0),
            run("f", 200.0, 400.0, 210.0),
        ];
        let tables = extract_tables(&runs, &StreamSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data_rows(), 1);
    }

    #[test]
    fn single_tabular_line_is_not_a_table() {
        let runs = vec![run("a", 72.0, 100.0, 80.0), run("b", 200.0, 100.0, 210.0)];
        assert!(extract_tables(&runs, &StreamSettings::default()).is_empty());
    }
}
