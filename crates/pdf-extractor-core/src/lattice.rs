//! Table detection from painted ruling lines.
//!
//! Ruling edges are snapped onto shared positions, collinear pieces are
//! joined, their crossings become grid corners, and every rectangle whose
//! corners and sides are all present becomes a cell. Cells that touch are
//! grouped into tables, and each table is laid out as a rectangular grid
//! whose cell text comes from the words centred inside it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::geometry::{BBox, Edge, Orientation};
use crate::layout::{Word, cluster_words_into_lines};
use crate::table::{RawCell, RawTable};

/// Tolerances for lattice detection, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSettings {
    /// Edges closer than this along their cross axis are aligned.
    pub snap_tolerance: f64,
    /// Collinear edges with a gap up to this are merged.
    pub join_tolerance: f64,
    /// Edges shorter than this are ignored.
    pub edge_min_length: f64,
    /// Slack when testing whether two edges cross.
    pub intersection_tolerance: f64,
    /// Line grouping tolerance for text inside a cell.
    pub text_y_tolerance: f64,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            edge_min_length: 3.0,
            intersection_tolerance: 3.0,
            text_y_tolerance: 3.0,
        }
    }
}

/// A detected cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub bbox: BBox,
}

/// Detect tables on one page.
///
/// Tables come back top-to-bottom, then left-to-right. A table's first grid
/// row becomes its header.
pub fn extract_tables(edges: &[Edge], words: &[Word], settings: &LatticeSettings) -> Vec<RawTable> {
    let edges: Vec<Edge> = edges
        .iter()
        .filter(|e| e.length() >= settings.edge_min_length)
        .copied()
        .collect();
    let edges = snap_edges(edges, settings.snap_tolerance);
    let edges = join_edges(edges, settings.join_tolerance);
    let points = edges_to_intersections(&edges, settings.intersection_tolerance);
    let cells = intersections_to_cells(&points, &edges, settings.intersection_tolerance);

    cells_to_tables(cells)
        .iter()
        .filter_map(|cells| RawTable::from_grid(table_grid(cells, words, settings.text_y_tolerance)))
        .collect()
}

/// Align nearly-collinear edges onto the mean of their cluster.
pub fn snap_edges(mut edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    let position = |e: &Edge| match e.orientation {
        Orientation::Horizontal => e.top,
        Orientation::Vertical => e.x0,
    };
    edges.sort_by(|a, b| position(a).total_cmp(&position(b)));

    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let indices: Vec<usize> = (0..edges.len())
            .filter(|&i| edges[i].orientation == orientation)
            .collect();

        let mut cluster: Vec<usize> = Vec::new();
        let flush = |cluster: &mut Vec<usize>, edges: &mut [Edge]| {
            if cluster.is_empty() {
                return;
            }
            let mean =
                cluster.iter().map(|&i| position(&edges[i])).sum::<f64>() / cluster.len() as f64;
            for &i in cluster.iter() {
                match orientation {
                    Orientation::Horizontal => {
                        edges[i].top = mean;
                        edges[i].bottom = mean;
                    }
                    Orientation::Vertical => {
                        edges[i].x0 = mean;
                        edges[i].x1 = mean;
                    }
                }
            }
            cluster.clear();
        };

        for i in indices {
            if let Some(&last) = cluster.last() {
                if position(&edges[i]) - position(&edges[last]) > tolerance {
                    flush(&mut cluster, &mut edges);
                }
            }
            cluster.push(i);
        }
        flush(&mut cluster, &mut edges);
    }
    edges
}

/// Merge collinear edges that overlap or are separated by at most `tolerance`.
pub fn join_edges(edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    let mut groups: BTreeMap<(u8, i64), Vec<Edge>> = BTreeMap::new();
    for edge in edges {
        let key = match edge.orientation {
            Orientation::Horizontal => (0, float_key(edge.top)),
            Orientation::Vertical => (1, float_key(edge.x0)),
        };
        groups.entry(key).or_default().push(edge);
    }

    let mut joined = Vec::new();
    for (_, mut group) in groups {
        let span = |e: &Edge| match e.orientation {
            Orientation::Horizontal => (e.x0, e.x1),
            Orientation::Vertical => (e.top, e.bottom),
        };
        group.sort_by(|a, b| span(a).0.total_cmp(&span(b).0));

        let mut current: Option<Edge> = None;
        for edge in group {
            match current.as_mut() {
                Some(cur) if span(&edge).0 <= span(cur).1 + tolerance => {
                    let end = span(&edge).1.max(span(cur).1);
                    match cur.orientation {
                        Orientation::Horizontal => cur.x1 = end,
                        Orientation::Vertical => cur.bottom = end,
                    }
                }
                _ => joined.extend(current.replace(edge)),
            }
        }
        joined.extend(current);
    }
    joined
}

/// Points where a horizontal edge crosses a vertical one.
///
/// Sorted by x then y, without duplicates.
pub fn edges_to_intersections(edges: &[Edge], tolerance: f64) -> Vec<(f64, f64)> {
    let (horizontals, verticals): (Vec<&Edge>, Vec<&Edge>) = edges
        .iter()
        .partition(|e| e.orientation == Orientation::Horizontal);

    let mut points = Vec::new();
    for h in &horizontals {
        for v in &verticals {
            if v.x0 >= h.x0 - tolerance
                && v.x0 <= h.x1 + tolerance
                && h.top >= v.top - tolerance
                && h.top <= v.bottom + tolerance
            {
                points.push((v.x0, h.top));
            }
        }
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    points.dedup_by(|a, b| float_key(a.0) == float_key(b.0) && float_key(a.1) == float_key(b.1));
    points
}

/// Smallest rectangles whose four corners are intersections and whose four
/// sides are covered by edges.
///
/// Each intersection is tried as a top-left corner: the nearest point below
/// it on the same x and the nearest point to its right on the same y are
/// paired, closest first, until they close a rectangle. Only points on the
/// corner's own rules take part, so rules of a neighbouring table do not
/// split its cells.
pub fn intersections_to_cells(points: &[(f64, f64)], edges: &[Edge], tolerance: f64) -> Vec<Cell> {
    let present: HashSet<(i64, i64)> = points
        .iter()
        .map(|&(x, y)| (float_key(x), float_key(y)))
        .collect();
    let mut by_x: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    let mut by_y: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    for &point in points {
        by_x.entry(float_key(point.0)).or_default().push(point);
        by_y.entry(float_key(point.1)).or_default().push(point);
    }
    for column in by_x.values_mut() {
        column.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    for row in by_y.values_mut() {
        row.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    let mut cells = Vec::new();
    for &(x0, top) in points {
        let below = by_x
            .get(&float_key(x0))
            .into_iter()
            .flatten()
            .filter(|p| float_key(p.1) > float_key(top));
        let right: Vec<&(f64, f64)> = by_y
            .get(&float_key(top))
            .into_iter()
            .flatten()
            .filter(|p| float_key(p.0) > float_key(x0))
            .collect();

        let cell = below
            .filter(|&&(_, bottom)| covered(edges, Orientation::Vertical, x0, top, bottom, tolerance))
            .find_map(|&(_, bottom)| {
                right
                    .iter()
                    .filter(|&&&(x1, _)| {
                        covered(edges, Orientation::Horizontal, top, x0, x1, tolerance)
                    })
                    .find(|&&&(x1, _)| {
                        present.contains(&(float_key(x1), float_key(bottom)))
                            && covered(edges, Orientation::Horizontal, bottom, x0, x1, tolerance)
                            && covered(edges, Orientation::Vertical, x1, top, bottom, tolerance)
                    })
                    .map(|&&(x1, _)| BBox::new(x0, top, x1, bottom))
            });
        cells.extend(cell.map(|bbox| Cell { bbox }));
    }
    cells.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    cells
}

/// Whether a single edge runs along `position` from `start` to `end`.
fn covered(
    edges: &[Edge],
    orientation: Orientation,
    position: f64,
    start: f64,
    end: f64,
    tolerance: f64,
) -> bool {
    edges.iter().any(|e| {
        if e.orientation != orientation {
            return false;
        }
        let (pos, lo, hi) = match orientation {
            Orientation::Horizontal => (e.top, e.x0, e.x1),
            Orientation::Vertical => (e.x0, e.top, e.bottom),
        };
        (pos - position).abs() <= tolerance && lo <= start + tolerance && hi >= end - tolerance
    })
}

/// Group cells that share a boundary into tables.
///
/// Tables are ordered top-to-bottom, then left-to-right.
pub fn cells_to_tables(cells: Vec<Cell>) -> Vec<Vec<Cell>> {
    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    // Neighbours are looked up by the boundary they would share.
    let mut by_left: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut by_top: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        by_left.entry(float_key(cell.bbox.x0)).or_default().push(i);
        by_top.entry(float_key(cell.bbox.top)).or_default().push(i);
    }

    for (i, cell) in cells.iter().enumerate() {
        let right = by_left.get(&float_key(cell.bbox.x1)).into_iter().flatten();
        let under = by_top.get(&float_key(cell.bbox.bottom)).into_iter().flatten();
        for &j in right.chain(under) {
            if cells_share_edge(cell, &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut groups: HashMap<usize, Vec<Cell>> = HashMap::new();
    for (i, cell) in cells.into_iter().enumerate() {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(cell);
    }

    let mut tables: Vec<(BBox, Vec<Cell>)> = groups
        .into_values()
        .map(|group| {
            let bbox = group
                .iter()
                .skip(1)
                .fold(group[0].bbox, |acc, c| acc.union(&c.bbox));
            (bbox, group)
        })
        .collect();
    tables.sort_by(|a, b| a.0.top.total_cmp(&b.0.top).then(a.0.x0.total_cmp(&b.0.x0)));
    tables.into_iter().map(|(_, cells)| cells).collect()
}

fn cells_share_edge(a: &Cell, b: &Cell) -> bool {
    let (a, b) = (a.bbox, b.bbox);
    let same = |p: f64, q: f64| float_key(p) == float_key(q);
    let shared_vertical =
        (same(a.x1, b.x0) || same(a.x0, b.x1)) && a.top < b.bottom && b.top < a.bottom;
    let shared_horizontal =
        (same(a.bottom, b.top) || same(a.top, b.bottom)) && a.x0 < b.x1 && b.x0 < a.x1;
    shared_vertical || shared_horizontal
}

/// Lay a table's cells out on a rectangular grid and fill in their text.
///
/// Grid positions with no cell are `None`.
fn table_grid(cells: &[Cell], words: &[Word], y_tolerance: f64) -> Vec<Vec<RawCell>> {
    let rows: BTreeSet<i64> = cells.iter().map(|c| float_key(c.bbox.top)).collect();
    let cols: BTreeSet<i64> = cells.iter().map(|c| float_key(c.bbox.x0)).collect();
    let row_index: HashMap<i64, usize> = rows.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let col_index: HashMap<i64, usize> = cols.iter().enumerate().map(|(i, k)| (*k, i)).collect();

    let mut grid = vec![vec![None; cols.len()]; rows.len()];
    for cell in cells {
        let r = row_index[&float_key(cell.bbox.top)];
        let c = col_index[&float_key(cell.bbox.x0)];
        grid[r][c] = cell_text(&cell.bbox, words, y_tolerance);
    }
    grid
}

fn cell_text(bbox: &BBox, words: &[Word], y_tolerance: f64) -> RawCell {
    let inside: Vec<Word> = words
        .iter()
        .filter(|w| {
            let (x, y) = w.bbox.center();
            bbox.contains_point(x, y)
        })
        .cloned()
        .collect();
    if inside.is_empty() {
        return None;
    }
    Some(
        cluster_words_into_lines(&inside, y_tolerance)
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Round to thousandths of a point for grouping.
fn float_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x0: f64, x1: f64, y: f64) -> Edge {
        Edge {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Orientation::Horizontal,
        }
    }

    fn v(x: f64, top: f64, bottom: f64) -> Edge {
        Edge {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Orientation::Vertical,
        }
    }

    fn word(text: &str, x0: f64, top: f64) -> Word {
        Word::new(text, BBox::new(x0, top, x0 + 20.0, top + 8.0))
    }

    /// 2x2 grid spanning x 0..200, y 0..40.
    fn grid_edges() -> Vec<Edge> {
        vec![
            h(0.0, 200.0, 0.0),
            h(0.0, 200.0, 20.0),
            h(0.0, 200.0, 40.0),
            v(0.0, 0.0, 40.0),
            v(100.0, 0.0, 40.0),
            v(200.0, 0.0, 40.0),
        ]
    }

    #[test]
    fn snap_aligns_nearby_edges() {
        let snapped = snap_edges(vec![h(0.0, 10.0, 100.0), h(20.0, 30.0, 102.0)], 3.0);
        assert_eq!(snapped[0].top, 101.0);
        assert_eq!(snapped[1].top, 101.0);
    }

    #[test]
    fn snap_keeps_distant_edges() {
        let snapped = snap_edges(vec![h(0.0, 10.0, 100.0), h(0.0, 10.0, 110.0)], 3.0);
        assert_eq!(snapped[0].top, 100.0);
        assert_eq!(snapped[1].top, 110.0);
    }

    #[test]
    fn join_merges_collinear_segments() {
        let joined = join_edges(vec![h(0.0, 50.0, 10.0), h(52.0, 100.0, 10.0), h(200.0, 250.0, 10.0)], 3.0);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].x0, 0.0);
        assert_eq!(joined[0].x1, 100.0);
    }

    #[test]
    fn intersections_of_grid() {
        let points = edges_to_intersections(&grid_edges(), 1.0);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], (0.0, 0.0));
    }

    #[test]
    fn cells_from_grid_points() {
        let edges = grid_edges();
        let points = edges_to_intersections(&edges, 1.0);
        let cells = intersections_to_cells(&points, &edges, 1.0);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].bbox, BBox::new(0.0, 0.0, 100.0, 20.0));
    }

    #[test]
    fn separate_grids_become_separate_tables() {
        let mut edges = grid_edges();
        edges.extend([
            h(0.0, 100.0, 300.0),
            h(0.0, 100.0, 320.0),
            v(0.0, 300.0, 320.0),
            v(100.0, 300.0, 320.0),
        ]);
        let cells = intersections_to_cells(&edges_to_intersections(&edges, 1.0), &edges, 1.0);
        let tables = cells_to_tables(cells);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 4);
        assert_eq!(tables[1].len(), 1);
    }

    #[test]
    fn stacked_tables_keep_their_own_columns() {
        // Upper table splits at x=100, lower one at x=50.
        let edges = vec![
            h(0.0, 200.0, 0.0),
            h(0.0, 200.0, 20.0),
            h(0.0, 200.0, 40.0),
            v(0.0, 0.0, 40.0),
            v(100.0, 0.0, 40.0),
            v(200.0, 0.0, 40.0),
            h(0.0, 200.0, 100.0),
            h(0.0, 200.0, 120.0),
            h(0.0, 200.0, 140.0),
            v(0.0, 100.0, 140.0),
            v(50.0, 100.0, 140.0),
            v(200.0, 100.0, 140.0),
        ];
        let words = vec![
            word("A", 10.0, 6.0),
            word("B", 110.0, 6.0),
            word("a1", 10.0, 26.0),
            word("b1", 110.0, 26.0),
            word("C", 10.0, 106.0),
            word("D", 110.0, 106.0),
            word("c1", 10.0, 126.0),
            word("d1", 110.0, 126.0),
        ];
        let tables = extract_tables(&edges, &words, &LatticeSettings::default());
        let cell = |s: &str| Some(s.to_string());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].header, vec![cell("A"), cell("B")]);
        assert_eq!(tables[0].rows, vec![vec![cell("a1"), cell("b1")]]);
        assert_eq!(tables[1].header, vec![cell("C"), cell("D")]);
        assert_eq!(tables[1].rows, vec![vec![cell("c1"), cell("d1")]]);
    }

    #[test]
    fn cell_spans_missing_inner_rule() {
        // The x=100 rule only divides the lower row.
        let edges = vec![
            h(0.0, 200.0, 0.0),
            h(0.0, 200.0, 20.0),
            h(0.0, 200.0, 40.0),
            v(0.0, 0.0, 40.0),
            v(100.0, 20.0, 40.0),
            v(200.0, 0.0, 40.0),
        ];
        let cells = intersections_to_cells(&edges_to_intersections(&edges, 1.0), &edges, 1.0);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].bbox, BBox::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(cells_to_tables(cells).len(), 1);
    }

    #[test]
    fn dense_grid_is_one_table() {
        let n = 100;
        let step = 5.0;
        let extent = n as f64 * step;
        let mut edges = Vec::new();
        for i in 0..=n {
            let p = i as f64 * step;
            edges.push(h(0.0, extent, p));
            edges.push(v(p, 0.0, extent));
        }
        let tables = extract_tables(&edges, &[], &LatticeSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].width(), n);
        assert_eq!(tables[0].data_rows(), n - 1);
    }

    #[test]
    fn extract_tables_fills_cells_from_words() {
        let words = vec![
            word("Name", 10.0, 6.0),
            word("Qty", 110.0, 6.0),
            word("apple", 10.0, 26.0),
            word("3", 110.0, 26.0),
        ];
        let tables = extract_tables(&grid_edges(), &words, &LatticeSettings::default());
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(
            table.header,
            vec![Some("Name".to_string()), Some("Qty".to_string())]
        );
        assert_eq!(
            table.rows,
            vec![vec![Some("apple".to_string()), Some("3".to_string())]]
        );
    }

    #[test]
    fn empty_cells_are_none() {
        let words = vec![word("Name", 10.0, 6.0)];
        let tables = extract_tables(&grid_edges(), &words, &LatticeSettings::default());
        assert_eq!(tables[0].rows[0], vec![None, None]);
    }

    #[test]
    fn no_edges_no_tables() {
        let words = vec![word("text", 10.0, 10.0)];
        assert!(extract_tables(&[], &words, &LatticeSettings::default()).is_empty());
    }

    #[test]
    fn short_edges_are_ignored() {
        let edges = vec![h(0.0, 1.0, 0.0), v(0.5, 0.0, 1.0)];
        assert!(extract_tables(&edges, &[], &LatticeSettings::default()).is_empty());
    }
}
