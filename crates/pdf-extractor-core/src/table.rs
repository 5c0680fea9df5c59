//! Raw table grids and the cleaning policy shared by both backends.

/// A table cell as read from the page. `None` means no text was found.
pub type RawCell = Option<String>;

/// Whether a cell counts as empty: absent or whitespace-only.
pub fn is_empty_cell(cell: &RawCell) -> bool {
    cell.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// A table grid before conversion to a DataFrame.
///
/// The first row of a detected grid is the header. All rows share the
/// header's width; ragged rows are padded with `None` on construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub header: Vec<RawCell>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Build a table whose header is the first row of `grid`.
    ///
    /// Returns `None` for an empty grid. The width is the widest row;
    /// shorter rows, the header included, are padded with `None`.
    pub fn from_grid(grid: Vec<Vec<RawCell>>) -> Option<RawTable> {
        let width = grid.iter().map(Vec::len).max()?;
        let mut rows = grid.into_iter().map(|mut row| {
            row.resize(width, None);
            row
        });
        let header = rows.next()?;
        Some(RawTable {
            header,
            rows: rows.collect(),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded).
    pub fn data_rows(&self) -> usize {
        self.rows.len()
    }

    /// Apply the cleaning policy.
    ///
    /// Drops data rows whose cells are all empty, then drops columns whose
    /// remaining data cells are all empty (the header cell does not keep a
    /// column alive). Returns `None` when no data row survives. Rows are
    /// fitted to the header's width first.
    pub fn clean(self) -> Option<RawTable> {
        let width = self.header.len();
        let rows: Vec<Vec<RawCell>> = self
            .rows
            .into_iter()
            .filter(|row| !row.iter().all(is_empty_cell))
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        if rows.is_empty() {
            return None;
        }

        let keep: Vec<bool> = (0..width)
            .map(|col| rows.iter().any(|row| !is_empty_cell(&row[col])))
            .collect();
        let project = |row: Vec<RawCell>| -> Vec<RawCell> {
            row.into_iter()
                .zip(&keep)
                .filter_map(|(cell, &k)| k.then_some(cell))
                .collect()
        };

        Some(RawTable {
            header: project(self.header),
            rows: rows.into_iter().map(project).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> RawCell {
        Some(s.to_string())
    }

    #[test]
    fn empty_cell_detection() {
        assert!(is_empty_cell(&None));
        assert!(is_empty_cell(&cell("")));
        assert!(is_empty_cell(&cell("  \n")));
        assert!(!is_empty_cell(&cell(" x ")));
    }

    #[test]
    fn from_grid_takes_first_row_as_header_and_pads() {
        let table = RawTable::from_grid(vec![
            vec![cell("Name"), cell("Qty")],
            vec![cell("apple"), cell("3"), cell("extra")],
            vec![cell("pear")],
        ])
        .unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.header, vec![cell("Name"), cell("Qty"), None]);
        assert_eq!(table.rows[1], vec![cell("pear"), None, None]);
        assert_eq!(table.data_rows(), 2);
    }

    #[test]
    fn from_grid_empty() {
        assert!(RawTable::from_grid(Vec::new()).is_none());
    }

    #[test]
    fn clean_drops_empty_rows_and_columns() {
        let table = RawTable::from_grid(vec![
            vec![cell("A"), cell("B"), cell("C")],
            vec![cell("1"), None, cell("x")],
            vec![None, cell(" "), None],
            vec![cell("2"), None, cell("y")],
        ])
        .unwrap();
        let cleaned = table.clean().unwrap();
        assert_eq!(cleaned.header, vec![cell("A"), cell("C")]);
        assert_eq!(
            cleaned.rows,
            vec![vec![cell("1"), cell("x")], vec![cell("2"), cell("y")]]
        );
    }

    #[test]
    fn clean_ignores_header_when_dropping_columns() {
        let table = RawTable::from_grid(vec![
            vec![cell("A"), cell("Notes")],
            vec![cell("1"), None],
        ])
        .unwrap();
        let cleaned = table.clean().unwrap();
        assert_eq!(cleaned.header, vec![cell("A")]);
    }

    #[test]
    fn clean_discards_table_without_data() {
        let header_only = RawTable::from_grid(vec![vec![cell("A"), cell("B")]]).unwrap();
        assert!(header_only.clean().is_none());

        let blank_rows = RawTable::from_grid(vec![
            vec![cell("A"), cell("B")],
            vec![None, cell("")],
        ])
        .unwrap();
        assert!(blank_rows.clean().is_none());
    }

    #[test]
    fn clean_fits_hand_built_ragged_rows() {
        let table = RawTable {
            header: vec![cell("A"), cell("B"), cell("C")],
            rows: vec![
                vec![cell("1")],
                vec![cell("2"), cell("x"), None, cell("overflow")],
            ],
        };
        let cleaned = table.clean().unwrap();
        assert_eq!(cleaned.header, vec![cell("A"), cell("B")]);
        assert_eq!(
            cleaned.rows,
            vec![vec![cell("1"), None], vec![cell("2"), cell("x")]]
        );
    }

    #[test]
    fn clean_keeps_complete_table_unchanged() {
        let table = RawTable::from_grid(vec![
            vec![cell("Name"), cell("Qty")],
            vec![cell("apple"), cell("3")],
        ])
        .unwrap();
        assert_eq!(table.clone().clean(), Some(table));
    }
}
