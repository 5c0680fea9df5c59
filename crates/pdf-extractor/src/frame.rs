//! Conversion of cleaned raw tables into polars DataFrames.

use std::collections::HashMap;

use pdf_extractor_core::{RawCell, RawTable, is_empty_cell};
use polars::prelude::{Column, DataFrame, PolarsResult};

/// Column names for a header row.
///
/// A missing or blank name becomes `column_{i}` (its 0-based position). A
/// name seen before gets a `_{n}` suffix, counting repeats in order of
/// appearance. Names are trimmed.
pub fn column_names(header: &[RawCell]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());
    for (i, cell) in header.iter().enumerate() {
        let base = match cell {
            Some(name) if !is_empty_cell(cell) => name.trim().to_string(),
            _ => format!("column_{i}"),
        };
        let count = seen.entry(base.clone()).or_insert(0);
        let mut name = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        // A generated suffix may itself collide with an earlier literal name.
        while names.contains(&name) {
            *count += 1;
            name = format!("{base}_{count}");
        }
        *count += 1;
        names.push(name);
    }
    names
}

/// Build a DataFrame with one nullable string column per header cell.
///
/// # Errors
///
/// Returns the polars error if the frame cannot be assembled.
pub fn to_dataframe(table: &RawTable) -> PolarsResult<DataFrame> {
    let columns = column_names(&table.header)
        .into_iter()
        .enumerate()
        .map(|(col, name)| {
            let values: Vec<Option<String>> = table
                .rows
                .iter()
                .map(|row| row.get(col).cloned().flatten())
                .collect();
            Column::new(name.into(), values)
        })
        .collect();
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> RawCell {
        Some(s.to_string())
    }

    #[test]
    fn names_pass_through() {
        assert_eq!(column_names(&[cell("Name"), cell("Qty")]), vec!["Name", "Qty"]);
    }

    #[test]
    fn blank_names_use_position() {
        assert_eq!(
            column_names(&[None, cell("Qty"), cell("  ")]),
            vec!["column_0", "Qty", "column_2"]
        );
    }

    #[test]
    fn repeated_names_get_suffixes() {
        assert_eq!(
            column_names(&[cell("A"), cell("A"), cell("B"), cell("A")]),
            vec!["A", "A_1", "B", "A_2"]
        );
    }

    #[test]
    fn suffix_does_not_shadow_literal_name() {
        let names = column_names(&[cell("A_1"), cell("A"), cell("A")]);
        assert_eq!(names, vec!["A_1", "A", "A_2"]);

        let names = column_names(&[cell("A"), cell("A"), cell("A_1"), cell("A")]);
        assert_eq!(names, vec!["A", "A_1", "A_1_1", "A_2"]);
    }

    #[test]
    fn dataframe_shape_and_nulls() {
        let table = RawTable {
            header: vec![cell("Name"), cell("Qty")],
            rows: vec![vec![cell("apple"), cell("3")], vec![cell("pear"), None]],
        };
        let df = to_dataframe(&table).unwrap();
        assert_eq!(df.shape(), (2, 2));
        let qty = df.column("Qty").unwrap();
        assert_eq!(qty.null_count(), 1);
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["Name", "Qty"]);
    }
}
