use std::path::{Path, PathBuf};

use pdf_extractor::{ExtractorOptions, Method, TableFormat};

use crate::shared::{
    build_extractor, open_document, print_json, print_table_shapes, report_error, tables_json,
};

pub fn run(
    input: &Path,
    output_dir: Option<&Path>,
    method: Method,
    format: TableFormat,
    json: bool,
) -> Result<(), i32> {
    let doc = open_document(input)?;
    let extractor = build_extractor(ExtractorOptions {
        table_method: method,
        table_format: format,
        ..ExtractorOptions::default()
    })?;

    let dir = output_dir.map_or_else(|| doc.default_tables_dir(), Path::to_path_buf);
    let tables = extractor
        .extract_and_save_tables(doc.path(), Some(&dir))
        .map_err(report_error)?;

    if json {
        let paths: Vec<PathBuf> = (0..tables.len())
            .map(|i| doc.table_path(&dir, i, format.extension()))
            .collect();
        print_json(&serde_json::json!({
            "input": doc.path().display().to_string(),
            "output_dir": dir.display().to_string(),
            "tables": tables_json(&tables, &paths),
        }));
    } else {
        println!("Extracted {} tables", tables.len());
        print_table_shapes(&tables);
    }
    Ok(())
}
