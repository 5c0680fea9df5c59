use std::path::Path;

use pdf_extractor::{ExtractorOptions, Method, TableFormat};

use crate::shared::{
    build_extractor, open_document, print_json, print_table_shapes, print_text_result,
    report_error, tables_json,
};

pub fn run(
    input: &Path,
    output_dir: Option<&Path>,
    text_method: Method,
    table_method: Method,
    format: TableFormat,
    json: bool,
) -> Result<(), i32> {
    let doc = open_document(input)?;
    let extractor = build_extractor(ExtractorOptions {
        text_method,
        table_method,
        table_format: format,
    })?;

    let dir = output_dir.map_or_else(|| doc.default_tables_dir(), Path::to_path_buf);
    let summary = extractor
        .extract_all(doc.path(), Some(&dir))
        .map_err(report_error)?;

    if json {
        print_json(&serde_json::json!({
            "input": doc.path().display().to_string(),
            "output_dir": dir.display().to_string(),
            "text_path": summary.text_path.display().to_string(),
            "characters": summary.text.chars().count(),
            "tables": tables_json(&summary.tables, &summary.table_paths),
        }));
    } else {
        print_text_result(&summary.text_path, &summary.text);
        println!("Extracted {} tables to: {}", summary.tables.len(), dir.display());
        print_table_shapes(&summary.tables);
    }
    Ok(())
}
