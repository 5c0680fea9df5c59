use std::path::Path;

use pdf_extractor::{ExtractorOptions, Method};

use crate::shared::{build_extractor, open_document, print_json, print_text_result, report_error};

pub fn run(input: &Path, output: Option<&Path>, method: Method, json: bool) -> Result<(), i32> {
    let doc = open_document(input)?;
    let extractor = build_extractor(ExtractorOptions {
        text_method: method,
        ..ExtractorOptions::default()
    })?;

    let output_path = output.map_or_else(|| doc.default_text_path(), Path::to_path_buf);
    let text = extractor
        .extract_and_save_text(doc.path(), Some(&output_path))
        .map_err(report_error)?;

    if json {
        print_json(&serde_json::json!({
            "input": doc.path().display().to_string(),
            "text_path": output_path.display().to_string(),
            "characters": text.chars().count(),
        }));
    } else {
        print_text_result(&output_path, &text);
    }
    Ok(())
}
