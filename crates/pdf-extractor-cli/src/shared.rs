use std::path::{Path, PathBuf};

use pdf_extractor::pdf_extractor_core::DocumentRef;
use pdf_extractor::polars::prelude::DataFrame;
use pdf_extractor::{ExtractorOptions, PdfExtractor};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Check that the input exists, with a user-friendly error message.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found.
pub fn open_document(input: &Path) -> Result<DocumentRef, i32> {
    DocumentRef::open(input).map_err(|_| {
        eprintln!("Error: file not found: {}", input.display());
        1
    })
}

/// Build the facade, reporting construction errors on stderr.
pub fn build_extractor(options: ExtractorOptions) -> Result<PdfExtractor, i32> {
    PdfExtractor::with_options(options).map_err(report_error)
}

/// Print an error to stderr and map it to exit code 1.
pub fn report_error(err: impl std::fmt::Display) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Print `Extracted N characters` for a text result.
pub fn print_text_result(path: &Path, text: &str) {
    println!("Text extracted and saved to: {}", path.display());
    println!("Extracted {} characters", text.chars().count());
}

/// Print the `Table i: r rows, c columns` lines.
pub fn print_table_shapes(tables: &[DataFrame]) {
    for (i, df) in tables.iter().enumerate() {
        println!("Table {i}: {} rows, {} columns", df.height(), df.width());
    }
}

/// JSON description of saved tables.
pub fn tables_json(tables: &[DataFrame], paths: &[PathBuf]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = tables
        .iter()
        .zip(paths)
        .enumerate()
        .map(|(i, (df, path))| {
            serde_json::json!({
                "index": i,
                "path": path.display().to_string(),
                "rows": df.height(),
                "columns": df.width(),
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

/// Print a JSON value on one line.
pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}
