//! Writing extracted text and tables to disk.

use std::fmt;
use std::fs::File;
use std::path::Path;

use polars::prelude::{
    CsvWriter, DataFrame, JsonFormat, JsonWriter, ParquetCompression, ParquetWriter, SerWriter,
};

use crate::error::{Error, Result};

/// On-disk format for extracted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// zstd-compressed Parquet.
    #[default]
    Parquet,
    /// Comma-separated values, header row first.
    Csv,
    /// A JSON array of header-keyed records.
    Json,
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Parquet => "parquet",
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write `text` to `path` as UTF-8, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn save_text(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

/// Write one table to `path` in `format`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created and
/// [`Error::Polars`] if serialization fails.
pub fn write_table(df: &DataFrame, path: &Path, format: TableFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    // The polars writers take the frame mutably; write a shallow clone.
    let mut df = df.clone();
    let written = match format {
        TableFormat::Parquet => ParquetWriter::new(file)
            .with_compression(ParquetCompression::Zstd(None))
            .finish(&mut df)
            .map(|_| ()),
        TableFormat::Csv => CsvWriter::new(file).include_header(true).finish(&mut df),
        TableFormat::Json => JsonWriter::new(file)
            .with_json_format(JsonFormat::Json)
            .finish(&mut df),
    };
    written.map_err(|source| Error::Polars {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `dir` and its parents if missing.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}
