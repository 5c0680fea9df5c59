//! The [`PdfExtractor`] facade.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pdf_extractor_core::{Diagnostics, DocumentRef, Method};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::persist::{self, TableFormat};
use crate::tables::TableExtractor;
use crate::text::TextExtractor;

/// Configuration for a [`PdfExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractorOptions {
    /// Method for text extraction.
    pub text_method: Method,
    /// Method for table extraction.
    pub table_method: Method,
    /// File format for saved tables.
    pub table_format: TableFormat,
}

/// Everything [`PdfExtractor::extract_all`] produced and wrote.
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub text: String,
    pub text_path: PathBuf,
    pub tables: Vec<DataFrame>,
    pub table_paths: Vec<PathBuf>,
}

/// Text and table extraction with file output.
///
/// Holds one [`TextExtractor`] and one [`TableExtractor`]; each call opens
/// the document anew, so an extractor can be reused across documents.
///
/// # Example
///
/// ```ignore
/// let extractor = PdfExtractor::new()?;
/// let text = extractor.extract_and_save_text("report.pdf", None)?;
/// let tables = extractor.extract_and_save_tables("report.pdf", Some("out".as_ref()))?;
/// ```
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    text: TextExtractor,
    tables: TableExtractor,
    table_format: TableFormat,
}

impl PdfExtractor {
    /// An extractor using `auto` for both text and tables, saving Parquet.
    ///
    /// # Errors
    ///
    /// Never fails with the default options; the signature matches
    /// [`PdfExtractor::with_options`].
    pub fn new() -> Result<Self> {
        Self::with_options(ExtractorOptions::default())
    }

    /// # Errors
    ///
    /// Returns [`ExtractError::BackendUnavailable`](pdf_extractor_core::ExtractError::BackendUnavailable)
    /// if an explicit method names a backend missing from this build.
    pub fn with_options(options: ExtractorOptions) -> Result<Self> {
        Ok(Self::from_parts(
            TextExtractor::new(options.text_method)?,
            TableExtractor::new(options.table_method)?,
            options.table_format,
        ))
    }

    /// Assemble an extractor from preconfigured selectors.
    pub fn from_parts(text: TextExtractor, tables: TableExtractor, table_format: TableFormat) -> Self {
        Self {
            text,
            tables,
            table_format,
        }
    }

    /// Send recovered failures from both selectors to `diagnostics`.
    pub fn with_diagnostics(self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            text: self.text.with_diagnostics(diagnostics.clone()),
            tables: self.tables.with_diagnostics(diagnostics),
            table_format: self.table_format,
        }
    }

    pub fn table_format(&self) -> TableFormat {
        self.table_format
    }

    pub fn extract_text(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(self.text.extract(path)?)
    }

    pub fn extract_tables(&self, path: impl AsRef<Path>) -> Result<Vec<DataFrame>> {
        Ok(self.tables.extract(path)?)
    }

    /// Write `text` to `path`, replacing any existing file.
    pub fn save_text(&self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        persist::save_text(text, path.as_ref())
    }

    /// Extract the text and write it to `output`, or next to the document
    /// with a `.txt` extension.
    pub fn extract_and_save_text(&self, path: impl AsRef<Path>, output: Option<&Path>) -> Result<String> {
        let doc = DocumentRef::open(path)?;
        let text = self.text.extract(doc.path())?;
        let output = output.map_or_else(|| doc.default_text_path(), Path::to_path_buf);
        persist::save_text(&text, &output)?;
        tracing::info!(path = %output.display(), chars = text.chars().count(), "text saved");
        Ok(text)
    }

    /// Extract the tables and write each one to `output_dir` (default: the
    /// document's directory) as `{stem}_table_{i}.{ext}`.
    pub fn extract_and_save_tables(
        &self,
        path: impl AsRef<Path>,
        output_dir: Option<&Path>,
    ) -> Result<Vec<DataFrame>> {
        let doc = DocumentRef::open(path)?;
        let tables = self.tables.extract(doc.path())?;
        let dir = output_dir.map_or_else(|| doc.default_tables_dir(), Path::to_path_buf);
        self.save_tables(&doc, &tables, &dir)?;
        Ok(tables)
    }

    /// Extract text and tables, writing `{stem}.txt` and the table files
    /// into `output_dir` (default: the document's directory).
    pub fn extract_all(&self, path: impl AsRef<Path>, output_dir: Option<&Path>) -> Result<ExtractionSummary> {
        let doc = DocumentRef::open(path)?;
        let dir = output_dir.map_or_else(|| doc.default_tables_dir(), Path::to_path_buf);
        persist::ensure_dir(&dir)?;

        let text = self.text.extract(doc.path())?;
        let text_path = dir.join(format!("{}.txt", doc.stem()));
        persist::save_text(&text, &text_path)?;

        let tables = self.tables.extract(doc.path())?;
        let table_paths = self.save_tables(&doc, &tables, &dir)?;

        Ok(ExtractionSummary {
            text,
            text_path,
            tables,
            table_paths,
        })
    }

    fn save_tables(&self, doc: &DocumentRef, tables: &[DataFrame], dir: &Path) -> Result<Vec<PathBuf>> {
        persist::ensure_dir(dir)?;
        let mut paths = Vec::with_capacity(tables.len());
        for (index, df) in tables.iter().enumerate() {
            let path = doc.table_path(dir, index, self.table_format.extension());
            persist::write_table(df, &path, self.table_format)?;
            tracing::info!(
                path = %path.display(),
                format = %self.table_format,
                rows = df.height(),
                columns = df.width(),
                "table saved"
            );
            paths.push(path);
        }
        Ok(paths)
    }
}
