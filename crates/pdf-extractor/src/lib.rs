//! pdf-extractor: Extract text and tables from PDF documents.
//!
//! This is the public API facade crate. It chooses between the PDF backends
//! in `pdf-extractor-backends`, turns detected tables into polars
//! [`DataFrame`](polars::prelude::DataFrame)s, and writes results to disk.
//!
//! # Architecture
//!
//! - **pdf-extractor-core**: backend-independent types, fallback primitives,
//!   table cleaning, grid builders
//! - **pdf-extractor-backends**: the `pdf-extract` and `lopdf` backends
//! - **pdf-extractor** (this crate): the text and table selectors, DataFrame
//!   conversion, persistence, and [`PdfExtractor`]
//!
//! # Example
//!
//! ```ignore
//! use pdf_extractor::{ExtractorOptions, Method, PdfExtractor, TableFormat};
//!
//! let extractor = PdfExtractor::with_options(ExtractorOptions {
//!     table_method: Method::Lopdf,
//!     table_format: TableFormat::Csv,
//!     ..ExtractorOptions::default()
//! })?;
//! let tables = extractor.extract_and_save_tables("report.pdf", None)?;
//! ```

mod error;
mod extractor;
pub mod frame;
mod persist;
mod tables;
mod text;

pub use error::{Error, Result};
pub use extractor::{ExtractionSummary, ExtractorOptions, PdfExtractor};
pub use persist::{TableFormat, save_text, write_table};
pub use tables::TableExtractor;
pub use text::TextExtractor;

pub use pdf_extractor_backends::capabilities;
pub use pdf_extractor_core;
pub use pdf_extractor_core::{
    BackendError, BackendKind, Capabilities, CollectingDiagnostics, Diagnostic, DiagnosticKind,
    Diagnostics, ExtractError, Method, TracingDiagnostics, Unit,
};
pub use polars;
