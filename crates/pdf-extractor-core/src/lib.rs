//! pdf-extractor-core: Backend-independent types and algorithms.
//!
//! This crate provides the pieces shared by every PDF backend and by the
//! selectors that choose between them: error types, the extraction
//! [`Method`] and [`Capabilities`], the [`TextBackend`] / [`TableBackend`]
//! traits, [`Diagnostic`] reporting, page text assembly, the [`RawTable`]
//! cleaning policy, and the lattice and stream grid builders that turn page
//! geometry into raw tables.

pub mod backend;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod layout;
pub mod method;
pub mod stream;
pub mod table;
pub mod text;

pub use backend::{BackendSet, PageTables, PageText, TableBackend, TextBackend};
pub use diagnostics::{
    CollectingDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, TracingDiagnostics, Unit,
};
pub use document::DocumentRef;
pub use error::{BackendError, ExtractError};
pub use geometry::{BBox, Edge, Matrix, Orientation};
pub use lattice::LatticeSettings;
pub use layout::{Glyph, TextLine, Word, WordOptions};
pub use method::{BackendKind, Capabilities, Method};
pub use stream::StreamSettings;
pub use table::{RawCell, RawTable, is_empty_cell};
pub use text::{assemble_pages, page_block};
