//! Table extraction selector.

use std::path::Path;
use std::sync::Arc;

use pdf_extractor_core::{
    BackendError, BackendKind, BackendSet, Capabilities, Diagnostic, DiagnosticKind, Diagnostics,
    DocumentRef, ExtractError, Method, PageTables, TableBackend, TracingDiagnostics, Unit,
};
use polars::prelude::DataFrame;

use crate::frame;

/// Extracts tables from a PDF with a fixed [`Method`].
///
/// Under [`Method::Auto`] the ruling-line detector (`pdf-extract`) runs
/// first. Its failure *or* an empty result falls through to the
/// text-alignment detector (`lopdf`); a missing table is not trusted as
/// authoritative. Every returned table has been cleaned: no all-empty row,
/// no all-empty column, at least one data row.
#[derive(Clone)]
pub struct TableExtractor {
    method: Method,
    backends: BackendSet<dyn TableBackend>,
    diagnostics: Arc<dyn Diagnostics>,
}

/// Outcome of one backend run under `auto`.
enum Attempt {
    Found(Vec<DataFrame>),
    Empty,
    Failed(BackendError),
}

impl TableExtractor {
    /// Create a selector over the backends compiled into this build.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::BackendUnavailable`] if `method` names a
    /// backend that is not compiled in.
    pub fn new(method: Method) -> Result<Self, ExtractError> {
        Self::with_backends(method, pdf_extractor_backends::table_backends())
    }

    /// Create a selector over an explicit backend set.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::BackendUnavailable`] if `method` names a
    /// backend missing from `backends`.
    pub fn with_backends(
        method: Method,
        backends: BackendSet<dyn TableBackend>,
    ) -> Result<Self, ExtractError> {
        if let Some(kind) = method.backend() {
            if !backends.capabilities().contains(kind) {
                return Err(ExtractError::BackendUnavailable(kind));
            }
        }
        Ok(Self {
            method,
            backends,
            diagnostics: Arc::new(TracingDiagnostics),
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn capabilities(&self) -> Capabilities {
        self.backends.capabilities()
    }

    /// Extract every table, in page order then discovery order.
    ///
    /// # Errors
    ///
    /// [`ExtractError::DocumentNotFound`] before any backend runs;
    /// [`ExtractError::Backend`] when an explicitly chosen backend fails on
    /// the whole document; [`ExtractError::NoBackendAvailable`] under
    /// `auto` when no backend could produce a result.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<Vec<DataFrame>, ExtractError> {
        let doc = DocumentRef::open(path)?;
        match self.method.backend() {
            Some(kind) => self.extract_with(kind, &doc),
            None => self.extract_auto(&doc),
        }
    }

    fn extract_with(&self, kind: BackendKind, doc: &DocumentRef) -> Result<Vec<DataFrame>, ExtractError> {
        let backend = self
            .backends
            .get(kind)
            .ok_or(ExtractError::BackendUnavailable(kind))?;
        let pages = backend
            .page_tables(doc.path())
            .map_err(|source| ExtractError::Backend {
                backend: kind,
                source,
            })?;
        Ok(self.collect(kind, pages))
    }

    fn extract_auto(&self, doc: &DocumentRef) -> Result<Vec<DataFrame>, ExtractError> {
        let available = self.backends.capabilities().available();
        let mut last_failure: Option<BackendError> = None;

        for (position, &kind) in available.iter().enumerate() {
            let is_last = position + 1 == available.len();
            match self.attempt(kind, doc) {
                Attempt::Found(tables) => return Ok(tables),
                Attempt::Empty if is_last => return Ok(Vec::new()),
                Attempt::Empty => {
                    self.diagnostics.emit(Diagnostic::new(
                        DiagnosticKind::EmptyResultFallback,
                        kind,
                        Unit::Document,
                        "no tables found",
                    ));
                }
                Attempt::Failed(err) => {
                    if !is_last {
                        self.diagnostics.emit(Diagnostic::new(
                            DiagnosticKind::BackendFallback,
                            kind,
                            Unit::Document,
                            err.to_string(),
                        ));
                    }
                    last_failure = Some(err);
                }
            }
        }

        Err(ExtractError::NoBackendAvailable {
            cause: last_failure,
        })
    }

    fn attempt(&self, kind: BackendKind, doc: &DocumentRef) -> Attempt {
        let Some(backend) = self.backends.get(kind) else {
            return Attempt::Empty;
        };
        match backend.page_tables(doc.path()) {
            Ok(pages) => {
                let tables = self.collect(kind, pages);
                if tables.is_empty() {
                    Attempt::Empty
                } else {
                    Attempt::Found(tables)
                }
            }
            Err(err) => Attempt::Failed(err),
        }
    }

    /// Clean and convert the raw tables of every page.
    fn collect(&self, kind: BackendKind, pages: Vec<PageTables>) -> Vec<DataFrame> {
        let mut frames = Vec::new();
        for (page_index, page) in pages.into_iter().enumerate() {
            let page_number = page_index + 1;
            let tables = match page {
                Ok(tables) => tables,
                Err(err) => {
                    self.diagnostics.emit(Diagnostic::new(
                        DiagnosticKind::PageSkipped,
                        kind,
                        Unit::Page(page_number),
                        err.to_string(),
                    ));
                    continue;
                }
            };
            for (index, raw) in tables.into_iter().enumerate() {
                // Stream detection needs a header plus data before cleaning.
                if kind == BackendKind::Lopdf && raw.data_rows() == 0 {
                    continue;
                }
                let Some(cleaned) = raw.clean() else {
                    continue;
                };
                match frame::to_dataframe(&cleaned) {
                    Ok(df) => frames.push(df),
                    Err(err) => self.diagnostics.emit(Diagnostic::new(
                        DiagnosticKind::TableSkipped,
                        kind,
                        Unit::Table {
                            page: page_number,
                            index,
                        },
                        err.to_string(),
                    )),
                }
            }
        }
        tracing::debug!(backend = %kind, tables = frames.len(), "tables collected");
        frames
    }
}

impl std::fmt::Debug for TableExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableExtractor")
            .field("method", &self.method)
            .field("backends", &self.backends)
            .finish_non_exhaustive()
    }
}
