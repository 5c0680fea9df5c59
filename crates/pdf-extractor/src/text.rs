//! Text extraction selector.

use std::path::Path;
use std::sync::Arc;

use pdf_extractor_core::{
    BackendError, BackendKind, BackendSet, Capabilities, Diagnostic, DiagnosticKind, Diagnostics,
    DocumentRef, ExtractError, Method, PageText, TextBackend, TracingDiagnostics, Unit,
    assemble_pages,
};

/// Extracts the text of a PDF with a fixed [`Method`].
///
/// Under [`Method::Auto`] the backends are attempted in
/// [`BackendKind::ORDER`]; a backend that fails on the whole document is
/// reported as a [`DiagnosticKind::BackendFallback`] and the next one is
/// tried. An empty but successful result is returned as is.
///
/// # Example
///
/// ```ignore
/// let extractor = TextExtractor::new(Method::Auto)?;
/// let text = extractor.extract("report.pdf")?;
/// ```
#[derive(Clone)]
pub struct TextExtractor {
    method: Method,
    backends: BackendSet<dyn TextBackend>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl TextExtractor {
    /// Create a selector over the backends compiled into this build.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::BackendUnavailable`] if `method` names a
    /// backend that is not compiled in.
    pub fn new(method: Method) -> Result<Self, ExtractError> {
        Self::with_backends(method, pdf_extractor_backends::text_backends())
    }

    /// Create a selector over an explicit backend set.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::BackendUnavailable`] if `method` names a
    /// backend missing from `backends`.
    pub fn with_backends(
        method: Method,
        backends: BackendSet<dyn TextBackend>,
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

    /// Send recovered failures to `diagnostics` instead of the log.
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

    /// Extract the document text as `--- Page N ---` blocks.
    ///
    /// Pages without visible text are omitted, as are pages the backend
    /// failed on (each reported as [`DiagnosticKind::PageSkipped`]).
    ///
    /// # Errors
    ///
    /// [`ExtractError::DocumentNotFound`] before any backend runs;
    /// [`ExtractError::Backend`] when the chosen (or last attempted)
    /// backend fails on the whole document; [`ExtractError::NoBackendAvailable`]
    /// under `auto` when no backend is present or the remaining ones are
    /// missing after a failure.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<String, ExtractError> {
        let doc = DocumentRef::open(path)?;
        let (kind, pages) = match self.method.backend() {
            Some(kind) => {
                let backend = self
                    .backends
                    .get(kind)
                    .ok_or(ExtractError::BackendUnavailable(kind))?;
                let pages = backend
                    .page_texts(doc.path())
                    .map_err(|source| ExtractError::Backend {
                        backend: kind,
                        source,
                    })?;
                (kind, pages)
            }
            None => self.extract_auto(&doc)?,
        };
        tracing::debug!(
            path = %doc.path().display(),
            method = %self.method,
            backend = %kind,
            pages = pages.len(),
            "text extracted"
        );
        Ok(self.assemble(kind, pages))
    }

    fn extract_auto(&self, doc: &DocumentRef) -> Result<(BackendKind, Vec<PageText>), ExtractError> {
        let available = self.backends.capabilities().available();
        let mut failure: Option<(BackendKind, BackendError)> = None;

        for (position, &kind) in available.iter().enumerate() {
            let Some(backend) = self.backends.get(kind) else {
                continue;
            };
            match backend.page_texts(doc.path()) {
                Ok(pages) => return Ok((kind, pages)),
                Err(err) => {
                    if position + 1 < available.len() {
                        self.diagnostics.emit(Diagnostic::new(
                            DiagnosticKind::BackendFallback,
                            kind,
                            Unit::Document,
                            err.to_string(),
                        ));
                    }
                    failure = Some((kind, err));
                }
            }
        }

        Err(unrecovered(failure))
    }

    fn assemble(&self, kind: BackendKind, pages: Vec<PageText>) -> String {
        let texts: Vec<(usize, String)> = pages
            .into_iter()
            .enumerate()
            .filter_map(|(index, page)| match page {
                Ok(text) => Some((index + 1, text)),
                Err(err) => {
                    self.diagnostics.emit(Diagnostic::new(
                        DiagnosticKind::PageSkipped,
                        kind,
                        Unit::Page(index + 1),
                        err.to_string(),
                    ));
                    None
                }
            })
            .collect();
        assemble_pages(texts.iter().map(|(number, text)| (*number, text.as_str())))
    }
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("method", &self.method)
            .field("backends", &self.backends)
            .finish_non_exhaustive()
    }
}

/// The error `auto` surfaces once every present backend has been tried.
///
/// A failure of the last backend in attempt order propagates as is; a
/// failure that left no later backend to try means nothing is available.
fn unrecovered(failure: Option<(BackendKind, BackendError)>) -> ExtractError {
    match failure {
        Some((kind, source)) if BackendKind::ORDER.last() == Some(&kind) => ExtractError::Backend {
            backend: kind,
            source,
        },
        cause => ExtractError::NoBackendAvailable {
            cause: cause.map(|(_, err)| err),
        },
    }
}
