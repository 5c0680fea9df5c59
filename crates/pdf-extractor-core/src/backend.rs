//! Backend traits.
//!
//! A backend wraps one PDF library. The selectors drive backends only
//! through [`TextBackend`] and [`TableBackend`], so tests can substitute
//! fakes and builds can leave a library out.
//!
//! Both traits return a two-level result: the outer `Result` fails when the
//! whole document could not be processed (this is what triggers fallback),
//! the inner per-page results let a single bad page be skipped.

use std::path::Path;
use std::sync::Arc;

use crate::error::BackendError;
use crate::method::{BackendKind, Capabilities};
use crate::table::RawTable;

/// Text of one page, or the error that page produced.
pub type PageText = Result<String, BackendError>;

/// Raw tables of one page in discovery order, or the error that page produced.
pub type PageTables = Result<Vec<RawTable>, BackendError>;

/// Extracts raw text page by page.
pub trait TextBackend: Send + Sync {
    /// Which library this backend wraps.
    fn kind(&self) -> BackendKind;

    /// Text of every page, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be opened or processed as a
    /// whole.
    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>, BackendError>;
}

/// Detects tables page by page.
pub trait TableBackend: Send + Sync {
    /// Which library this backend wraps.
    fn kind(&self) -> BackendKind;

    /// Raw tables of every page, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be opened or processed as a
    /// whole.
    fn page_tables(&self, path: &Path) -> Result<Vec<PageTables>, BackendError>;
}

/// One optional backend per [`BackendKind`].
///
/// An absent slot means the library is not available; the set's
/// [`Capabilities`] are derived from which slots are filled.
pub struct BackendSet<B: ?Sized> {
    pub pdf_extract: Option<Arc<B>>,
    pub lopdf: Option<Arc<B>>,
}

impl<B: ?Sized> BackendSet<B> {
    /// A set with no backends.
    pub fn empty() -> Self {
        Self {
            pdf_extract: None,
            lopdf: None,
        }
    }

    /// Put `backend` in the slot for `kind`.
    pub fn with(mut self, kind: BackendKind, backend: Arc<B>) -> Self {
        match kind {
            BackendKind::PdfExtract => self.pdf_extract = Some(backend),
            BackendKind::Lopdf => self.lopdf = Some(backend),
        }
        self
    }

    pub fn get(&self, kind: BackendKind) -> Option<&Arc<B>> {
        match kind {
            BackendKind::PdfExtract => self.pdf_extract.as_ref(),
            BackendKind::Lopdf => self.lopdf.as_ref(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            pdf_extract: self.pdf_extract.is_some(),
            lopdf: self.lopdf.is_some(),
        }
    }
}

impl<B: ?Sized> Clone for BackendSet<B> {
    fn clone(&self) -> Self {
        Self {
            pdf_extract: self.pdf_extract.clone(),
            lopdf: self.lopdf.clone(),
        }
    }
}

impl<B: ?Sized> Default for BackendSet<B> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<B: ?Sized> std::fmt::Debug for BackendSet<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSet")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
