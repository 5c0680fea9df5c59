//! pdf-extractor-backends: the concrete PDF backends.
//!
//! Two libraries are wrapped, each behind a cargo feature of the same name:
//!
//! - `pdf-extract`: glyph positions and painted paths. Text is rebuilt
//!   from glyph geometry and tables are detected from ruling lines.
//! - `lopdf`: decoded content stream operators. Text comes from text-show
//!   operators and tables are detected from aligned text runs.
//!
//! [`capabilities`] reports which backends this build contains, and
//! [`text_backends`] / [`table_backends`] return them ready for the
//! selectors.

#[cfg(any(feature = "pdf-extract", feature = "lopdf"))]
use std::sync::Arc;

use pdf_extractor_core::{BackendSet, Capabilities, TableBackend, TextBackend};

#[cfg(any(feature = "pdf-extract", feature = "lopdf"))]
mod guard;
#[cfg(feature = "lopdf")]
pub mod lopdf_backend;
#[cfg(feature = "pdf-extract")]
pub mod pdf_extract_backend;

#[cfg(feature = "lopdf")]
pub use lopdf_backend::LopdfBackend;
#[cfg(feature = "pdf-extract")]
pub use pdf_extract_backend::PdfExtractBackend;
pub use pdf_extractor_core;

/// Backends compiled into this build.
pub fn capabilities() -> Capabilities {
    Capabilities {
        pdf_extract: cfg!(feature = "pdf-extract"),
        lopdf: cfg!(feature = "lopdf"),
    }
}

/// The built-in text backends.
pub fn text_backends() -> BackendSet<dyn TextBackend> {
    #[allow(unused_mut)]
    let mut set: BackendSet<dyn TextBackend> = BackendSet::empty();
    #[cfg(feature = "pdf-extract")]
    {
        set.pdf_extract = Some(Arc::new(PdfExtractBackend::default()));
    }
    #[cfg(feature = "lopdf")]
    {
        set.lopdf = Some(Arc::new(LopdfBackend::default()));
    }
    set
}

/// The built-in table backends.
pub fn table_backends() -> BackendSet<dyn TableBackend> {
    #[allow(unused_mut)]
    let mut set: BackendSet<dyn TableBackend> = BackendSet::empty();
    #[cfg(feature = "pdf-extract")]
    {
        set.pdf_extract = Some(Arc::new(PdfExtractBackend::default()));
    }
    #[cfg(feature = "lopdf")]
    {
        set.lopdf = Some(Arc::new(LopdfBackend::default()));
    }
    set
}
