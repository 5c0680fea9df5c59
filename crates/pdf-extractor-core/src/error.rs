//! Error types for extraction.
//!
//! [`BackendError`] describes a failure inside one wrapped PDF library.
//! [`ExtractError`] is what the selectors surface to their callers: a
//! missing document, a backend that is not compiled in, or a backend
//! failure that the fallback policy could not recover from.

use std::path::PathBuf;

use thiserror::Error;

use crate::method::BackendKind;

/// Failure inside a wrapped PDF library.
///
/// Returned both for whole-document failures (the document could not be
/// opened) and for single units (one page) that the selectors skip.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The document could not be loaded or decrypted.
    #[error("failed to open PDF: {0}")]
    Open(String),

    /// A single page could not be processed.
    #[error("failed to process page {page}: {message}")]
    Page { page: usize, message: String },

    /// The content stream could not be decoded.
    #[error("content stream error: {0}")]
    Content(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The wrapped library panicked while processing the document.
    #[error("backend panicked: {0}")]
    Panicked(String),
}

impl BackendError {
    /// Build a [`BackendError::Panicked`] from a caught panic payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        BackendError::Panicked(message)
    }
}

/// Error surfaced by the text and table selectors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input path does not exist.
    #[error("PDF file not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// An explicitly requested backend is not part of this build.
    #[error("the {0} backend is not available in this build")]
    BackendUnavailable(BackendKind),

    /// Under `auto`, no backend could produce a result.
    #[error("no PDF extraction backend available{}", .cause.as_ref().map(|c| format!(": {c}")).unwrap_or_default())]
    NoBackendAvailable {
        #[source]
        cause: Option<BackendError>,
    },

    /// A backend failed and the failure was not recoverable.
    #[error("{backend} extraction failed: {source}")]
    Backend {
        backend: BackendKind,
        #[source]
        source: BackendError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_open_message() {
        let err = BackendError::Open("invalid xref".to_string());
        assert_eq!(err.to_string(), "failed to open PDF: invalid xref");
    }

    #[test]
    fn backend_error_page_message() {
        let err = BackendError::Page {
            page: 3,
            message: "missing MediaBox".to_string(),
        };
        assert_eq!(err.to_string(), "failed to process page 3: missing MediaBox");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn backend_error_from_str_panic() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let err = BackendError::from_panic(payload);
        assert_eq!(err.to_string(), "backend panicked: boom");
    }

    #[test]
    fn backend_error_from_string_panic() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("index out of range"));
        let err = BackendError::from_panic(payload);
        assert!(matches!(err, BackendError::Panicked(ref m) if m == "index out of range"));
    }

    #[test]
    fn document_not_found_names_path() {
        let err = ExtractError::DocumentNotFound(PathBuf::from("/missing/report.pdf"));
        assert_eq!(err.to_string(), "PDF file not found: /missing/report.pdf");
    }

    #[test]
    fn backend_unavailable_names_backend() {
        let err = ExtractError::BackendUnavailable(BackendKind::Lopdf);
        assert_eq!(err.to_string(), "the lopdf backend is not available in this build");
    }

    #[test]
    fn no_backend_available_without_cause() {
        let err = ExtractError::NoBackendAvailable { cause: None };
        assert_eq!(err.to_string(), "no PDF extraction backend available");
    }

    #[test]
    fn no_backend_available_with_cause() {
        let err = ExtractError::NoBackendAvailable {
            cause: Some(BackendError::Open("truncated file".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "no PDF extraction backend available: failed to open PDF: truncated file"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn backend_failure_keeps_source() {
        let err = ExtractError::Backend {
            backend: BackendKind::PdfExtract,
            source: BackendError::Content("bad operator".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "pdf-extract extraction failed: content stream error: bad operator"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
