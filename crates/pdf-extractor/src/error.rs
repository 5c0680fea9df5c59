//! Errors surfaced by the [`PdfExtractor`](crate::PdfExtractor) facade.

use std::path::PathBuf;

use pdf_extractor_core::ExtractError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Error returned by the facade operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Extraction itself failed (missing document, unavailable backend,
    /// unrecoverable backend failure).
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Writing an output file or creating an output directory failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// polars could not serialize a table.
    #[error("failed to write table {}: {source}", .path.display())]
    Polars {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the input document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Extract(ExtractError::DocumentNotFound(_)))
    }
}

/// Result alias for the facade.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_is_transparent() {
        let err: Error = ExtractError::DocumentNotFound(PathBuf::from("a.pdf")).into();
        assert_eq!(err.to_string(), "PDF file not found: a.pdf");
        assert!(err.is_not_found());
    }

    #[test]
    fn io_error_names_path() {
        let err = Error::io(
            "/out/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to write /out/a.txt: denied");
        assert!(!err.is_not_found());
    }
}
