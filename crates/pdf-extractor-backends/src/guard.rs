//! Containment of library panics and page-level failures.

use std::panic::{self, AssertUnwindSafe};

use pdf_extractor_core::BackendError;

/// Run `f`, turning a panic inside it into [`BackendError::Panicked`].
///
/// Both wrapped libraries assert on malformed input in places; a panic must
/// not cross the backend boundary.
pub(crate) fn guarded<T>(f: impl FnOnce() -> Result<T, BackendError>) -> Result<T, BackendError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(BackendError::from_panic(payload)))
}

/// Promote per-page results to a document failure when no page succeeded.
///
/// A document whose every page fails is treated as unreadable by this
/// backend, so the selector can fall back. An empty document is not a
/// failure.
pub(crate) fn settle_pages<T>(
    pages: Vec<Result<T, BackendError>>,
) -> Result<Vec<Result<T, BackendError>>, BackendError> {
    if pages.is_empty() || pages.iter().any(Result::is_ok) {
        return Ok(pages);
    }
    let total = pages.len();
    let first = pages
        .into_iter()
        .find_map(Result::err)
        .map(|e| e.to_string())
        .unwrap_or_default();
    Err(BackendError::Content(format!(
        "all {total} pages failed, first error: {first}"
    )))
}
