//! Structured reports of recovered failures.
//!
//! The selectors never swallow an error silently: each fallback and each
//! skipped page or table becomes a [`Diagnostic`] sent to a [`Diagnostics`]
//! sink. The default sink logs through `tracing`; tests inject
//! [`CollectingDiagnostics`] and assert on the records.

use std::fmt;
use std::sync::Mutex;

use crate::method::BackendKind;

/// What kind of recovery happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A backend failed on the whole document and the next one was tried.
    BackendFallback,
    /// A backend succeeded with no tables and the next one was tried.
    EmptyResultFallback,
    /// One page failed and was omitted.
    PageSkipped,
    /// One table could not be converted and was omitted.
    TableSkipped,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::BackendFallback => "backend_fallback",
            DiagnosticKind::EmptyResultFallback => "empty_result_fallback",
            DiagnosticKind::PageSkipped => "page_skipped",
            DiagnosticKind::TableSkipped => "table_skipped",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit a diagnostic refers to. Page numbers are 1-based, table indices
/// 0-based within their page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Document,
    Page(usize),
    Table { page: usize, index: usize },
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Document => f.write_str("document"),
            Unit::Page(page) => write!(f, "page {page}"),
            Unit::Table { page, index } => write!(f, "page {page} table {index}"),
        }
    }
}

/// A recovered failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub backend: BackendKind,
    pub unit: Unit,
    /// Rendered error message, or a short description for empty results.
    pub cause: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, backend: BackendKind, unit: Unit, cause: impl Into<String>) -> Self {
        Self {
            kind,
            backend,
            unit,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({}): {}", self.kind, self.backend, self.unit, self.cause)
    }
}

/// Receives diagnostics from the selectors.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Logs every diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            backend = %diagnostic.backend,
            unit = %diagnostic.unit,
            cause = %diagnostic.cause,
            "recovered extraction failure"
        );
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything collected so far, in emission order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Collected diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.snapshot().into_iter().filter(|d| d.kind == kind).collect()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.records.lock() {
            Ok(mut records) => records.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
