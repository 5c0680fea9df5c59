//! Extraction methods, backend identities, and the capability set.

use std::fmt;

/// One wrapped PDF library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// `pdf-extract`: glyph positions and painted paths. Higher-fidelity text,
    /// ruling-line (lattice) tables.
    PdfExtract,
    /// `lopdf`: decoded content stream operators. Raw text-show text,
    /// text-alignment (stream) tables.
    Lopdf,
}

impl BackendKind {
    /// Order in which `auto` attempts the backends.
    pub const ORDER: [BackendKind; 2] = [BackendKind::PdfExtract, BackendKind::Lopdf];

    /// Stable lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::PdfExtract => "pdf-extract",
            BackendKind::Lopdf => "lopdf",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method a selector is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Try the preferred backend first and fall back to the other one.
    #[default]
    Auto,
    /// Use `pdf-extract` only.
    PdfExtract,
    /// Use `lopdf` only.
    Lopdf,
}

impl Method {
    /// The backend an explicit method names, or `None` for [`Method::Auto`].
    pub fn backend(&self) -> Option<BackendKind> {
        match self {
            Method::Auto => None,
            Method::PdfExtract => Some(BackendKind::PdfExtract),
            Method::Lopdf => Some(BackendKind::Lopdf),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Auto => "auto",
            Method::PdfExtract => "pdf-extract",
            Method::Lopdf => "lopdf",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend libraries are present in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub pdf_extract: bool,
    pub lopdf: bool,
}

impl Capabilities {
    /// Every backend present.
    pub fn all() -> Self {
        Self {
            pdf_extract: true,
            lopdf: true,
        }
    }

    /// No backend present.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::PdfExtract => self.pdf_extract,
            BackendKind::Lopdf => self.lopdf,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.pdf_extract && !self.lopdf
    }

    /// Present backends in `auto` attempt order.
    pub fn available(&self) -> Vec<BackendKind> {
        BackendKind::ORDER
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_method_names_its_backend() {
        assert_eq!(Method::Lopdf.backend(), Some(BackendKind::Lopdf));
        assert_eq!(Method::PdfExtract.backend(), Some(BackendKind::PdfExtract));
        assert_eq!(Method::Auto.backend(), None);
    }

    #[test]
    fn names_match_command_line_values() {
        assert_eq!(Method::Auto.to_string(), "auto");
        assert_eq!(Method::PdfExtract.to_string(), "pdf-extract");
        assert_eq!(BackendKind::Lopdf.to_string(), "lopdf");
        assert_eq!(BackendKind::ORDER, [BackendKind::PdfExtract, BackendKind::Lopdf]);
    }

    #[test]
    fn capabilities_available_keeps_order() {
        assert_eq!(
            Capabilities::all().available(),
            vec![BackendKind::PdfExtract, BackendKind::Lopdf]
        );
        let only_lopdf = Capabilities {
            pdf_extract: false,
            lopdf: true,
        };
        assert_eq!(only_lopdf.available(), vec![BackendKind::Lopdf]);
        assert!(!only_lopdf.contains(BackendKind::PdfExtract));
    }

    #[test]
    fn empty_capabilities() {
        assert!(Capabilities::none().is_empty());
        assert!(Capabilities::none().available().is_empty());
        assert!(!Capabilities::all().is_empty());
    }
}
