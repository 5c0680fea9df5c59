//! pdf-extract-based backend.
//!
//! Drives [`pdf_extract::output_doc_page`] one page at a time with a
//! collecting [`OutputDev`]: every shown glyph is recorded with its page
//! position, and every stroked or filled path contributes its axis-aligned
//! segments as ruling edges. Text is rebuilt from the glyphs in reading
//! order; tables come from the lattice grid builder.

use std::path::Path;

use pdf_extract::{ColorSpace, Document, MediaBox, OutputDev, OutputError, Path as PdfPath, PathOp, Transform};
use pdf_extractor_core::layout::{self, Glyph, WordOptions};
use pdf_extractor_core::{
    BBox, BackendError, BackendKind, Edge, LatticeSettings, Matrix, PageTables, PageText,
    TableBackend, TextBackend, lattice,
};

use crate::guard::{guarded, settle_pages};

/// Segments thinner than this (in points) are treated as lines, not boxes.
const THIN_RECT: f64 = 2.0;

/// Backend wrapping the `pdf-extract` crate.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractBackend {
    pub words: WordOptions,
    pub lattice: LatticeSettings,
}

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect glyphs and edges for every page, in page order.
    fn collect_pages(&self, path: &Path) -> Result<Vec<Result<PageContent, BackendError>>, BackendError> {
        let doc = guarded(|| load(path))?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        tracing::debug!(path = %path.display(), pages = page_numbers.len(), "pdf-extract opened document");

        let pages = page_numbers
            .into_iter()
            .map(|number| {
                guarded(|| {
                    let mut collector = PageCollector::default();
                    pdf_extract::output_doc_page(&doc, &mut collector, number).map_err(|e| {
                        BackendError::Page {
                            page: number as usize,
                            message: output_error_message(&e),
                        }
                    })?;
                    Ok(collector.finish())
                })
            })
            .collect();
        settle_pages(pages)
    }
}

impl TextBackend for PdfExtractBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PdfExtract
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let pages = self.collect_pages(path)?;
        Ok(pages
            .into_iter()
            .map(|page| {
                page.map(|content| {
                    let words = layout::glyphs_to_words(&content.glyphs, &self.words);
                    layout::words_to_text(&words, self.words.y_tolerance)
                })
            })
            .collect())
    }
}

impl TableBackend for PdfExtractBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PdfExtract
    }

    fn page_tables(&self, path: &Path) -> Result<Vec<PageTables>, BackendError> {
        let pages = self.collect_pages(path)?;
        Ok(pages
            .into_iter()
            .map(|page| {
                page.map(|content| {
                    let words = layout::glyphs_to_words(&content.glyphs, &self.words);
                    lattice::extract_tables(&content.edges, &words, &self.lattice)
                })
            })
            .collect())
    }
}

fn load(path: &Path) -> Result<Document, BackendError> {
    let mut doc = Document::load(path).map_err(|e| BackendError::Open(e.to_string()))?;
    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| BackendError::Open(format!("encrypted document: {e}")))?;
    }
    Ok(doc)
}

fn output_error_message(err: &OutputError) -> String {
    match err {
        OutputError::FormatError(e) => e.to_string(),
        OutputError::IoError(e) => e.to_string(),
        OutputError::PdfError(e) => e.to_string(),
    }
}

/// Glyphs and ruling edges of one page, in top-left coordinates.
#[derive(Debug, Default)]
struct PageContent {
    glyphs: Vec<Glyph>,
    edges: Vec<Edge>,
}

/// [`OutputDev`] that records page geometry instead of rendering it.
#[derive(Debug, Default)]
struct PageCollector {
    page_top: f64,
    content: PageContent,
}

impl PageCollector {
    fn finish(self) -> PageContent {
        self.content
    }

    /// Flip a PDF user-space y (bottom-left origin) to a top-left offset.
    fn flip(&self, y: f64) -> f64 {
        self.page_top - y
    }

    fn add_path(&mut self, ctm: &Transform, path: &PdfPath) {
        let ctm = to_matrix(ctm);
        let point = |x: f64, y: f64| {
            let (x, y) = ctm.apply(x, y);
            (x, self.flip(y))
        };

        let mut edges = Vec::new();
        let mut current: Option<(f64, f64)> = None;
        let mut start: Option<(f64, f64)> = None;
        for op in &path.ops {
            match *op {
                PathOp::MoveTo(x, y) => {
                    current = Some(point(x, y));
                    start = current;
                }
                PathOp::LineTo(x, y) => {
                    let to = point(x, y);
                    if let Some(from) = current {
                        edges.extend(Edge::from_points(from, to, 1.0));
                    }
                    current = Some(to);
                }
                PathOp::CurveTo(_, _, _, _, x, y) => current = Some(point(x, y)),
                PathOp::Rect(x, y, w, h) => {
                    let (ax, ay) = point(x, y);
                    let (bx, by) = point(x + w, y + h);
                    edges.extend(rect_edges(BBox::new(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))));
                }
                PathOp::Close => {
                    if let (Some(from), Some(to)) = (current, start) {
                        edges.extend(Edge::from_points(from, to, 1.0));
                    }
                    current = start;
                }
            }
        }
        self.content.edges.extend(edges);
    }
}

/// Edges contributed by a rectangle: a thin one is a single rule.
fn rect_edges(bbox: BBox) -> Vec<Edge> {
    let (cx, cy) = bbox.center();
    if bbox.height() <= THIN_RECT && bbox.width() > THIN_RECT {
        Edge::from_points((bbox.x0, cy), (bbox.x1, cy), 0.5).into_iter().collect()
    } else if bbox.width() <= THIN_RECT && bbox.height() > THIN_RECT {
        Edge::from_points((cx, bbox.top), (cx, bbox.bottom), 0.5).into_iter().collect()
    } else if bbox.width() > THIN_RECT && bbox.height() > THIN_RECT {
        Edge::from_rect(bbox).to_vec()
    } else {
        Vec::new()
    }
}

fn to_matrix(t: &Transform) -> Matrix {
    Matrix::new(t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
}

impl OutputDev for PageCollector {
    fn begin_page(&mut self, _page_num: u32, media_box: &MediaBox, _art_box: Option<(f64, f64, f64, f64)>) -> Result<(), OutputError> {
        self.page_top = media_box.ury;
        self.content = PageContent::default();
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(&mut self, trm: &Transform, width: f64, _spacing: f64, font_size: f64, char: &str) -> Result<(), OutputError> {
        let trm = to_matrix(trm);
        let (x, y) = trm.apply(0.0, 0.0);
        let size = font_size * trm.vertical_scale();
        let advance = width * font_size * (trm.a * trm.a + trm.b * trm.b).sqrt();
        let baseline = self.flip(y);
        self.content
            .glyphs
            .push(Glyph::new(char, BBox::new(x, baseline - size, x + advance, baseline)));
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn stroke(&mut self, ctm: &Transform, _colorspace: &ColorSpace, _color: &[f64], path: &PdfPath) -> Result<(), OutputError> {
        self.add_path(ctm, path);
        Ok(())
    }

    fn fill(&mut self, ctm: &Transform, _colorspace: &ColorSpace, _color: &[f64], path: &PdfPath) -> Result<(), OutputError> {
        self.add_path(ctm, path);
        Ok(())
    }
}
