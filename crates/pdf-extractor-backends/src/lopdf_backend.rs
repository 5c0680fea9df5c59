//! lopdf-based backend.
//!
//! Text is taken from lopdf's own per-page text extraction. For tables, the
//! page content stream is decoded and its text-show operators are replayed
//! with a minimal text state (font, leading, text and graphics matrices) to
//! place each shown string on the page; the resulting runs feed the stream
//! grid builder.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Operation;
use lopdf::{Document, Encoding, Object, ObjectId};
use pdf_extractor_core::layout::Word;
use pdf_extractor_core::{
    BBox, BackendError, BackendKind, Matrix, PageTables, PageText, StreamSettings, TableBackend,
    TextBackend, stream,
};

use crate::guard::{guarded, settle_pages};

/// Width assumed for a glyph when the font has no `Widths` entry, in
/// thousandths of the font size.
const DEFAULT_GLYPH_WIDTH: f64 = 500.0;

/// Page height assumed when no `MediaBox` can be found (US Letter).
const DEFAULT_PAGE_TOP: f64 = 792.0;

/// Backend wrapping the `lopdf` crate.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    pub stream: StreamSettings,
}

impl LopdfBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextBackend for LopdfBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Lopdf
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let doc = guarded(|| load(path))?;
        let pages = doc.get_pages();
        tracing::debug!(path = %path.display(), pages = pages.len(), "lopdf opened document");

        let texts = pages
            .keys()
            .map(|&number| {
                guarded(|| {
                    doc.extract_text(&[number]).map_err(|e| BackendError::Page {
                        page: number as usize,
                        message: e.to_string(),
                    })
                })
            })
            .collect();
        settle_pages(texts)
    }
}

impl TableBackend for LopdfBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Lopdf
    }

    fn page_tables(&self, path: &Path) -> Result<Vec<PageTables>, BackendError> {
        let doc = guarded(|| load(path))?;
        let pages = doc.get_pages();
        tracing::debug!(path = %path.display(), pages = pages.len(), "lopdf opened document");

        let tables = pages
            .iter()
            .map(|(&number, &page_id)| {
                guarded(|| {
                    let runs = text_runs(&doc, page_id).map_err(|e| BackendError::Page {
                        page: number as usize,
                        message: e.to_string(),
                    })?;
                    Ok(stream::extract_tables(&runs, &self.stream))
                })
            })
            .collect();
        settle_pages(tables)
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

/// Decoding information for one page font.
struct FontInfo<'a> {
    encoding: Option<Encoding<'a>>,
    first_char: i64,
    widths: Vec<f64>,
}

impl FontInfo<'_> {
    fn decode(&self, bytes: &[u8]) -> String {
        self.encoding
            .as_ref()
            .and_then(|enc| Document::decode_text(enc, bytes).ok())
            .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Advance of `bytes` in thousandths of the font size.
    fn advance(&self, bytes: &[u8]) -> f64 {
        bytes
            .iter()
            .map(|&code| {
                let index = i64::from(code) - self.first_char;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| self.widths.get(i).copied())
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
            })
            .sum()
    }
}

fn page_fonts<'a>(doc: &'a Document, page_id: ObjectId) -> lopdf::Result<BTreeMap<Vec<u8>, FontInfo<'a>>> {
    let fonts = doc.get_page_fonts(page_id)?;
    Ok(fonts
        .into_iter()
        .map(|(name, dict)| {
            let first_char = dict
                .get(b"FirstChar")
                .and_then(Object::as_i64)
                .unwrap_or(0);
            let widths = dict
                .get_deref(b"Widths", doc)
                .and_then(Object::as_array)
                .map(|arr| {
                    arr.iter()
                        .map(|w| w.as_float().map(f64::from).unwrap_or(DEFAULT_GLYPH_WIDTH))
                        .collect()
                })
                .unwrap_or_default();
            let info = FontInfo {
                encoding: dict.get_font_encoding(doc).ok(),
                first_char,
                widths,
            };
            (name, info)
        })
        .collect())
}

/// Top edge of the page's MediaBox, following inherited values.
fn page_top(doc: &Document, page_id: ObjectId) -> f64 {
    let mut current = doc.get_dictionary(page_id).ok();
    while let Some(dict) = current {
        if let Ok(media_box) = dict.get_deref(b"MediaBox", doc).and_then(Object::as_array) {
            if let Some(ury) = media_box.get(3).and_then(|v| v.as_float().ok()) {
                return f64::from(ury);
            }
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }
    DEFAULT_PAGE_TOP
}

/// Positioned text runs of one page, one per shown string.
pub fn text_runs(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<Word>> {
    let content = doc.get_and_decode_page_content(page_id)?;
    let fonts = page_fonts(doc, page_id)?;
    let mut state = TextState::new(page_top(doc, page_id));
    for op in &content.operations {
        state.apply(op, &fonts);
    }
    Ok(state.runs)
}

fn number(op: &Operation, index: usize) -> Option<f64> {
    op.operands.get(index).and_then(|o| o.as_float().ok()).map(f64::from)
}

/// The subset of graphics and text state needed to place text.
struct TextState {
    page_top: f64,
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f64,
    leading: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scale: f64,
    runs: Vec<Word>,
}

impl TextState {
    fn new(page_top: f64) -> Self {
        Self {
            page_top,
            ctm: Matrix::identity(),
            saved: Vec::new(),
            tm: Matrix::identity(),
            tlm: Matrix::identity(),
            font: None,
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            runs: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation, fonts: &BTreeMap<Vec<u8>, FontInfo<'_>>) {
        match op.operator.as_str() {
            "q" => self.saved.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.saved.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(op) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.tm = Matrix::identity();
                self.tlm = Matrix::identity();
            }
            "Tf" => {
                self.font = op.operands.first().and_then(|o| o.as_name().ok()).map(<[u8]>::to_vec);
                self.font_size = number(op, 1).unwrap_or(self.font_size);
            }
            "TL" => self.leading = number(op, 0).unwrap_or(self.leading),
            "Tc" => self.char_spacing = number(op, 0).unwrap_or(self.char_spacing),
            "Tw" => self.word_spacing = number(op, 0).unwrap_or(self.word_spacing),
            "Tz" => self.horizontal_scale = number(op, 0).map_or(self.horizontal_scale, |s| s / 100.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(op, 0), number(op, 1)) {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(op, 0), number(op, 1)) {
                    self.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(op) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(0.0, -self.leading),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes, fonts);
                }
            }
            "'" => {
                self.next_line(0.0, -self.leading);
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes, fonts);
                }
            }
            "\"" => {
                self.word_spacing = number(op, 0).unwrap_or(self.word_spacing);
                self.char_spacing = number(op, 1).unwrap_or(self.char_spacing);
                self.next_line(0.0, -self.leading);
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    self.show(bytes, fonts);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes, fonts),
                            other => {
                                if let Ok(adjust) = other.as_float() {
                                    let tx = -f64::from(adjust) / 1000.0 * self.font_size * self.horizontal_scale;
                                    self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn show(&mut self, bytes: &[u8], fonts: &BTreeMap<Vec<u8>, FontInfo<'_>>) {
        let font = self.font.as_ref().and_then(|name| fonts.get(name));
        let text = match font {
            Some(font) => font.decode(bytes),
            None => String::from_utf8_lossy(bytes).into_owned(),
        };
        let glyph_units = font.map_or(DEFAULT_GLYPH_WIDTH * bytes.len() as f64, |f| f.advance(bytes));
        let spaces = bytes.iter().filter(|&&b| b == b' ').count() as f64;
        let tx = (glyph_units / 1000.0 * self.font_size
            + self.char_spacing * bytes.len() as f64
            + self.word_spacing * spaces)
            * self.horizontal_scale;

        let trm = self.tm.then(&self.ctm);
        let (x0, y) = trm.apply(0.0, 0.0);
        let (x1, _) = trm.apply(tx, 0.0);
        let size = self.font_size * trm.vertical_scale();
        let baseline = self.page_top - y;

        if !text.trim().is_empty() {
            self.runs.push(Word::new(
                text,
                BBox::new(x0.min(x1), baseline - size, x0.max(x1), baseline),
            ));
        }
        self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
    }
}

fn matrix_operands(op: &Operation) -> Option<Matrix> {
    let v: Vec<f64> = (0..6).map(|i| number(op, i)).collect::<Option<_>>()?;
    Some(Matrix::new(v[0], v[1], v[2], v[3], v[4], v[5]))
}
