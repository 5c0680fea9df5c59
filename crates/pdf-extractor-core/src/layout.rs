//! Grouping positioned glyphs into words and lines.

use crate::geometry::BBox;

/// A positioned piece of text as reported by a backend.
///
/// Usually a single character; the `lopdf` backend reports whole text-show
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub bbox: BBox,
}

impl Glyph {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Options for word grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between glyphs of one word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between glyphs of one word.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A word built from adjacent glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A line of words sharing a vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub words: Vec<Word>,
    pub bbox: BBox,
}

impl TextLine {
    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group glyphs into words.
///
/// Glyphs are taken in content-stream order. A blank glyph, a horizontal gap
/// wider than `x_tolerance`, a step backwards, or a vertical jump beyond
/// `y_tolerance` ends the current word. Multi-character glyphs are split on
/// inner whitespace with their width apportioned per character.
pub fn glyphs_to_words(glyphs: &[Glyph], options: &WordOptions) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for glyph in glyphs.iter().flat_map(split_glyph) {
        if glyph.is_blank() {
            words.extend(current.take());
            continue;
        }

        if let Some(word) = current.as_mut() {
            let gap = glyph.bbox.x0 - word.bbox.x1;
            let same_line = (glyph.bbox.top - word.bbox.top).abs() <= options.y_tolerance;
            let backwards = glyph.bbox.x0 < word.bbox.x0;
            if same_line && !backwards && gap <= options.x_tolerance {
                word.text.push_str(&glyph.text);
                word.bbox = word.bbox.union(&glyph.bbox);
                continue;
            }
        }

        words.extend(current.replace(Word::new(glyph.text, glyph.bbox)));
    }

    words.extend(current);
    words
}

fn split_glyph(glyph: &Glyph) -> Vec<Glyph> {
    let count = glyph.text.chars().count();
    if count <= 1 || !glyph.text.chars().any(char::is_whitespace) {
        return vec![glyph.clone()];
    }

    let step = glyph.bbox.width() / count as f64;
    let mut pieces: Vec<Glyph> = Vec::new();
    let mut pending = String::new();
    let mut start = 0usize;
    for (i, c) in glyph.text.chars().enumerate() {
        let blank = c.is_whitespace();
        let pending_blank = pending.chars().all(char::is_whitespace) && !pending.is_empty();
        if !pending.is_empty() && blank != pending_blank {
            pieces.push(slice_glyph(glyph, &pending, start, i, step));
            pending.clear();
            start = i;
        }
        pending.push(c);
    }
    if !pending.is_empty() {
        pieces.push(slice_glyph(glyph, &pending, start, count, step));
    }
    pieces
}

fn slice_glyph(glyph: &Glyph, text: &str, start: usize, end: usize, step: f64) -> Glyph {
    let x0 = glyph.bbox.x0 + step * start as f64;
    let x1 = glyph.bbox.x0 + step * end as f64;
    Glyph::new(text, BBox::new(x0, glyph.bbox.top, x1, glyph.bbox.bottom))
}

/// Cluster words into text lines based on y-proximity.
///
/// Words whose vertical midpoints are within `y_tolerance` of a line's
/// vertical midpoint are grouped into the same line. Words within each
/// line are sorted left-to-right, lines top-to-bottom.
pub fn cluster_words_into_lines(words: &[Word], y_tolerance: f64) -> Vec<TextLine> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for word in sorted {
        let word_mid_y = word.bbox.center().1;
        match lines
            .iter_mut()
            .find(|line| (word_mid_y - line.bbox.center().1).abs() <= y_tolerance)
        {
            Some(line) => {
                line.bbox = line.bbox.union(&word.bbox);
                line.words.push(word.clone());
            }
            None => lines.push(TextLine {
                words: vec![word.clone()],
                bbox: word.bbox,
            }),
        }
    }

    for line in &mut lines {
        line.words.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
    lines
}

/// Simple text rendering: lines joined by newlines, words by spaces.
pub fn words_to_text(words: &[Word], y_tolerance: f64) -> String {
    cluster_words_into_lines(words, y_tolerance)
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(text: &str, x0: f64, top: f64, width: f64) -> Glyph {
        Glyph::new(text, BBox::new(x0, top, x0 + width, top + 10.0))
    }

    fn word(text: &str, x0: f64, top: f64, x1: f64) -> Word {
        Word::new(text, BBox::new(x0, top, x1, top + 10.0))
    }

    #[test]
    fn adjacent_glyphs_form_one_word() {
        let glyphs = vec![
            glyph("H", 10.0, 100.0, 6.0),
            glyph("i", 16.0, 100.0, 3.0),
        ];
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Hi");
        assert_eq!(words[0].bbox.x1, 19.0);
    }

    #[test]
    fn blank_glyph_and_gap_split_words() {
        let glyphs = vec![
            glyph("a", 10.0, 100.0, 5.0),
            glyph(" ", 15.0, 100.0, 3.0),
            glyph("b", 18.0, 100.0, 5.0),
            glyph("c", 40.0, 100.0, 5.0),
        ];
        let texts: Vec<String> = glyphs_to_words(&glyphs, &WordOptions::default())
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn vertical_jump_splits_words() {
        let glyphs = vec![glyph("a", 10.0, 100.0, 5.0), glyph("b", 15.0, 120.0, 5.0)];
        assert_eq!(glyphs_to_words(&glyphs, &WordOptions::default()).len(), 2);
    }

    #[test]
    fn multi_character_run_splits_on_spaces() {
        let glyphs = vec![glyph("ab cd", 0.0, 0.0, 50.0)];
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "ab");
        assert_eq!(words[0].bbox.x1, 20.0);
        assert_eq!(words[1].text, "cd");
        assert_eq!(words[1].bbox.x0, 30.0);
    }

    #[test]
    fn lines_are_sorted_top_to_bottom_and_left_to_right() {
        let words = vec![
            word("world", 60.0, 100.0, 90.0),
            word("second", 10.0, 130.0, 50.0),
            word("hello", 10.0, 101.0, 40.0),
        ];
        let lines = cluster_words_into_lines(&words, 3.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "hello world");
        assert_eq!(lines[1].text(), "second");
    }

    #[test]
    fn words_to_text_joins_lines() {
        let words = vec![
            word("a", 10.0, 100.0, 20.0),
            word("b", 30.0, 100.0, 40.0),
            word("c", 10.0, 120.0, 20.0),
        ];
        assert_eq!(words_to_text(&words, 3.0), "a b\nc");
    }

    #[test]
    fn empty_input() {
        assert!(glyphs_to_words(&[], &WordOptions::default()).is_empty());
        assert_eq!(words_to_text(&[], 3.0), "");
    }
}
