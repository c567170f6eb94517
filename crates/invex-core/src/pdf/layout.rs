//! Positioned text of a PDF page.
//!
//! Glyphs come from pdf-extract's content-stream processor, so advances use
//! the real font metrics. Coordinates use a top-left origin with y growing
//! downward, so `top < bottom` for every box.

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;
use crate::guard;

/// US Letter, used until pdf-extract reports the page's MediaBox.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

impl BBox {
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self { x0, top, x1, bottom }
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Check if a point is inside this box.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A single glyph placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub bbox: BBox,
}

impl Glyph {
    pub fn new(ch: char, bbox: BBox) -> Self {
        Self { ch, bbox }
    }
}

/// A run of glyphs without whitespace or large gaps.
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

/// Tolerances used when grouping glyphs into words and lines.
#[derive(Debug, Clone, Copy)]
pub struct WordTolerance {
    /// Maximum horizontal gap inside a word.
    pub x: f32,
    /// Maximum vertical offset inside a line.
    pub y: f32,
}

impl Default for WordTolerance {
    fn default() -> Self {
        Self { x: 3.0, y: 3.0 }
    }
}

/// Positioned content of one page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page number (1-indexed).
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub glyphs: Vec<Glyph>,
    /// Words in reading order.
    pub words: Vec<Word>,
    tolerance: WordTolerance,
}

impl PageLayout {
    /// Build a layout from placed glyphs.
    pub fn from_glyphs(
        number: u32,
        width: f32,
        height: f32,
        glyphs: Vec<Glyph>,
        tolerance: WordTolerance,
    ) -> Self {
        let words = group_words(&glyphs, tolerance);
        Self {
            number,
            width,
            height,
            glyphs,
            words,
            tolerance,
        }
    }

    /// Whether the page carries any visible text.
    pub fn has_text(&self) -> bool {
        !self.words.is_empty()
    }

    /// Text of the glyphs whose centre lies inside `bbox`, whitespace-collapsed.
    pub fn crop_text(&self, bbox: &BBox) -> String {
        let inside: Vec<Glyph> = self
            .glyphs
            .iter()
            .filter(|g| bbox.contains_point(g.bbox.center_x(), g.bbox.center_y()))
            .cloned()
            .collect();

        let words = group_words(&inside, self.tolerance);
        words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Plain text of the page, one line per text line.
    pub fn text(&self) -> String {
        cluster_lines(&self.words, self.tolerance.y)
            .into_iter()
            .map(|line| {
                line.iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Group glyphs into words in reading order.
pub fn group_words(glyphs: &[Glyph], tolerance: WordTolerance) -> Vec<Word> {
    let mut words = Vec::new();

    for line in cluster_lines(glyphs, tolerance.y) {
        let mut current: Option<Word> = None;

        for glyph in line {
            if glyph.ch.is_whitespace() {
                words.extend(current.take());
                continue;
            }

            match current.as_mut() {
                Some(word) if glyph.bbox.x0 - word.bbox.x1 <= tolerance.x => {
                    word.text.push(glyph.ch);
                    word.bbox = word.bbox.union(&glyph.bbox);
                }
                _ => {
                    words.extend(current.take());
                    current = Some(Word::new(glyph.ch.to_string(), glyph.bbox));
                }
            }
        }

        words.extend(current);
    }

    words
}

/// Anything with a box that can be laid out in lines.
trait Positioned {
    fn bbox(&self) -> &BBox;
}

impl Positioned for Glyph {
    fn bbox(&self) -> &BBox {
        &self.bbox
    }
}

impl Positioned for Word {
    fn bbox(&self) -> &BBox {
        &self.bbox
    }
}

/// Split items into lines (top to bottom), each sorted left to right.
fn cluster_lines<T: Positioned>(items: &[T], y_tolerance: f32) -> Vec<Vec<&T>> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox()
            .top
            .total_cmp(&b.bbox().top)
            .then(a.bbox().x0.total_cmp(&b.bbox().x0))
    });

    let mut lines: Vec<Vec<&T>> = Vec::new();
    let mut line_top = f32::NEG_INFINITY;

    for item in sorted {
        match lines.last_mut() {
            Some(line) if (item.bbox().top - line_top).abs() <= y_tolerance => line.push(item),
            _ => {
                line_top = item.bbox().top;
                lines.push(vec![item]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.bbox().x0.total_cmp(&b.bbox().x0));
    }

    lines
}

/// Records every glyph pdf-extract shows on a page.
///
/// pdf-extract resolves fonts (standard-14 metrics, `/Widths`, encodings and
/// ToUnicode maps) and hands over each character with its text rendering
/// matrix. The matrix carries the glyph origin in user space; the advance is
/// the font width scaled by the font size and the matrix.
struct GlyphCollector {
    media_box: [f64; 4],
    glyphs: Vec<Glyph>,
}

impl GlyphCollector {
    fn new() -> Self {
        Self {
            media_box: DEFAULT_MEDIA_BOX,
            glyphs: Vec::new(),
        }
    }

    fn width(&self) -> f64 {
        self.media_box[2] - self.media_box[0]
    }

    fn height(&self) -> f64 {
        self.media_box[3] - self.media_box[1]
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.media_box = [
            media_box.llx.min(media_box.urx),
            media_box.lly.min(media_box.ury),
            media_box.llx.max(media_box.urx),
            media_box.lly.max(media_box.ury),
        ];
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> std::result::Result<(), OutputError> {
        let x = trm.m31 - self.media_box[0];
        let y = trm.m32 - self.media_box[1];
        let advance = width * font_size * trm.m11.hypot(trm.m12);
        let size = font_size * trm.m21.hypot(trm.m22);
        let top = self.height() - (y + size);
        let bottom = self.height() - y;

        // A code can decode to several characters (ligatures); they share its advance
        let chars: Vec<char> = text.chars().collect();
        let step = advance / chars.len().max(1) as f64;
        for (i, ch) in chars.into_iter().enumerate() {
            if ch.is_control() {
                continue;
            }
            let x0 = x + step * i as f64;
            let bbox = BBox::new(x0 as f32, top as f32, (x0 + step) as f32, bottom as f32);
            self.glyphs.push(Glyph::new(ch, bbox));
        }

        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}

/// Lay out one page of a document parsed by pdf-extract.
pub(crate) fn read_page(doc: &Document, number: u32, tolerance: WordTolerance) -> Result<PageLayout> {
    let mut collector = GlyphCollector::new();

    guard::contain(|| pdf_extract::output_doc_page(doc, &mut collector, number))
        .map_err(|message| PdfError::Content(format!("pdf-extract panicked: {}", message)))?
        .map_err(|e| PdfError::Content(e.to_string()))?;

    trace!("Page {}: media box {:?}", number, collector.media_box);
    let (width, height) = (collector.width() as f32, collector.height() as f32);
    let layout = PageLayout::from_glyphs(number, width, height, collector.glyphs, tolerance);

    debug!(
        "Page {}: {} glyphs, {} words ({}x{})",
        number,
        layout.glyphs.len(),
        layout.words.len(),
        layout.width,
        layout.height
    );

    Ok(layout)
}
