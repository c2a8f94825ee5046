//! Multi-font document model.
//!
//! A [`Document`] keeps every text line of the source PDF split by font, in
//! the order the extractor produced them. Only the target font's lines are
//! subject to recovery; all other fonts pass through verbatim.

mod xml;

pub use xml::parse_pdfminer_xml;

use indexmap::IndexMap;

/// Substring that marks a raw CID placeholder glyph, e.g. `(cid:21)`.
pub const CID_MARKER: &str = "cid";

/// One font's share of one text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    /// 0-based page index
    pub page: usize,
    /// 0-based text line index within the page
    pub line: usize,
    /// Font name
    pub font: String,
    /// 1-based running count of lines for this font
    pub font_line: usize,
    /// Number of glyph elements on the original text line (all fonts)
    pub glyph_count: usize,
    /// Glyphs of this font on the line, as extracted
    pub glyphs: Vec<String>,
}

impl DocumentLine {
    /// Glyphs joined into the line text.
    pub fn text(&self) -> String {
        self.glyphs.concat()
    }
}

/// A parsed document, split by font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<DocumentLine>,
    fonts: IndexMap<String, Vec<Vec<String>>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a font line; `font_line` is assigned from the font's running count.
    pub fn push_line(&mut self, page: usize, line: usize, glyph_count: usize, font: &str, glyphs: Vec<String>) {
        let font_lines = self.fonts.entry(font.to_string()).or_default();
        font_lines.push(glyphs.clone());
        let font_line = font_lines.len();
        self.lines.push(DocumentLine {
            page,
            line,
            font: font.to_string(),
            font_line,
            glyph_count,
            glyphs,
        });
    }

    /// All lines in document order.
    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    /// Font names in order of first appearance.
    pub fn font_names(&self) -> Vec<String> {
        self.fonts.keys().cloned().collect()
    }

    /// Fonts with their line counts, in order of first appearance.
    pub fn font_summary(&self) -> Vec<(String, usize)> {
        self.fonts
            .iter()
            .map(|(font, lines)| (font.clone(), lines.len()))
            .collect()
    }

    /// Glyph lines of `font`, if present.
    pub fn font_lines(&self, font: &str) -> Option<&[Vec<String>]> {
        self.fonts.get(font).map(Vec::as_slice)
    }

    /// Whether `font` occurs in the document.
    pub fn has_font(&self, font: &str) -> bool {
        self.fonts.contains_key(font)
    }

    /// Whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Tab separated dump of the raw line structure, one row per font line.
    ///
    /// Columns: page, line, font, font_line, len, text. The text column is
    /// the JSON array of glyphs so that CID placeholders and spaces stay
    /// visible.
    pub fn to_raw_tsv(&self) -> String {
        let mut out = String::from("page\tline\tfont\tfont_line\tlen\ttext\n");
        for line in &self.lines {
            let glyphs = serde_json::to_string(&line.glyphs).unwrap_or_else(|_| "[]".to_string());
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                line.page, line.line, line.font, line.font_line, line.glyph_count, glyphs
            ));
        }
        out
    }
}
