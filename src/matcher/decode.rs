//! Partial decoding of words against the current mapping.

use crate::error::Result;
use crate::mapping::CodeCharMap;
use crate::tokens::{CodeToken, Word, BOUNDARY_MARK};
use regex::Regex;
use std::fmt;

/// Wildcard standing for one unknown token in a decoding pattern.
const WILDCARD: &str = "(.)";

/// One glyph of a partially decoded word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodedGlyph {
    /// Token with a known character
    Known(char),
    /// Token still unknown
    Unknown(CodeToken),
}

/// A word rendered with the characters known so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedWord {
    glyphs: Vec<DecodedGlyph>,
}

impl DecodedWord {
    /// Decode `word` with `map`.
    pub fn decode(word: &Word, map: &CodeCharMap) -> Self {
        let glyphs = word
            .tokens()
            .iter()
            .map(|token| match map.get(token) {
                Some(ch) => DecodedGlyph::Known(ch),
                None => DecodedGlyph::Unknown(token.clone()),
            })
            .collect();
        Self { glyphs }
    }

    /// Glyphs in order.
    pub fn glyphs(&self) -> &[DecodedGlyph] {
        &self.glyphs
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the word has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Number of unknown glyphs.
    pub fn wildcard_count(&self) -> usize {
        self.glyphs
            .iter()
            .filter(|g| matches!(g, DecodedGlyph::Unknown(_)))
            .count()
    }

    /// Whether every glyph is known.
    pub fn is_fully_decoded(&self) -> bool {
        self.wildcard_count() == 0
    }

    /// The decoded text, when every glyph is known.
    pub fn text(&self) -> Option<String> {
        self.glyphs
            .iter()
            .map(|g| match g {
                DecodedGlyph::Known(ch) => Some(*ch),
                DecodedGlyph::Unknown(_) => None,
            })
            .collect()
    }

    /// Anchored pattern: known characters literally, one capture per unknown.
    pub fn pattern_source(&self) -> String {
        let mut source = String::from("^");
        for glyph in &self.glyphs {
            match glyph {
                DecodedGlyph::Known(ch) => source.push_str(&regex::escape(&ch.to_string())),
                DecodedGlyph::Unknown(_) => source.push_str(WILDCARD),
            }
        }
        source.push('$');
        source
    }

    /// Compiled [`pattern_source`](Self::pattern_source).
    pub fn pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&self.pattern_source())?)
    }
}

impl fmt::Display for DecodedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = WordRenderer::new();
        for glyph in &self.glyphs {
            match glyph {
                DecodedGlyph::Known(ch) => renderer.push_known(&ch.to_string()),
                DecodedGlyph::Unknown(token) => renderer.push_unknown(token),
            }
        }
        f.write_str(&renderer.finish())
    }
}

/// Renders a word glyph by glyph.
///
/// Known glyphs are emitted as text; unknown ones as their bracketed
/// literal. The boundary mark separates adjacent glyphs unless both are
/// known, so a fully decoded word reads as plain text.
#[derive(Debug, Default)]
pub struct WordRenderer {
    out: String,
    previous_known: Option<bool>,
}

impl WordRenderer {
    /// Start an empty word.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded glyph.
    pub fn push_known(&mut self, text: &str) {
        if self.previous_known == Some(false) {
            self.out.push(BOUNDARY_MARK);
        }
        self.out.push_str(text);
        self.previous_known = Some(true);
    }

    /// Append an unknown token.
    pub fn push_unknown(&mut self, token: &CodeToken) {
        if self.previous_known.is_some() {
            self.out.push(BOUNDARY_MARK);
        }
        self.out.push_str(&token.literal());
        self.previous_known = Some(false);
    }

    /// The rendered word.
    pub fn finish(self) -> String {
        self.out
    }
}
