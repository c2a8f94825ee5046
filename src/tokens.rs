//! Line and token model for a single font.
//!
//! A [`CodeToken`] stands for one glyph code whose character is unknown. A
//! [`Word`] is an ordered run of tokens between two separator tokens, kept as
//! a structured list rather than a delimiter-joined string so that a token
//! label can never be confused with the boundary mark.

use std::cmp::Ordering;
use std::fmt;

/// Boundary mark shown between adjacent tokens when a word is displayed.
pub const BOUNDARY_MARK: char = ':';

/// Opaque identifier of one extracted glyph code.
///
/// Tokens order naturally: labels that are plain decimal numbers sort by
/// value after every non-numeric label, so `"2" < "10"`. This is the single
/// ordering used for every tie-break in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeToken(String);

impl CodeToken {
    /// Create a token from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The token label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Literal form used in recovered text for a token that is still unknown.
    pub fn literal(&self) -> String {
        format!("[{}]", self.0)
    }

    fn numeric(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl Ord for CodeToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for CodeToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CodeToken {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// An ordered sequence of tokens delimited by separator tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word {
    tokens: Vec<CodeToken>,
}

impl Word {
    /// Create a word from its tokens.
    pub fn new(tokens: Vec<CodeToken>) -> Self {
        Self { tokens }
    }

    /// Tokens of the word, in order.
    pub fn tokens(&self) -> &[CodeToken] {
        &self.tokens
    }

    /// Number of tokens (glyphs) in the word.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the word has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Last token of the word.
    pub fn last(&self) -> Option<&CodeToken> {
        self.tokens.last()
    }

    /// Copy of the word without a trailing `token`, if present and not the
    /// only token.
    pub fn without_trailing(&self, token: &CodeToken) -> Word {
        match self.tokens.split_last() {
            Some((last, rest)) if last == token && !rest.is_empty() => Word::new(rest.to_vec()),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", BOUNDARY_MARK)?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// One line of the target font after word segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedLine {
    /// 0-based index of the line within the font
    pub index: usize,
    /// Words of the line, in reading order
    pub words: Vec<Word>,
}

impl SegmentedLine {
    /// Per-word token counts, the line's profile.
    pub fn profile(&self) -> Vec<usize> {
        self.words.iter().map(Word::len).collect()
    }
}

/// The normalized token lines of the target font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    /// Font name
    pub font: String,
    /// One token sequence per line of the font, in document order
    pub lines: Vec<Vec<CodeToken>>,
}

impl Corpus {
    /// Create a corpus for `font`.
    pub fn new(font: impl Into<String>, lines: Vec<Vec<CodeToken>>) -> Self {
        Self {
            font: font.into(),
            lines,
        }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the corpus has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of glyph occurrences.
    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}
