//! Canonical renumbering of raw glyph codes.
//!
//! Raw codes come straight from the extractor (`(cid:21)`, `(cid:7)`, ...).
//! They are replaced by short decimal labels assigned over the *sorted* set
//! of distinct codes, never in encounter order, so the same document always
//! yields the same tokens.
//!
//! Sort order is natural: the first decimal number embedded in the code,
//! then the code text. Canonical labels are `0..n-1`, so normalizing an
//! already normalized corpus reproduces it unchanged.

use crate::document::CID_MARKER;
use crate::tokens::{CodeToken, Corpus};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

lazy_static! {
    /// First decimal number inside a raw code
    static ref RE_CODE_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Literal glyphs that keep their identity in keep-punctuation mode.
pub const PRESERVED_PUNCTUATION: [&str; 3] = [" ", ".", ","];

/// Share of CID placeholder glyphs above which a font is renumbered.
pub const CID_MAJORITY_RATIO: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct NaturalKey {
    number: Option<u64>,
    text: String,
}

impl NaturalKey {
    fn of(code: &str) -> Self {
        let number = RE_CODE_NUMBER
            .find(code)
            .and_then(|m| m.as_str().parse().ok());
        Self {
            number,
            text: code.to_string(),
        }
    }
}

/// Renumbers raw glyph codes into canonical tokens.
#[derive(Debug, Clone, Default)]
pub struct CodeNormalizer {
    keep_punctuation: bool,
}

/// Result of normalization: the token corpus and the raw→token table.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Token lines of the font
    pub corpus: Corpus,
    /// Raw code → canonical token, in natural raw-code order
    pub table: BTreeMap<String, CodeToken>,
}

impl CodeNormalizer {
    /// Create a normalizer that renumbers every distinct code.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep literal space, period and comma glyphs as their own tokens.
    pub fn with_keep_punctuation(mut self, keep: bool) -> Self {
        self.keep_punctuation = keep;
        self
    }

    /// Whether more than a third of the glyphs are CID placeholders.
    pub fn is_cid_majority(lines: &[Vec<String>]) -> bool {
        let total: usize = lines.iter().map(Vec::len).sum();
        let cid = lines
            .iter()
            .flatten()
            .filter(|glyph| glyph.contains(CID_MARKER))
            .count();
        log::debug!("{} CID glyphs out of {}", cid, total);
        total > 0 && cid as f64 > CID_MAJORITY_RATIO * total as f64
    }

    /// Renumber the distinct codes of `lines` into canonical tokens.
    pub fn normalize(&self, font: &str, lines: &[Vec<String>]) -> Normalized {
        let distinct: BTreeSet<NaturalKey> = lines
            .iter()
            .flatten()
            .map(|code| NaturalKey::of(code))
            .collect();

        let mut table = BTreeMap::new();
        let mut next = 0usize;
        for key in distinct {
            let token = if self.keep_punctuation && PRESERVED_PUNCTUATION.contains(&key.text.as_str())
            {
                CodeToken::new(key.text.clone())
            } else {
                let token = CodeToken::new(next.to_string());
                next += 1;
                token
            };
            table.insert(key.text, token);
        }

        log::info!("Renumbered {} distinct codes of font {}", table.len(), font);

        let token_lines = lines
            .iter()
            .map(|line| line.iter().map(|code| table[code].clone()).collect())
            .collect();

        Normalized {
            corpus: Corpus::new(font, token_lines),
            table,
        }
    }

    /// Use every raw glyph as its own token, without renumbering.
    pub fn passthrough(font: &str, lines: &[Vec<String>]) -> Corpus {
        let token_lines = lines
            .iter()
            .map(|line| line.iter().map(|code| CodeToken::new(code.as_str())).collect())
            .collect();
        Corpus::new(font, token_lines)
    }
}
