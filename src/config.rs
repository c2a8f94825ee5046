//! Run configuration and user-supplied ground truth.

use crate::error::{Error, Result};
use crate::mapping::FixedMap;
use crate::punctuation::Punctuation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of top words reported by the profile.
pub const DEFAULT_TOP_WORDS: usize = 50;

/// Options for one recovery run.
#[derive(Debug, Clone)]
pub struct RecoveryOptions {
    /// Font to recover; overrides the ground truth's `target_font`
    pub target_font: Option<String>,

    /// Keep literal space/period/comma glyphs instead of guessing them
    pub keep_punctuation: bool,

    /// Renumber codes even when the font is not mostly CID placeholders
    pub force_cid: bool,

    /// Explicit dot/space tokens, bypassing inference
    pub punctuation: Option<Punctuation>,

    /// Number of most frequent words reported
    pub top_words: usize,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryOptions {
    /// Create options with defaults: force CID renumbering, infer punctuation.
    pub fn new() -> Self {
        Self {
            target_font: None,
            keep_punctuation: false,
            force_cid: true,
            punctuation: None,
            top_words: DEFAULT_TOP_WORDS,
        }
    }

    /// Set the target font.
    pub fn with_target_font(mut self, font: impl Into<String>) -> Self {
        self.target_font = Some(font.into());
        self
    }

    /// Keep literal punctuation glyphs.
    pub fn with_keep_punctuation(mut self, keep: bool) -> Self {
        self.keep_punctuation = keep;
        self
    }

    /// Force CID renumbering.
    pub fn with_force_cid(mut self, force: bool) -> Self {
        self.force_cid = force;
        self
    }

    /// Use explicit dot/space tokens.
    pub fn with_punctuation(mut self, punctuation: Punctuation) -> Self {
        self.punctuation = Some(punctuation);
        self
    }

    /// Set the number of reported top words.
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }
}

/// A known sentence, optionally anchored to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Expected 0-based line index
    pub line_cue: Option<usize>,
    /// The sentence text
    pub text: String,
}

impl Query {
    /// Parse `"<line_index>=><sentence>"` or a bare sentence.
    ///
    /// Everything before the first `=>` must be a line index.
    ///
    /// # Example
    ///
    /// ```
    /// use glyph_recover::config::Query;
    ///
    /// let q = Query::parse("221=>some known words")?;
    /// assert_eq!(q.line_cue, Some(221));
    /// assert_eq!(q.words(), vec!["some", "known", "words"]);
    /// # Ok::<(), glyph_recover::error::Error>(())
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let Some((cue, text)) = raw.split_once("=>") else {
            return Ok(Self {
                line_cue: None,
                text: raw.to_string(),
            });
        };
        let cue = cue.trim();
        let line_cue = cue.parse::<usize>().map_err(|_| Error::InvalidQuery {
            query: raw.to_string(),
            reason: format!("line cue '{}' is not a line index", cue),
        })?;
        Ok(Self {
            line_cue: Some(line_cue),
            text: text.to_string(),
        })
    }

    /// Whitespace separated words of the sentence.
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// Per-word character counts.
    pub fn profile(&self) -> Vec<usize> {
        self.text.split_whitespace().map(|w| w.chars().count()).collect()
    }
}

/// Ground truth supplied by the user, usually from a JSON file.
///
/// ```json
/// {
///   "target_font": "OTOUXR+HeliosNivkh",
///   "queries": ["221=>ӿымди қ`оӻл уйгид"],
///   "sure_words": ["Техническое"],
///   "combining_map": {"ҏ": "р̌"},
///   "fixed_map": {"17": "a"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTruth {
    /// Font to recover
    pub target_font: Option<String>,
    /// Known sentences, optionally prefixed with `<line_index>=>`
    pub queries: Vec<String>,
    /// Known words, anywhere in the font's text
    pub sure_words: Vec<String>,
    /// Literal substitutions applied to the final document text, in order
    pub combining_map: IndexMap<String, String>,
    /// Token label → character overrides
    pub fixed_map: IndexMap<String, String>,
}

impl GroundTruth {
    /// Parse ground truth from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load ground truth from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Whether there is nothing to infer from. The combining map does not
    /// count: it only rewrites the final text.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.sure_words.is_empty() && self.fixed_map.is_empty()
    }

    /// Parsed queries.
    pub fn parsed_queries(&self) -> Result<Vec<Query>> {
        self.queries.iter().map(|q| Query::parse(q)).collect()
    }

    /// The fixed map keyed by token.
    pub fn fixed(&self) -> FixedMap {
        FixedMap::from_labels(&self.fixed_map)
    }
}
