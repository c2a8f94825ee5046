//! Ground-truth matching: the inference core.
//!
//! Three phases run in order over the segmented corpus, each receiving the
//! run's [`CodeCharMap`](crate::mapping::CodeCharMap) by mutable reference
//! and returning what it found:
//!
//! - [`match_queries`]: known sentences located by word-length profile
//! - [`match_sure_words`]: known words located by partially decoded patterns
//! - [`suggest_capitals`]: sentence-initial words that look like a
//!   capitalized known word (advisory, never applied)
//!
//! Ambiguity is never an error. Every query or word that could not be
//! placed is recorded as a [`Resolution::NoMatch`] or
//! [`Resolution::Ambiguous`] outcome for the user to follow up.

mod capitals;
mod decode;
mod profile;
mod sure_words;

pub use capitals::{suggest_capitals, CapitalReport, CapitalSuggestion};
pub use decode::{DecodedGlyph, DecodedWord, WordRenderer};
pub use profile::{find_profile, match_queries};
pub use sure_words::match_sure_words;

use crate::mapping::{CodeCharMap, Conflict, FixedMap};
use crate::tokens::{CodeToken, Word};
use std::fmt;
use std::ops::Range;

/// How a query or sure word was placed in the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A query aligned to a word range of one line
    Line {
        /// 0-based line index
        line: usize,
        /// Aligned word indices within the line
        words: Range<usize>,
    },
    /// A sure word matched one corpus word
    Word {
        /// The matched corpus word
        word: Word,
        /// Unknown tokens the match had to fill in
        wildcards: usize,
    },
    /// Nothing in the corpus fits
    NoMatch,
    /// More than one equally good place fits
    Ambiguous {
        /// Description of each competing candidate
        candidates: Vec<String>,
    },
}

impl Resolution {
    /// Whether the ground truth was placed.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Line { .. } | Resolution::Word { .. })
    }
}

/// Outcome for one piece of ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// The query or word as supplied
    pub subject: String,
    /// Where it was placed, if anywhere
    pub resolution: Resolution,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolution {
            Resolution::Line { line, words } => write!(
                f,
                "\"{}\" matched line {} words {}..{}",
                self.subject, line, words.start, words.end
            ),
            Resolution::Word { word, wildcards } => write!(
                f,
                "\"{}\" matched word {} ({} unknown)",
                self.subject, word, wildcards
            ),
            Resolution::NoMatch => write!(f, "\"{}\": no match", self.subject),
            Resolution::Ambiguous { candidates } => write!(
                f,
                "\"{}\": {} candidates ({})",
                self.subject,
                candidates.len(),
                candidates.join("; ")
            ),
        }
    }
}

/// What one matching phase did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseReport {
    /// One outcome per query or sure word, in input order
    pub outcomes: Vec<MatchOutcome>,
    /// Conflicts detected while extending the mapping
    pub conflicts: Vec<Conflict>,
    /// Number of assignments that changed the mapping
    pub assigned: usize,
}

impl PhaseReport {
    /// Number of placed queries or words.
    pub fn resolved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.resolution.is_resolved()).count()
    }

    /// Outcomes that were not placed.
    pub fn unresolved(&self) -> impl Iterator<Item = &MatchOutcome> {
        self.outcomes.iter().filter(|o| !o.resolution.is_resolved())
    }

    fn record(&mut self, subject: &str, resolution: Resolution) {
        let outcome = MatchOutcome {
            subject: subject.to_string(),
            resolution,
        };
        if outcome.resolution.is_resolved() {
            log::info!("{}", outcome);
        } else {
            log::warn!("{}", outcome);
        }
        self.outcomes.push(outcome);
    }
}

/// Whether `token` renders as `'.'`; the fixed map takes precedence.
fn is_period(token: &CodeToken, map: &CodeCharMap, fixed: &FixedMap) -> bool {
    match fixed.get(token) {
        Some(text) => text == ".",
        None => map.get(token) == Some('.'),
    }
}

/// `word` without a final token already known to be `'.'`.
fn strip_period(word: &Word, map: &CodeCharMap, fixed: &FixedMap) -> Word {
    match word.last() {
        Some(last) if is_period(last, map, fixed) => word.without_trailing(last),
        _ => word.clone(),
    }
}
