//! Phase C: capitalization suggestions.
//!
//! A sentence-initial word often differs from an already decoded word only
//! by its capital letter, whose glyph code is still unknown. Words in a
//! position where a capital is plausible are matched against the set of
//! fully decoded words; a unique match becomes a suggestion. Suggestions
//! are reported for review and never written into the mapping.

use super::{is_period, strip_period, DecodedGlyph, DecodedWord, MatchOutcome, Resolution};
use crate::error::Result;
use crate::mapping::{CodeCharMap, FixedMap};
use crate::tokens::{CodeToken, SegmentedLine, Word};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// A proposed mapping for the unknown tokens of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalSuggestion {
    /// The corpus word
    pub word: Word,
    /// Its partial rendering
    pub decoded: String,
    /// The fully decoded word it matched
    pub matched: String,
    /// Proposed text per unknown token, in word order
    pub assignments: Vec<(CodeToken, String)>,
}

impl fmt::Display for CapitalSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .assignments
            .iter()
            .map(|(token, text)| format!("{}->{}", token, text))
            .collect();
        write!(f, "{} looks like \"{}\": {}", self.decoded, self.matched, pairs.join(", "))
    }
}

/// Result of the capitalization phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapitalReport {
    /// Unique matches
    pub suggestions: Vec<CapitalSuggestion>,
    /// Candidates with no match or several
    pub unresolved: Vec<MatchOutcome>,
    /// Partially decoded words not in a capital position
    pub skipped: usize,
}

/// Suggest capitals for sentence-initial words.
///
/// A word is in a capital position when it is first on its line or the
/// previous word ends with a token rendered as `'.'` by `fixed` or `map`.
/// Neither map is modified.
pub fn suggest_capitals(
    lines: &[SegmentedLine],
    map: &CodeCharMap,
    fixed: &FixedMap,
) -> Result<CapitalReport> {
    let mut report = CapitalReport::default();

    let mut known: IndexSet<String> = IndexSet::new();
    // Partially decoded words, with whether any occurrence is sentence-initial
    let mut partial: IndexMap<Word, bool> = IndexMap::new();
    for line in lines {
        for (i, word) in line.words.iter().enumerate() {
            let word = strip_period(word, map, fixed);
            let decoded = DecodedWord::decode(&word, map);
            if let Some(text) = decoded.text() {
                known.insert(text);
                continue;
            }
            let initial = i == 0 || ends_sentence(&line.words[i - 1], map, fixed);
            *partial.entry(word).or_insert(false) |= initial;
        }
    }
    log::debug!("{} fully decoded words, {} partial", known.len(), partial.len());

    for (word, initial) in partial {
        if !initial {
            report.skipped += 1;
            continue;
        }
        let decoded = DecodedWord::decode(&word, map);
        let pattern = decoded.pattern()?;
        let matches: Vec<&String> = known.iter().filter(|k| pattern.is_match(k)).take(2).collect();

        let [matched] = matches.as_slice() else {
            let resolution = if matches.is_empty() {
                Resolution::NoMatch
            } else {
                Resolution::Ambiguous {
                    candidates: known
                        .iter()
                        .filter(|k| pattern.is_match(k))
                        .cloned()
                        .collect(),
                }
            };
            let outcome = MatchOutcome {
                subject: decoded.to_string(),
                resolution,
            };
            log::debug!("Capital candidate {}", outcome);
            report.unresolved.push(outcome);
            continue;
        };

        let Some(caps) = pattern.captures(matched) else {
            continue;
        };
        let unknown = decoded.glyphs().iter().enumerate().filter_map(|(pos, glyph)| match glyph {
            DecodedGlyph::Unknown(token) => Some((pos, token)),
            DecodedGlyph::Known(_) => None,
        });
        let assignments = unknown
            .zip(caps.iter().skip(1))
            .filter_map(|((pos, token), group)| {
                let text = group?.as_str();
                let text = if pos == 0 { text.to_uppercase() } else { text.to_string() };
                Some((token.clone(), text))
            })
            .collect();

        let suggestion = CapitalSuggestion {
            word,
            decoded: decoded.to_string(),
            matched: (*matched).clone(),
            assignments,
        };
        log::info!("Capital suggestion: {}", suggestion);
        report.suggestions.push(suggestion);
    }

    log::info!(
        "Capitals: {} suggestions, {} unresolved, {} skipped",
        report.suggestions.len(),
        report.unresolved.len(),
        report.skipped
    );
    Ok(report)
}

fn ends_sentence(word: &Word, map: &CodeCharMap, fixed: &FixedMap) -> bool {
    word.last().is_some_and(|token| is_period(token, map, fixed))
}
