//! Phase B: locating known words anywhere in the corpus.
//!
//! Every distinct corpus word is decoded with a snapshot of the mapping
//! taken when the phase starts and turned into an anchored pattern in which
//! each unknown token is a one-character wildcard. A sure word is accepted
//! when exactly one corpus word matches it, or when the best match needs
//! strictly fewer wildcards than the runner-up.

use super::{strip_period, DecodedWord, PhaseReport, Resolution};
use crate::error::Result;
use crate::mapping::{CodeCharMap, FixedMap};
use crate::tokens::{SegmentedLine, Word};
use indexmap::IndexMap;
use regex::Regex;

struct Candidate {
    decoded: DecodedWord,
    word: Word,
    pattern: Regex,
}

/// Match every sure word against the corpus, extending `map`.
///
/// Ties between equally good matches keep corpus order, and an exact tie
/// for the best match leaves the word unresolved.
pub fn match_sure_words(
    lines: &[SegmentedLine],
    sure_words: &[String],
    map: &mut CodeCharMap,
    fixed: &FixedMap,
) -> Result<PhaseReport> {
    let mut report = PhaseReport::default();
    if sure_words.is_empty() {
        return Ok(report);
    }

    // Distinct decoded words, first raw word wins. A sentence-final word is
    // also a candidate without its period.
    let mut distinct: IndexMap<DecodedWord, Word> = IndexMap::new();
    for line in lines {
        for word in &line.words {
            for variant in [word.clone(), strip_period(word, map, fixed)] {
                distinct
                    .entry(DecodedWord::decode(&variant, map))
                    .or_insert(variant);
            }
        }
    }
    let candidates = distinct
        .into_iter()
        .map(|(decoded, word)| {
            let pattern = decoded.pattern()?;
            Ok(Candidate {
                decoded,
                word,
                pattern,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("{} distinct partially decoded words", candidates.len());

    for sure_word in sure_words {
        let char_count = sure_word.chars().count();
        let mut matches: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.decoded.len() == char_count && c.pattern.is_match(sure_word))
            .collect();
        matches.sort_by_key(|c| c.decoded.wildcard_count());

        let accepted = match matches.as_slice() {
            [] => None,
            [only] => Some(*only),
            [best, second, ..] if best.decoded.wildcard_count() < second.decoded.wildcard_count() => {
                log::debug!("Unique best match for \"{}\"", sure_word);
                Some(*best)
            },
            _ => None,
        };

        let Some(chosen) = accepted else {
            let resolution = if matches.is_empty() {
                Resolution::NoMatch
            } else {
                Resolution::Ambiguous {
                    candidates: matches.iter().map(|c| c.decoded.to_string()).collect(),
                }
            };
            report.record(sure_word, resolution);
            continue;
        };

        for (token, ch) in chosen.word.tokens().iter().zip(sure_word.chars()) {
            if map.assign(token, ch, fixed, sure_word, &mut report.conflicts) {
                report.assigned += 1;
            }
        }
        report.record(
            sure_word,
            Resolution::Word {
                word: chosen.word.clone(),
                wildcards: chosen.decoded.wildcard_count(),
            },
        );
    }

    log::info!(
        "Sure words: {}/{} matched, {} new assignments, {} conflicts",
        report.resolved_count(),
        sure_words.len(),
        report.assigned,
        report.conflicts.len()
    );
    Ok(report)
}
