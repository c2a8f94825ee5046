//! Statistical guessing of the word separator and sentence-final tokens.
//!
//! The separator ("space") is guessed by three independent heuristics:
//!
//! 1. [`CandidateSource::Frequency`]: the most frequent token overall
//! 2. [`CandidateSource::Coverage`]: the token present on the most lines
//! 3. [`CandidateSource::AffixFiltered`]: by coverage, skipping tokens that
//!    start or end more than 10% of the lines (those are punctuation)
//!
//! When they disagree, coverage wins. Every ranking breaks ties by the
//! natural token order, never by hash or encounter order.
//!
//! The sentence-final token ("dot") is the most frequent final token of
//! mid-length lines, whose length lies strictly between 20% and 80% of the
//! longest line. Before segmentation a line is the only unit without a
//! separator, so lengths are measured in tokens per line.

use crate::error::{Error, Result};
use crate::tokens::CodeToken;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Maximum share of lines a separator candidate may start or end.
pub const MAX_AFFIX_SHARE: f64 = 0.1;

/// Lower bound of the mid-length band, relative to the longest line.
pub const MID_LENGTH_LOW: f64 = 0.2;

/// Upper bound of the mid-length band, relative to the longest line.
pub const MID_LENGTH_HIGH: f64 = 0.8;

/// The dot and space token pair that drives segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctuation {
    /// Sentence-final token
    pub dot: CodeToken,
    /// Word separator token
    pub space: CodeToken,
}

impl Punctuation {
    /// Create a pair from explicit tokens.
    pub fn new(dot: impl Into<CodeToken>, space: impl Into<CodeToken>) -> Self {
        Self {
            dot: dot.into(),
            space: space.into(),
        }
    }

    /// Literal `.` and ` ` glyphs, for fonts whose punctuation is intact.
    pub fn literal() -> Self {
        Self::new(CodeToken::new("."), CodeToken::new(" "))
    }

    /// Parse a `DOT:SPACE` override such as `"12:3"`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.split_once(':') {
            Some((dot, space)) if !dot.is_empty() && !space.is_empty() && !space.contains(':') => {
                Ok(Self::new(CodeToken::new(dot), CodeToken::new(space)))
            },
            _ => Err(Error::InvalidPunctuation(value.to_string())),
        }
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dot, self.space)
    }
}

/// Which heuristic produced a separator candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Most frequent token overall
    Frequency,
    /// Token present on the most lines
    Coverage,
    /// Most covering token that is rarely a line affix
    AffixFiltered,
}

/// One separator guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceCandidate {
    /// Guessed token
    pub token: CodeToken,
    /// Heuristic that produced it
    pub source: CandidateSource,
}

/// Per-token counts over the lines of a font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStatistics {
    /// Occurrences of each token
    pub all: BTreeMap<CodeToken, usize>,
    /// Lines starting with each token
    pub start: BTreeMap<CodeToken, usize>,
    /// Lines ending with each token
    pub last: BTreeMap<CodeToken, usize>,
    /// Distinct lines containing each token
    pub lines_containing: BTreeMap<CodeToken, usize>,
    /// Number of non-empty lines
    pub line_count: usize,
}

impl TokenStatistics {
    /// Collect statistics over token lines; empty lines are ignored.
    pub fn collect(lines: &[Vec<CodeToken>]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            let (Some(first), Some(last)) = (line.first(), line.last()) else {
                continue;
            };
            stats.line_count += 1;
            *stats.start.entry(first.clone()).or_default() += 1;
            *stats.last.entry(last.clone()).or_default() += 1;
            for token in line {
                *stats.all.entry(token.clone()).or_default() += 1;
            }
            let distinct: BTreeSet<&CodeToken> = line.iter().collect();
            for token in distinct {
                *stats.lines_containing.entry(token.clone()).or_default() += 1;
            }
        }
        stats
    }

    /// How many lines start or end with `token`.
    pub fn affix_count(&self, token: &CodeToken) -> usize {
        self.start.get(token).copied().unwrap_or(0) + self.last.get(token).copied().unwrap_or(0)
    }
}

/// Rank counts by descending count, then ascending natural token order.
pub fn ranked(counts: &BTreeMap<CodeToken, usize>) -> Vec<(CodeToken, usize)> {
    // BTreeMap iterates in token order; the stable sort keeps it for ties
    let mut items: Vec<(CodeToken, usize)> = counts.iter().map(|(t, c)| (t.clone(), *c)).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

/// Outcome of punctuation inference.
#[derive(Debug, Clone, PartialEq)]
pub struct PunctuationGuess {
    /// Chosen dot/space pair
    pub punctuation: Punctuation,
    /// Separator candidates, one per heuristic that produced one
    pub candidates: Vec<SpaceCandidate>,
    /// Whether all three heuristics agreed
    pub consistent: bool,
    /// How often the dot token is directly followed by the space token
    pub dot_space_pairs: usize,
}

/// Pick the separator from the heuristics' candidates.
///
/// Returns the chosen token and whether all three heuristics agreed. On
/// disagreement the coverage candidate is preferred; the frequency candidate
/// is the last resort.
pub fn reconcile(candidates: &[SpaceCandidate]) -> Option<(CodeToken, bool)> {
    let pick = |source| candidates.iter().find(|c| c.source == source).map(|c| &c.token);
    let frequency = pick(CandidateSource::Frequency);
    let coverage = pick(CandidateSource::Coverage);
    let filtered = pick(CandidateSource::AffixFiltered);

    let consistent = matches!(
        (frequency, coverage, filtered),
        (Some(a), Some(b), Some(c)) if a == b && b == c
    );
    let chosen = coverage.or(filtered).or(frequency)?.clone();
    Some((chosen, consistent))
}

/// Guess the dot and space tokens of a font.
///
/// Returns `None` when there is no non-empty line.
pub fn infer_punctuation(lines: &[Vec<CodeToken>]) -> Option<PunctuationGuess> {
    let stats = TokenStatistics::collect(lines);
    if stats.line_count == 0 {
        return None;
    }

    let candidates = space_candidates(&stats);
    let (space, consistent) = reconcile(&candidates)?;
    if consistent {
        log::info!("Consistent separator heuristics: {}", space);
    } else {
        let shown: Vec<String> = candidates
            .iter()
            .map(|c| format!("{:?}={}", c.source, c.token))
            .collect();
        log::warn!(
            "Separator heuristics disagree ({}); using coverage candidate {}",
            shown.join(", "),
            space
        );
    }

    let dot = guess_dot(lines, &stats)?;
    let punctuation = Punctuation { dot, space };
    let dot_space_pairs = count_pairs(lines, &punctuation);

    log::info!(
        "Guessed punctuation dot={} space={} ({} dot+space pairs)",
        punctuation.dot,
        punctuation.space,
        dot_space_pairs
    );

    Some(PunctuationGuess {
        punctuation,
        candidates,
        consistent,
        dot_space_pairs,
    })
}

fn space_candidates(stats: &TokenStatistics) -> Vec<SpaceCandidate> {
    let by_coverage = ranked(&stats.lines_containing);
    let mut candidates = Vec::with_capacity(3);

    if let Some((token, _)) = ranked(&stats.all).into_iter().next() {
        candidates.push(SpaceCandidate {
            token,
            source: CandidateSource::Frequency,
        });
    }
    if let Some((token, _)) = by_coverage.first() {
        candidates.push(SpaceCandidate {
            token: token.clone(),
            source: CandidateSource::Coverage,
        });
    }

    let affix_limit = MAX_AFFIX_SHARE * stats.line_count as f64;
    for (token, _) in &by_coverage {
        if stats.affix_count(token) as f64 > affix_limit {
            log::debug!("Skipping frequent line affix {}", token);
            continue;
        }
        candidates.push(SpaceCandidate {
            token: token.clone(),
            source: CandidateSource::AffixFiltered,
        });
        break;
    }

    candidates
}

fn guess_dot(lines: &[Vec<CodeToken>], stats: &TokenStatistics) -> Option<CodeToken> {
    let max_len = lines.iter().map(Vec::len).max().unwrap_or(0) as f64;
    let mut middle_end: BTreeMap<CodeToken, usize> = BTreeMap::new();
    for line in lines {
        let len = line.len() as f64;
        if len > max_len * MID_LENGTH_LOW && len < max_len * MID_LENGTH_HIGH {
            if let Some(last) = line.last() {
                *middle_end.entry(last.clone()).or_default() += 1;
            }
        }
    }

    let source = if middle_end.is_empty() {
        log::warn!("No mid-length lines; guessing dot from all line endings");
        &stats.last
    } else {
        &middle_end
    };
    ranked(source).into_iter().next().map(|(token, _)| token)
}

fn count_pairs(lines: &[Vec<CodeToken>], punctuation: &Punctuation) -> usize {
    lines
        .iter()
        .map(|line| {
            line.windows(2)
                .filter(|w| w[0] == punctuation.dot && w[1] == punctuation.space)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(labels: &str) -> Vec<CodeToken> {
        labels.split_whitespace().map(CodeToken::new).collect()
    }

    #[test]
    fn test_ranked_ties_use_token_order() {
        let mut counts = BTreeMap::new();
        counts.insert(CodeToken::new("10"), 2);
        counts.insert(CodeToken::new("2"), 2);
        counts.insert(CodeToken::new("5"), 3);
        let order: Vec<String> = ranked(&counts).into_iter().map(|(t, _)| t.to_string()).collect();
        assert_eq!(order, vec!["5", "2", "10"]);
    }

    #[test]
    fn test_statistics() {
        let lines = vec![line("1 0 2 0 3"), line("4 0 1"), vec![]];
        let stats = TokenStatistics::collect(&lines);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.all[&CodeToken::new("0")], 3);
        assert_eq!(stats.lines_containing[&CodeToken::new("0")], 2);
        assert_eq!(stats.start[&CodeToken::new("1")], 1);
        assert_eq!(stats.affix_count(&CodeToken::new("1")), 2);
    }

    #[test]
    fn test_consistent_separator() {
        // "0" separates words, "9" ends sentences
        let lines = vec![
            line("1 2 0 3 4 0 5 6 0 7 8 0 1 2 9 0 3 4 0 5 6 0 7 8"),
            line("3 4 0 1 2 9 0 5 6 0 7 8 0 1 2"),
            line("5 6 0 7 8 0 3 4 0 1 2 9"),
            line("1 2 0 3 4 0 5 6 9"),
            line("7 8 0 1 2"),
        ];
        let guess = infer_punctuation(&lines).expect("no guess");
        assert_eq!(guess.punctuation.space, CodeToken::new("0"));
        assert!(guess.consistent);
        assert_eq!(guess.candidates.len(), 3);
    }

    #[test]
    fn test_disagreement_prefers_coverage() {
        let candidates = vec![
            SpaceCandidate {
                token: CodeToken::new("1"),
                source: CandidateSource::Frequency,
            },
            SpaceCandidate {
                token: CodeToken::new("2"),
                source: CandidateSource::Coverage,
            },
            SpaceCandidate {
                token: CodeToken::new("3"),
                source: CandidateSource::AffixFiltered,
            },
        ];
        assert_eq!(reconcile(&candidates), Some((CodeToken::new("2"), false)));
    }

    #[test]
    fn test_missing_filtered_candidate_is_inconsistent() {
        let candidates = vec![
            SpaceCandidate {
                token: CodeToken::new("1"),
                source: CandidateSource::Frequency,
            },
            SpaceCandidate {
                token: CodeToken::new("1"),
                source: CandidateSource::Coverage,
            },
        ];
        assert_eq!(reconcile(&candidates), Some((CodeToken::new("1"), false)));
        assert_eq!(reconcile(&[]), None);
    }

    #[test]
    fn test_dot_from_mid_length_lines() {
        // Longest line has 10 tokens; band is (2, 8) exclusive
        let lines = vec![
            line("1 2 3 4 5 6 7 8 9 7"),
            line("1 2 3 9"),
            line("4 5 6 9"),
            line("1 2 3 4 5 8"),
            line("1 7"),
        ];
        let guess = infer_punctuation(&lines).expect("no guess");
        assert_eq!(guess.punctuation.dot, CodeToken::new("9"));
    }

    #[test]
    fn test_dot_falls_back_to_line_endings() {
        // All lines equally long: nothing strictly inside the band
        let lines = vec![line("1 2"), line("3 2"), line("4 5")];
        let guess = infer_punctuation(&lines).expect("no guess");
        assert_eq!(guess.punctuation.dot, CodeToken::new("2"));
    }

    #[test]
    fn test_dot_space_pairs() {
        let lines = vec![line("1 9 0 2 9 0 3"), line("9 0")];
        let punctuation = Punctuation::new(CodeToken::new("9"), CodeToken::new("0"));
        assert_eq!(count_pairs(&lines, &punctuation), 3);
    }

    #[test]
    fn test_no_lines() {
        assert!(infer_punctuation(&[]).is_none());
        assert!(infer_punctuation(&[vec![]]).is_none());
    }

    #[test]
    fn test_parse_override() {
        let p = Punctuation::parse("12:3").expect("valid override");
        assert_eq!(p.dot, CodeToken::new("12"));
        assert_eq!(p.space, CodeToken::new("3"));
        assert_eq!(p.to_string(), "12:3");
        assert!(Punctuation::parse("12").is_err());
        assert!(Punctuation::parse(":3").is_err());
        assert!(Punctuation::parse("1:2:3").is_err());
    }
}
