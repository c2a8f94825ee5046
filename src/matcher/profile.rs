//! Phase A: locating known sentences by their word-length profile.
//!
//! A sentence's profile is its per-word character counts; a line's profile
//! is its per-word token counts. A line is a candidate when the sentence
//! profile occurs in it as a contiguous run, which lets a sentence match
//! part of a longer line. Once a single candidate remains, words are
//! aligned positionally and every token is assigned the character at the
//! same position.

use super::{PhaseReport, Resolution};
use crate::config::Query;
use crate::mapping::{CodeCharMap, FixedMap};
use crate::tokens::SegmentedLine;

/// First position at which `needle` occurs as a contiguous run in `haystack`.
///
/// An empty needle never matches.
pub fn find_profile(haystack: &[usize], needle: &[usize]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Match every query against the corpus, extending `map`.
///
/// Selection rule, in order:
/// 1. every line containing the query profile is a candidate (first
///    occurrence within the line);
/// 2. if the query has a line cue and a candidate has that index, it is
///    the only candidate;
/// 3. exactly one candidate is aligned, otherwise the query is reported
///    as unmatched or ambiguous and the map is left untouched.
pub fn match_queries(
    lines: &[SegmentedLine],
    queries: &[Query],
    map: &mut CodeCharMap,
    fixed: &FixedMap,
) -> PhaseReport {
    let mut report = PhaseReport::default();
    let profiles: Vec<Vec<usize>> = lines.iter().map(SegmentedLine::profile).collect();

    for query in queries {
        let query_profile = query.profile();
        log::debug!("Query \"{}\" profile {:?} cue {:?}", query.text, query_profile, query.line_cue);

        let mut candidates: Vec<(usize, usize)> = lines
            .iter()
            .zip(&profiles)
            .filter_map(|(line, profile)| {
                find_profile(profile, &query_profile).map(|start| (line.index, start))
            })
            .collect();

        if let Some(cue) = query.line_cue {
            if let Some(&cued) = candidates.iter().find(|(index, _)| *index == cue) {
                log::debug!("Line cue {} selects its candidate", cue);
                candidates = vec![cued];
            }
        }

        let (line_index, start) = match candidates.as_slice() {
            [] => {
                report.record(&query.text, Resolution::NoMatch);
                continue;
            },
            [single] => *single,
            many => {
                let described = many.iter().map(|(index, _)| format!("line {}", index)).collect();
                report.record(&query.text, Resolution::Ambiguous { candidates: described });
                continue;
            },
        };

        let Some(line) = lines.iter().find(|line| line.index == line_index) else {
            continue;
        };
        let end = start + query_profile.len();
        for (word, text) in line.words[start..end].iter().zip(query.words()) {
            for (token, ch) in word.tokens().iter().zip(text.chars()) {
                if map.assign(token, ch, fixed, &query.text, &mut report.conflicts) {
                    report.assigned += 1;
                }
            }
        }
        report.record(
            &query.text,
            Resolution::Line {
                line: line_index,
                words: start..end,
            },
        );
    }

    log::info!(
        "Queries: {}/{} matched, {} new assignments, {} conflicts",
        report.resolved_count(),
        queries.len(),
        report.assigned,
        report.conflicts.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Conflict;
    use crate::tokens::{CodeToken, Word};

    fn segmented(lines: &[&[&str]]) -> Vec<SegmentedLine> {
        lines
            .iter()
            .enumerate()
            .map(|(index, words)| SegmentedLine {
                index,
                words: words
                    .iter()
                    .map(|w| Word::new(w.split_whitespace().map(CodeToken::new).collect()))
                    .collect(),
            })
            .collect()
    }

    fn query(raw: &str) -> Query {
        Query::parse(raw).expect("valid query")
    }

    fn token(label: &str) -> CodeToken {
        CodeToken::new(label)
    }

    #[test]
    fn test_find_profile() {
        assert_eq!(find_profile(&[3, 2, 1], &[2, 1]), Some(1));
        assert_eq!(find_profile(&[2, 1, 2, 1], &[2, 1]), Some(0));
        assert_eq!(find_profile(&[12, 1], &[2, 1]), None);
        assert_eq!(find_profile(&[2], &[2, 1]), None);
        assert_eq!(find_profile(&[2], &[]), None);
    }

    #[test]
    fn test_no_candidate_leaves_map_unchanged() {
        // Line profile "3 2" does not contain "2 1"
        let lines = segmented(&[&["A B A", "C D"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("ab a")], &mut map, &FixedMap::new());

        assert!(map.is_empty());
        assert_eq!(report.outcomes[0].resolution, Resolution::NoMatch);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn test_unique_match_assigns_tokens() {
        let lines = segmented(&[&["A B", "A"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("ab a")], &mut map, &FixedMap::new());

        assert_eq!(report.outcomes[0].resolution, Resolution::Line { line: 0, words: 0..2 });
        assert_eq!(map.get(&token("A")), Some('a'));
        assert_eq!(map.get(&token("B")), Some('b'));
        assert_eq!(map.len(), 2);
        assert!(report.conflicts.is_empty());
        assert_eq!(report.assigned, 2);
    }

    #[test]
    fn test_match_inside_longer_line() {
        let lines = segmented(&[&["X Y Z", "A B", "C", "D E F G"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("ab c")], &mut map, &FixedMap::new());

        assert_eq!(report.outcomes[0].resolution, Resolution::Line { line: 0, words: 1..3 });
        assert_eq!(map.get(&token("C")), Some('c'));
        assert!(!map.contains(&token("X")));
    }

    #[test]
    fn test_ambiguous_without_cue() {
        let lines = segmented(&[&["A B"], &["C D"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("ab")], &mut map, &FixedMap::new());

        assert!(map.is_empty());
        assert_eq!(
            report.outcomes[0].resolution,
            Resolution::Ambiguous {
                candidates: vec!["line 0".to_string(), "line 1".to_string()]
            }
        );
    }

    #[test]
    fn test_line_cue_disambiguates() {
        let lines = segmented(&[&["A B"], &["C D"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("1=>xy")], &mut map, &FixedMap::new());

        assert_eq!(report.outcomes[0].resolution, Resolution::Line { line: 1, words: 0..1 });
        assert_eq!(map.get(&token("C")), Some('x'));
        assert!(!map.contains(&token("A")));
    }

    #[test]
    fn test_cue_without_candidate_keeps_others() {
        let lines = segmented(&[&["A B"], &["C"]]);
        let mut map = CodeCharMap::new();
        let report = match_queries(&lines, &[query("1=>xy")], &mut map, &FixedMap::new());

        // Line 1 does not fit, line 0 is the single remaining candidate
        assert_eq!(report.outcomes[0].resolution, Resolution::Line { line: 0, words: 0..1 });
    }

    #[test]
    fn test_conflicts_are_reported_not_fatal() {
        let lines = segmented(&[&["A B"], &["C"]]);
        let mut fixed = FixedMap::new();
        fixed.insert(token("C"), "x");
        let mut map = CodeCharMap::new();
        let report = match_queries(
            &lines,
            &[query("0=>ab"), query("0=>ba"), query("1=>y")],
            &mut map,
            &fixed,
        );

        assert_eq!(report.resolved_count(), 3);
        assert_eq!(map.get(&token("A")), Some('b'));
        assert_eq!(map.get(&token("C")), Some('y'));

        let inconsistent = report
            .conflicts
            .iter()
            .filter(|c| matches!(c, Conflict::Inconsistent { .. }))
            .count();
        let fixed_conflicts = report
            .conflicts
            .iter()
            .filter(|c| matches!(c, Conflict::FixedMap { .. }))
            .count();
        assert_eq!(inconsistent, 2);
        assert_eq!(fixed_conflicts, 1);
    }
}
