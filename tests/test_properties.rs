//! Property tests for normalization, profile matching and rendering.

use glyph_recover::assemble::assemble;
use glyph_recover::mapping::{CodeCharMap, FixedMap};
use glyph_recover::matcher::find_profile;
use glyph_recover::normalize::CodeNormalizer;
use glyph_recover::tokens::{CodeToken, SegmentedLine, Word};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn raw_lines() -> impl Strategy<Value = Vec<Vec<String>>> {
    let code = prop_oneof![
        (0u32..400).prop_map(|n| format!("(cid:{})", n)),
        "[a-z]",
    ];
    prop::collection::vec(prop::collection::vec(code, 0..12), 1..8)
}

proptest! {
    #[test]
    fn test_normalization_is_a_bijection(lines in raw_lines()) {
        let normalized = CodeNormalizer::new().normalize("F", &lines);

        // Same raw code, same token; different raw codes, different tokens
        let mut seen: BTreeMap<&String, &CodeToken> = BTreeMap::new();
        for (raw_line, token_line) in lines.iter().zip(&normalized.corpus.lines) {
            prop_assert_eq!(raw_line.len(), token_line.len());
            for (raw, token) in raw_line.iter().zip(token_line) {
                let previous = seen.entry(raw).or_insert(token);
                prop_assert_eq!(*previous, token);
            }
        }
        let distinct: BTreeSet<&&CodeToken> = seen.values().collect();
        prop_assert_eq!(distinct.len(), seen.len());
    }

    #[test]
    fn test_normalization_is_idempotent(lines in raw_lines()) {
        let normalizer = CodeNormalizer::new();
        let first = normalizer.normalize("F", &lines);
        let relabeled: Vec<Vec<String>> = first
            .corpus
            .lines
            .iter()
            .map(|line| line.iter().map(|t| t.as_str().to_string()).collect())
            .collect();
        let second = normalizer.normalize("F", &relabeled);
        prop_assert_eq!(first.corpus, second.corpus);
    }

    #[test]
    fn test_found_profile_is_a_real_occurrence(
        haystack in prop::collection::vec(1usize..4, 0..12),
        needle in prop::collection::vec(1usize..4, 1..4),
    ) {
        match find_profile(&haystack, &needle) {
            Some(start) => {
                prop_assert_eq!(&haystack[start..start + needle.len()], needle.as_slice());
                for earlier in 0..start {
                    prop_assert_ne!(&haystack[earlier..earlier + needle.len()], needle.as_slice());
                }
            },
            None => {
                let found = haystack.windows(needle.len()).any(|w| w == needle.as_slice());
                prop_assert!(!found);
            },
        }
    }

    #[test]
    fn test_assembly_accounts_for_every_token(
        words in prop::collection::vec(prop::collection::vec(0u8..6, 1..5), 1..6),
        known in prop::collection::btree_set(0u8..6, 0..6),
    ) {
        let line = SegmentedLine {
            index: 0,
            words: words
                .iter()
                .map(|w| Word::new(w.iter().map(|n| CodeToken::new(n.to_string())).collect()))
                .collect(),
        };
        let mut map = CodeCharMap::new();
        for n in &known {
            map.seed(CodeToken::new(n.to_string()), char::from(b'a' + n));
        }
        let text = assemble(&[line], &map, &FixedMap::new());

        let used: BTreeSet<u8> = words.iter().flatten().copied().collect();
        let missing = used.difference(&known).count();
        prop_assert_eq!(text.unresolved_tokens.len(), missing);
        prop_assert_eq!(text.is_complete(), missing == 0);
        prop_assert!(text.completion_ratio() >= 0.0 && text.completion_ratio() <= 1.0);
        if missing == 0 {
            prop_assert!(!text.lines[0].contains('['));
        }
    }
}
