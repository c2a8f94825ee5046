//! End-to-end tests for the recovery pipeline.

use glyph_recover::config::{GroundTruth, RecoveryOptions};
use glyph_recover::document::parse_pdfminer_xml;
use glyph_recover::error::Error;
use glyph_recover::export::{write_artifacts, BIGRAM_GRAPH_FILE, DOCUMENT_RAW_FILE, RECOVERED_TEXT_FILE};
use glyph_recover::recovery::{RecoveryOutcome, RecoveryPipeline};
use glyph_recover::Document;

const TARGET: &str = "BBBBBB+Helios";
const OTHER: &str = "AAAAAA+Times";

/// Body text of the encoded font, one entry per line.
const BODY: [&str; 6] = [
    "we saw a big red fox and an old owl by the river bank",
    "it ran off.",
    "no one knew.",
    "so we left.",
    "all cats purr.",
    "The cat sat.",
];

/// Encode one glyph of the target font; punctuation optionally stays literal.
fn glyph(ch: char, literal_punctuation: bool) -> String {
    match ch {
        ' ' if literal_punctuation => "<text> </text>".to_string(),
        '.' if literal_punctuation => format!("<text font=\"{}\">.</text>", TARGET),
        _ => format!("<text font=\"{}\" size=\"9.7\">(cid:{})</text>", TARGET, ch as u32),
    }
}

/// Build a pdfminer XML dump: a heading in a plain font, then the body.
fn pdfminer_xml(literal_punctuation: bool) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<pages>\n");
    xml.push_str("<page id=\"1\" bbox=\"0,0,595,842\" rotate=\"0\">\n<textbox id=\"0\">\n");
    xml.push_str("<textline>\n");
    for ch in "Chapter 1".chars() {
        xml.push_str(&format!("<text font=\"{}\">{}</text>\n", OTHER, ch));
    }
    xml.push_str("<text>\n</text>\n</textline>\n");
    for line in BODY {
        xml.push_str("<textline>\n");
        for ch in line.chars() {
            xml.push_str(&glyph(ch, literal_punctuation));
            xml.push('\n');
        }
        xml.push_str("<text>\n</text>\n</textline>\n");
    }
    xml.push_str("</textbox>\n</page>\n</pages>\n");
    xml
}

fn document(literal_punctuation: bool) -> Document {
    parse_pdfminer_xml(&pdfminer_xml(literal_punctuation)).expect("Failed to parse generated XML")
}

fn ground_truth() -> GroundTruth {
    GroundTruth::from_json_str(&format!(
        r#"{{
            "target_font": "{}",
            "queries": ["0=>we saw a big red fox and an old owl by the river bank", "it ran off."],
            "sure_words": ["cats", "purr"]
        }}"#,
        TARGET
    ))
    .expect("Failed to parse ground truth")
}

fn run(document: &Document, ground_truth: &GroundTruth, options: RecoveryOptions) -> RecoveryOutcome {
    RecoveryPipeline::with_options(options)
        .run(document, ground_truth)
        .expect("Recovery failed")
}

mod document_reading {
    use super::*;

    #[test]
    fn test_fonts_in_order_of_appearance() {
        let doc = document(false);
        assert_eq!(doc.font_summary(), vec![(OTHER.to_string(), 1), (TARGET.to_string(), 6)]);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let result = parse_pdfminer_xml("<pages><page><textline></page>");
        assert!(matches!(result, Err(Error::Parse(_))), "expected a parse error");
    }

    #[test]
    fn test_document_without_pages_is_parse_error() {
        let result = parse_pdfminer_xml("<pages></pages>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}

mod inference {
    use super::*;

    #[test]
    fn test_punctuation_is_inferred() {
        let doc = document(false);
        let outcome = run(&doc, &ground_truth(), RecoveryOptions::new());

        let guess = outcome.punctuation_guess.as_ref().expect("punctuation should be guessed");
        assert!(guess.consistent, "all separator heuristics should agree");
        assert_eq!(outcome.map.get(&outcome.punctuation.dot), Some('.'));
        assert_eq!(outcome.code_table["(cid:32)"], outcome.punctuation.space);
        assert_eq!(outcome.code_table["(cid:46)"], outcome.punctuation.dot);
        assert_eq!(guess.dot_space_pairs, 0, "no sentence ends mid-line");
    }

    #[test]
    fn test_ground_truth_recovers_body() {
        let doc = document(false);
        let outcome = run(&doc, &ground_truth(), RecoveryOptions::new());

        assert_eq!(outcome.queries.resolved_count(), 2);
        assert_eq!(outcome.sure_words.resolved_count(), 2);
        assert_eq!(outcome.conflict_count(), 0);
        assert_eq!(&outcome.recovered.lines[..5], &BODY[..5]);

        // Only the capital T is left
        assert_eq!(outcome.recovered.unresolved_tokens.len(), 1);
        let (capital, lines) = &outcome.recovered.unresolved_tokens[0];
        assert_eq!(lines, &vec![5]);
        assert_eq!(outcome.recovered.lines[5], format!("{}:he cat sat.", capital.literal()));
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_capital_is_suggested_not_applied() {
        let doc = document(false);
        let outcome = run(&doc, &ground_truth(), RecoveryOptions::new());

        let suggestion = outcome
            .capitals
            .suggestions
            .iter()
            .find(|s| s.matched == "the")
            .expect("a suggestion for 'The'");
        assert_eq!(suggestion.assignments.len(), 1);
        let (token, text) = &suggestion.assignments[0];
        assert_eq!(text, "T");
        assert!(!outcome.map.contains(token), "suggestions must not be applied");
    }

    #[test]
    fn test_fixed_map_completes_recovery() {
        let doc = document(false);
        let first = run(&doc, &ground_truth(), RecoveryOptions::new());
        let (capital, _) = &first.recovered.unresolved_tokens[0];

        let mut gt = ground_truth();
        gt.fixed_map.insert(capital.literal(), "T".to_string());
        let second = run(&doc, &gt, RecoveryOptions::new());

        assert!(second.is_complete());
        assert_eq!(second.recovered.completion_ratio(), 1.0);
        assert_eq!(second.recovered.lines, BODY.to_vec());
        assert_eq!(second.document_text, format!("Chapter 1\n{}\n", BODY.join("\n")));
    }

    #[test]
    fn test_keep_punctuation_mode() {
        let doc = document(true);
        let options = RecoveryOptions::new().with_keep_punctuation(true);
        let outcome = run(&doc, &ground_truth(), options);

        assert!(outcome.punctuation_guess.is_none());
        assert_eq!(outcome.punctuation.dot.as_str(), ".");
        assert_eq!(outcome.punctuation.space.as_str(), " ");
        assert_eq!(&outcome.recovered.lines[..5], &BODY[..5]);
    }

    #[test]
    fn test_combining_map_rewrites_document() {
        let doc = document(false);
        let mut gt = ground_truth();
        gt.combining_map.insert("purr".to_string(), "puř".to_string());
        let outcome = run(&doc, &gt, RecoveryOptions::new());

        assert!(outcome.document_text.contains("all cats puř."));
        assert_eq!(outcome.recovered.lines[4], "all cats purr.", "recovered lines are not rewritten");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let doc = document(false);
        let first = run(&doc, &ground_truth(), RecoveryOptions::new());
        let second = run(&doc, &ground_truth(), RecoveryOptions::new());

        assert_eq!(first.map, second.map);
        assert_eq!(first.recovered, second.recovered);
        assert_eq!(first.document_text, second.document_text);
        assert_eq!(first.code_table, second.code_table);
    }
}

mod configuration_errors {
    use super::*;

    #[test]
    fn test_no_target_font() {
        let doc = document(false);
        let gt = GroundTruth::from_json_str(r#"{"sure_words": ["cats"]}"#).unwrap();
        match RecoveryPipeline::new().run(&doc, &gt) {
            Err(Error::NoTargetFont { available }) => assert_eq!(available, vec![OTHER, TARGET]),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("recovery without a font should fail"),
        }
    }

    #[test]
    fn test_unknown_target_font() {
        let doc = document(false);
        let options = RecoveryOptions::new().with_target_font("CCCCCC+Missing");
        let result = RecoveryPipeline::with_options(options).run(&doc, &ground_truth());
        assert!(matches!(result, Err(Error::UnknownFont { ref font, .. }) if font == "CCCCCC+Missing"));
    }

    #[test]
    fn test_no_ground_truth() {
        let doc = document(false);
        let gt = GroundTruth {
            target_font: Some(TARGET.to_string()),
            ..GroundTruth::default()
        };
        let result = RecoveryPipeline::new().run(&doc, &gt);
        assert!(matches!(result, Err(Error::NoGroundTruth)));
    }

    #[test]
    fn test_invalid_query_cue() {
        let doc = document(false);
        let mut gt = ground_truth();
        gt.queries.push("first=>it ran off.".to_string());
        let result = RecoveryPipeline::new().run(&doc, &gt);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }
}

mod artifacts {
    use super::*;
    use std::fs;

    #[test]
    fn test_artifacts_written() {
        let doc = document(false);
        let outcome = run(&doc, &ground_truth(), RecoveryOptions::new());
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let out = dir.path().join("out");

        let artifacts = write_artifacts(&outcome, &doc, &out).expect("Failed to write artifacts");

        assert_eq!(artifacts.recovered_text, out.join(RECOVERED_TEXT_FILE));
        let text = fs::read_to_string(&artifacts.recovered_text).unwrap();
        assert!(text.starts_with("l.0000:\twe saw a big red fox"));
        assert_eq!(text.lines().count(), BODY.len());

        let document_text = fs::read_to_string(&artifacts.recovered_document).unwrap();
        assert_eq!(document_text, outcome.document_text);

        let raw = fs::read_to_string(out.join(DOCUMENT_RAW_FILE)).unwrap();
        assert!(raw.starts_with("page\tline\tfont\tfont_line\tlen\ttext\n"));
        assert_eq!(raw.lines().count(), 1 + 1 + BODY.len());

        let gexf = fs::read_to_string(out.join(BIGRAM_GRAPH_FILE)).unwrap();
        assert!(gexf.contains("<gexf"));
        assert!(gexf.contains("defaultedgetype=\"undirected\""));
    }
}
