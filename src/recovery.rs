//! One complete recovery run.
//!
//! ```text
//! Document (pdfminer XML)
//!     ↓
//! [CodeNormalizer]          raw codes → canonical tokens
//!     ↓
//! [infer_punctuation]       dot + separator tokens
//!     ↓
//! [WordSegmenter]           token lines → words, profile
//!     ↓
//! [match_queries]           phase A, extends the mapping
//! [match_sure_words]        phase B, extends the mapping
//! [suggest_capitals]        phase C, advisory
//!     ↓
//! [assemble]                recovered lines + unresolved reports
//!     ↓
//! [reassemble]              full document text
//! ```
//!
//! Each run starts from an empty mapping: improving the result means
//! editing the ground truth and running again.

use crate::assemble::{assemble, RecoveredText};
use crate::config::{GroundTruth, RecoveryOptions};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::mapping::{CodeCharMap, Conflict, FixedMap};
use crate::matcher::{match_queries, match_sure_words, suggest_capitals, CapitalReport, PhaseReport};
use crate::normalize::CodeNormalizer;
use crate::punctuation::{infer_punctuation, ranked, Punctuation, PunctuationGuess, TokenStatistics};
use crate::reassemble::reassemble;
use crate::segment::{WordProfile, WordSegmenter};
use crate::tokens::{CodeToken, Corpus, SegmentedLine};
use std::collections::BTreeMap;

/// Number of longest words reported by the profile.
const LONGEST_WORDS: usize = 20;

/// Number of tokens shown per statistics ranking.
const STATISTICS_SHOWN: usize = 10;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    /// Recovered font
    pub font: String,
    /// Raw code → canonical token, empty when codes were used as is
    pub code_table: BTreeMap<String, CodeToken>,
    /// Token lines of the font
    pub corpus: Corpus,
    /// Per-token statistics of the corpus
    pub statistics: TokenStatistics,
    /// Dot/space pair used for segmentation
    pub punctuation: Punctuation,
    /// Inference details, when the pair was guessed
    pub punctuation_guess: Option<PunctuationGuess>,
    /// Segmented corpus
    pub lines: Vec<SegmentedLine>,
    /// Word statistics
    pub profile: WordProfile,
    /// Final inferred mapping
    pub map: CodeCharMap,
    /// Conflicts raised by the pre-seeded punctuation
    pub seed_conflicts: Vec<Conflict>,
    /// Phase A report
    pub queries: PhaseReport,
    /// Phase B report
    pub sure_words: PhaseReport,
    /// Phase C report
    pub capitals: CapitalReport,
    /// Recovered font text
    pub recovered: RecoveredText,
    /// Whole document with the font replaced
    pub document_text: String,
}

impl RecoveryOutcome {
    /// Whether every token of the font was resolved.
    pub fn is_complete(&self) -> bool {
        self.recovered.is_complete()
    }

    /// Every conflict of the run: seeding, then phases A and B.
    pub fn conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.seed_conflicts
            .iter()
            .chain(&self.queries.conflicts)
            .chain(&self.sure_words.conflicts)
    }

    /// Total number of conflicts.
    pub fn conflict_count(&self) -> usize {
        self.conflicts().count()
    }
}

/// Orchestrates normalization, inference and reassembly for one font.
#[derive(Debug, Clone, Default)]
pub struct RecoveryPipeline {
    options: RecoveryOptions,
}

impl RecoveryPipeline {
    /// Create a pipeline with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom options.
    pub fn with_options(options: RecoveryOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &RecoveryOptions {
        &self.options
    }

    /// Pick the target font: the option override, then the ground truth.
    pub fn target_font(&self, document: &Document, ground_truth: &GroundTruth) -> Result<String> {
        let available = document.font_names();
        let Some(font) = self
            .options
            .target_font
            .as_ref()
            .or(ground_truth.target_font.as_ref())
        else {
            return Err(Error::NoTargetFont { available });
        };
        if !document.has_font(font) {
            return Err(Error::UnknownFont {
                font: font.clone(),
                available,
            });
        }
        Ok(font.clone())
    }

    /// Run the whole pipeline.
    pub fn run(&self, document: &Document, ground_truth: &GroundTruth) -> Result<RecoveryOutcome> {
        let font = self.target_font(document, ground_truth)?;
        if ground_truth.is_empty() {
            return Err(Error::NoGroundTruth);
        }
        let queries = ground_truth.parsed_queries()?;
        let fixed = ground_truth.fixed();

        let raw_lines = document.font_lines(&font).unwrap_or_default();
        log::info!("Recovering font {} ({} lines)", font, raw_lines.len());

        let (corpus, code_table) = if self.options.force_cid || CodeNormalizer::is_cid_majority(raw_lines) {
            let normalized = CodeNormalizer::new()
                .with_keep_punctuation(self.options.keep_punctuation)
                .normalize(&font, raw_lines);
            (normalized.corpus, normalized.table)
        } else {
            log::info!("Font {} is not CID encoded, using glyphs as tokens", font);
            (CodeNormalizer::passthrough(&font, raw_lines), BTreeMap::new())
        };
        if corpus.glyph_count() == 0 {
            return Err(Error::EmptyCorpus(font));
        }

        let statistics = TokenStatistics::collect(&corpus.lines);
        log_statistics(&statistics);

        let (punctuation, punctuation_guess) = self.punctuation(&corpus)?;
        let segmenter = WordSegmenter::new(punctuation.clone());
        let lines = segmenter.segment(&corpus.lines);
        for line in lines.iter().take(STATISTICS_SHOWN) {
            log::debug!("l.{:04}: {}", line.index, segmenter.display_line(line));
        }

        let profile = WordProfile::build(&lines, &punctuation);
        log_profile(&profile, self.options.top_words);

        let mut map = CodeCharMap::new();
        let seed_conflicts = self.seed_punctuation(&corpus, &punctuation, &fixed, &mut map);

        let query_report = match_queries(&lines, &queries, &mut map, &fixed);
        let sure_report = match_sure_words(&lines, &ground_truth.sure_words, &mut map, &fixed)?;
        let capitals = suggest_capitals(&lines, &map, &fixed)?;
        log::info!("Mapping: {}", map);

        let recovered = assemble(&lines, &map, &fixed);
        let document_text = reassemble(document, &font, &recovered.lines, &ground_truth.combining_map)?;

        if recovered.is_complete() {
            log::info!("Recovery of {} is complete", font);
        } else {
            log::info!(
                "Recovery of {} is {:.1}% complete, {} tokens left",
                font,
                recovered.completion_ratio() * 100.0,
                recovered.unresolved_tokens.len()
            );
        }

        Ok(RecoveryOutcome {
            font,
            code_table,
            corpus,
            statistics,
            punctuation,
            punctuation_guess,
            lines,
            profile,
            map,
            seed_conflicts,
            queries: query_report,
            sure_words: sure_report,
            capitals,
            recovered,
            document_text,
        })
    }

    /// Map the dot, and the literal comma in keep mode, before matching.
    ///
    /// Only tokens that occur in the corpus are seeded.
    fn seed_punctuation(
        &self,
        corpus: &Corpus,
        punctuation: &Punctuation,
        fixed: &FixedMap,
        map: &mut CodeCharMap,
    ) -> Vec<Conflict> {
        let mut seeds = vec![(punctuation.dot.clone(), '.')];
        if self.options.keep_punctuation {
            seeds.push((CodeToken::new(","), ','));
        }

        let mut conflicts = Vec::new();
        for (token, ch) in seeds {
            if corpus.lines.iter().flatten().any(|t| *t == token) {
                map.assign(&token, ch, fixed, "punctuation", &mut conflicts);
            } else {
                log::debug!("Token {} does not occur in {}, not seeding '{}'", token, corpus.font, ch);
            }
        }
        conflicts
    }

    /// Override, then keep mode, then inference.
    fn punctuation(&self, corpus: &Corpus) -> Result<(Punctuation, Option<PunctuationGuess>)> {
        if let Some(punctuation) = &self.options.punctuation {
            log::info!("Using punctuation override {}", punctuation);
            return Ok((punctuation.clone(), None));
        }
        if self.options.keep_punctuation {
            return Ok((Punctuation::literal(), None));
        }
        let guess =
            infer_punctuation(&corpus.lines).ok_or_else(|| Error::EmptyCorpus(corpus.font.clone()))?;
        Ok((guess.punctuation.clone(), Some(guess)))
    }
}

fn log_statistics(stats: &TokenStatistics) {
    let show = |counts| {
        ranked(counts)
            .into_iter()
            .take(STATISTICS_SHOWN)
            .map(|(token, count)| format!("{}:{}", token, count))
            .collect::<Vec<_>>()
            .join(" ")
    };
    log::debug!("Most frequent tokens: {}", show(&stats.all));
    log::debug!("Most frequent first tokens: {}", show(&stats.start));
    log::debug!("Most frequent last tokens: {}", show(&stats.last));
    log::debug!("Tokens on most lines: {}", show(&stats.lines_containing));
}

fn log_profile(profile: &WordProfile, top_words: usize) {
    let top: Vec<String> = profile
        .top_words(top_words)
        .iter()
        .map(|(word, count)| format!("{} ({})", word, count))
        .collect();
    log::info!("Top {} words: {}", top.len(), top.join(", "));

    let longest: Vec<String> = profile.longest_words(LONGEST_WORDS).iter().map(|w| w.to_string()).collect();
    log::info!("Longest words: {}", longest.join(", "));

    for (len, count) in profile.length_histogram() {
        log::debug!("{} words of length {}", count, len);
    }
}
