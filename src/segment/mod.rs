//! Word segmentation and corpus profiling.
//!
//! Segmentation splits each token line at the separator token. The dot token
//! stays inside its word (it is decoded to `.` like any other character), so
//! a sentence-final word such as `word.` keeps its period.
//!
//! The profile only characterizes structure for the human choosing the next
//! ground truth: word frequencies, longest words, a length histogram and the
//! bigram graph of frequent short words.

mod bigrams;

pub use bigrams::{BigramGraph, BIGRAM_MAX_TOKENS, BIGRAM_SCAN_LIMIT, BIGRAM_WORD_LIMIT};

use crate::punctuation::Punctuation;
use crate::tokens::{CodeToken, SegmentedLine, Word};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Splits token lines into words at the separator token.
#[derive(Debug, Clone)]
pub struct WordSegmenter {
    punctuation: Punctuation,
}

impl WordSegmenter {
    /// Create a segmenter for a dot/space pair.
    pub fn new(punctuation: Punctuation) -> Self {
        Self { punctuation }
    }

    /// The dot/space pair in use.
    pub fn punctuation(&self) -> &Punctuation {
        &self.punctuation
    }

    /// Segment every line; runs of separators never produce empty words.
    pub fn segment(&self, lines: &[Vec<CodeToken>]) -> Vec<SegmentedLine> {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| SegmentedLine {
                index,
                words: self.split_line(line),
            })
            .collect()
    }

    fn split_line(&self, line: &[CodeToken]) -> Vec<Word> {
        line.split(|token| *token == self.punctuation.space)
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| Word::new(tokens.to_vec()))
            .collect()
    }

    /// Human-readable text of a line: separator as a space, dot as `.`.
    pub fn display_line(&self, line: &SegmentedLine) -> String {
        line.words
            .iter()
            .map(|word| {
                let stripped = word.without_trailing(&self.punctuation.dot);
                if stripped.len() < word.len() {
                    format!("{}.", stripped)
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Structural statistics over the segmented corpus.
#[derive(Debug, Clone)]
pub struct WordProfile {
    frequencies: Vec<(Word, usize)>,
    length_histogram: BTreeMap<usize, usize>,
    bigrams: BigramGraph,
}

impl WordProfile {
    /// Profile segmented lines. A trailing dot token is not part of the word.
    pub fn build(lines: &[SegmentedLine], punctuation: &Punctuation) -> Self {
        let mut counts: IndexMap<Word, usize> = IndexMap::new();
        for line in lines {
            for word in &line.words {
                if word.len() == 1 && word.last() == Some(&punctuation.dot) {
                    continue;
                }
                *counts.entry(word.without_trailing(&punctuation.dot)).or_default() += 1;
            }
        }

        // Descending count, ties in natural word order
        let mut frequencies: Vec<(Word, usize)> = counts.into_iter().collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut length_histogram = BTreeMap::new();
        for (word, _) in &frequencies {
            *length_histogram.entry(word.len()).or_default() += 1;
        }

        let bigrams = BigramGraph::from_frequencies(&frequencies);

        log::info!(
            "Profiled {} distinct words, bigram graph has {} edges",
            frequencies.len(),
            bigrams.edge_count()
        );

        Self {
            frequencies,
            length_histogram,
            bigrams,
        }
    }

    /// Number of distinct words.
    pub fn distinct_words(&self) -> usize {
        self.frequencies.len()
    }

    /// The `n` most frequent words with their counts.
    pub fn top_words(&self, n: usize) -> &[(Word, usize)] {
        &self.frequencies[..n.min(self.frequencies.len())]
    }

    /// The `n` longest distinct words, longest first.
    pub fn longest_words(&self, n: usize) -> Vec<&Word> {
        let mut words: Vec<&Word> = self.frequencies.iter().map(|(w, _)| w).collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.truncate(n);
        words
    }

    /// Number of distinct words per length in tokens.
    pub fn length_histogram(&self) -> &BTreeMap<usize, usize> {
        &self.length_histogram
    }

    /// Bigram graph of frequent short words.
    pub fn bigrams(&self) -> &BigramGraph {
        &self.bigrams
    }
}
