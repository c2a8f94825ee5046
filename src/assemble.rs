//! Rendering the target font's lines with the final mapping.

use crate::mapping::{CodeCharMap, FixedMap};
use crate::matcher::WordRenderer;
use crate::tokens::{CodeToken, SegmentedLine};
use indexmap::IndexMap;

/// The recovered text of the target font plus what is still missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredText {
    /// One rendered line per corpus line, in order
    pub lines: Vec<String>,
    /// Unresolved tokens with the lines they occur on, most frequent first
    pub unresolved_tokens: Vec<(CodeToken, Vec<usize>)>,
    /// Lines with their unresolved tokens, most unresolved first
    pub unresolved_lines: Vec<(usize, Vec<CodeToken>)>,
    /// Number of inferred mappings
    pub resolved: usize,
}

impl RecoveredText {
    /// `resolved / (resolved + distinct unresolved)`, or 1.0 when both are zero.
    pub fn completion_ratio(&self) -> f64 {
        let total = self.resolved + self.unresolved_tokens.len();
        if total == 0 {
            return 1.0;
        }
        self.resolved as f64 / total as f64
    }

    /// Whether every token was resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved_tokens.is_empty()
    }

    /// Lines prefixed with their 0-based index, `l.0007:\t...`.
    pub fn to_numbered_text(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("l.{:04}:\t{}\n", i, line))
            .collect()
    }
}

/// Render every line; fixed overrides take precedence over inferred characters.
///
/// Words are joined by a single space. Unknown tokens are emitted in their
/// bracketed literal form.
pub fn assemble(lines: &[SegmentedLine], map: &CodeCharMap, fixed: &FixedMap) -> RecoveredText {
    let mut rendered = Vec::with_capacity(lines.len());
    let mut occurrences: IndexMap<CodeToken, Vec<usize>> = IndexMap::new();
    let mut unresolved_lines = Vec::new();

    for line in lines {
        let mut missing: Vec<CodeToken> = Vec::new();
        let words: Vec<String> = line
            .words
            .iter()
            .map(|word| {
                let mut renderer = WordRenderer::new();
                for token in word.tokens() {
                    if let Some(text) = fixed.get(token) {
                        renderer.push_known(text);
                    } else if let Some(ch) = map.get(token) {
                        renderer.push_known(ch.encode_utf8(&mut [0; 4]));
                    } else {
                        renderer.push_unknown(token);
                        occurrences.entry(token.clone()).or_default().push(line.index);
                        if !missing.contains(token) {
                            missing.push(token.clone());
                        }
                    }
                }
                renderer.finish()
            })
            .collect();
        rendered.push(words.join(" "));
        if !missing.is_empty() {
            unresolved_lines.push((line.index, missing));
        }
    }

    let mut unresolved_tokens: Vec<(CodeToken, Vec<usize>)> = occurrences.into_iter().collect();
    unresolved_tokens.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    unresolved_lines.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let text = RecoveredText {
        lines: rendered,
        unresolved_tokens,
        unresolved_lines,
        resolved: map.len(),
    };
    log::info!(
        "Assembled {} lines: {} tokens resolved, {} unresolved ({:.1}%)",
        text.lines.len(),
        text.resolved,
        text.unresolved_tokens.len(),
        text.completion_ratio() * 100.0
    );
    text
}
