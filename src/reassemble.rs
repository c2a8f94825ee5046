//! Merging the recovered font back into the full document text.

use crate::document::Document;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Rebuild the document text with `target_font` replaced by `recovered`.
///
/// Every document line is emitted in order followed by a newline: lines of
/// the target font use the recovered line with the same font-line number,
/// all other lines keep their glyphs verbatim. The combining map is then
/// applied as literal replacements, in map order.
pub fn reassemble(
    document: &Document,
    target_font: &str,
    recovered: &[String],
    combining: &IndexMap<String, String>,
) -> Result<String> {
    let expected = document.font_lines(target_font).map_or(0, |lines| lines.len());
    if recovered.len() < expected {
        return Err(Error::LineCountMismatch {
            font: target_font.to_string(),
            expected,
            recovered: recovered.len(),
        });
    }

    let mut text = String::new();
    for line in document.lines() {
        if line.font == target_font {
            text.push_str(&recovered[line.font_line - 1]);
        } else {
            text.push_str(&line.text());
        }
        text.push('\n');
    }

    for (from, to) in combining {
        if from.is_empty() {
            log::warn!("Skipping empty combining map key");
            continue;
        }
        text = text.replace(from.as_str(), to);
    }

    log::info!(
        "Reassembled {} lines, {} combining substitutions",
        document.lines().len(),
        combining.len()
    );
    Ok(text)
}
