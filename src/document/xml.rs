//! Reader for pdfminer XML layout dumps (`pdf2txt.py -t xml`).
//!
//! ```text
//! <page id="1" bbox="0.000,0.000,595.000,842.000" rotate="0">
//! <textbox id="0" bbox="...">
//! <textline bbox="...">
//! <text font="KJLAKH+CharisSIL" bbox="..." size="9.714">(cid:21)</text>
//! <text> </text>
//! ```
//!
//! Each `<text>` element is one glyph. Elements without a `font` attribute
//! are synthetic spacing inserted by the layout analysis; they belong to
//! every font already seen on the same text line.

use super::Document;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a pdfminer XML dump into a [`Document`].
///
/// # Errors
///
/// Returns [`Error::Parse`] when the XML is malformed or contains no
/// `<page>` element.
///
/// # Example
///
/// ```
/// use glyph_recover::document::parse_pdfminer_xml;
///
/// let xml = r#"<pages><page id="1"><textbox><textline>
/// <text font="F1">(cid:3)</text><text> </text><text font="F1">(cid:4)</text>
/// </textline></textbox></page></pages>"#;
/// let doc = parse_pdfminer_xml(xml)?;
/// assert_eq!(doc.font_lines("F1").unwrap()[0], vec!["(cid:3)", " ", "(cid:4)"]);
/// # Ok::<(), glyph_recover::error::Error>(())
/// ```
pub fn parse_pdfminer_xml(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    let mut doc = Document::new();

    let mut page_count = 0usize;
    let mut page_idx = 0usize;
    let mut line_idx = 0usize;

    // Per-textline state
    let mut in_textline = false;
    let mut line_fonts: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut line_glyphs = 0usize;

    // Per-text state
    let mut in_text = false;
    let mut text_font: Option<String> = None;
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"page" => {
                    page_idx = page_count;
                    page_count += 1;
                    line_idx = 0;
                },
                b"textline" => {
                    in_textline = true;
                    line_fonts.clear();
                    line_glyphs = 0;
                },
                b"text" if in_textline => {
                    in_text = true;
                    text_font = get_attribute(e, "font");
                    text_buf.clear();
                    line_glyphs += 1;
                },
                _ => {},
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"text" && in_textline {
                    line_glyphs += 1;
                }
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::Parse(format!("bad glyph text: {}", err)))?;
                    text_buf.push_str(&text);
                }
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"text" if in_text => {
                    in_text = false;
                    push_glyph(&mut line_fonts, text_font.take(), std::mem::take(&mut text_buf));
                },
                b"textline" if in_textline => {
                    in_textline = false;
                    for (font, glyphs) in line_fonts.drain(..) {
                        doc.push_line(page_idx, line_idx, line_glyphs, &font, glyphs);
                    }
                    line_idx += 1;
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            },
            _ => {},
        }
    }

    if page_count == 0 {
        return Err(Error::Parse(
            "no <page> elements found; expected the output of `pdf2txt.py -t xml`".to_string(),
        ));
    }

    log::info!(
        "Parsed {} pages, {} font lines, {} fonts",
        page_count,
        doc.lines().len(),
        doc.font_names().len()
    );

    Ok(doc)
}

fn push_glyph(line_fonts: &mut IndexMap<String, Vec<String>>, font: Option<String>, glyph: String) {
    if glyph == "\n" {
        return;
    }
    match font {
        Some(font) => line_fonts.entry(font).or_default().push(glyph),
        None => {
            for glyphs in line_fonts.values_mut() {
                glyphs.push(glyph.clone());
            }
        },
    }
}

/// Get an attribute value from an element.
fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FONTS: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<pages>
<page id="1" bbox="0.000,0.000,595.000,842.000" rotate="0">
<textbox id="0" bbox="10,10,100,20">
<textline bbox="10,10,100,20">
<text font="AAAAAA+Times" bbox="1,1,2,2" size="9.7">A</text>
<text> </text>
<text font="BBBBBB+Helios" bbox="1,1,2,2" size="9.7">(cid:21)</text>
<text font="BBBBBB+Helios" bbox="1,1,2,2" size="9.7">(cid:7)</text>
<text>
</text>
</textline>
<textline bbox="10,30,100,40">
<text font="BBBBBB+Helios" bbox="1,1,2,2" size="9.7">(cid:3)</text>
</textline>
</textbox>
</page>
<page id="2" bbox="0.000,0.000,595.000,842.000" rotate="0">
<textbox id="0" bbox="10,10,100,20">
<textline bbox="10,10,100,20">
<text font="AAAAAA+Times" bbox="1,1,2,2" size="9.7">&amp;</text>
</textline>
</textbox>
</page>
</pages>"#;

    #[test]
    fn test_parse_splits_fonts_per_line() {
        let doc = parse_pdfminer_xml(TWO_FONTS).expect("parse failed");

        assert_eq!(doc.font_names(), vec!["AAAAAA+Times", "BBBBBB+Helios"]);

        let helios = doc.font_lines("BBBBBB+Helios").unwrap();
        assert_eq!(helios.len(), 2);
        assert_eq!(helios[0], vec!["(cid:21)", "(cid:7)"]);
        assert_eq!(helios[1], vec!["(cid:3)"]);
    }

    #[test]
    fn test_fontless_glyph_goes_to_seen_fonts_only() {
        let doc = parse_pdfminer_xml(TWO_FONTS).expect("parse failed");
        let times = doc.font_lines("AAAAAA+Times").unwrap();
        // The spacing glyph follows Times but precedes Helios on the line
        assert_eq!(times[0], vec!["A", " "]);
    }

    #[test]
    fn test_line_tags() {
        let doc = parse_pdfminer_xml(TWO_FONTS).expect("parse failed");
        let tags: Vec<(usize, usize, usize, usize)> = doc
            .lines()
            .iter()
            .map(|l| (l.page, l.line, l.font_line, l.glyph_count))
            .collect();
        assert_eq!(tags, vec![(0, 0, 1, 5), (0, 0, 1, 5), (0, 1, 2, 1), (1, 0, 2, 1)]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let doc = parse_pdfminer_xml(TWO_FONTS).expect("parse failed");
        let times = doc.font_lines("AAAAAA+Times").unwrap();
        assert_eq!(times[1], vec!["&"]);
    }

    #[test]
    fn test_no_pages_is_parse_error() {
        let result = parse_pdfminer_xml("<pages></pages>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let result = parse_pdfminer_xml("<pages><page><textline></page>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
