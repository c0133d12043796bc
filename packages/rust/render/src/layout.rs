//! Flow layout: wraps text blocks into lines and distributes them over pages.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page. Glyph widths are approximations of Helvetica's metrics, which is
//! close enough for line breaking.

use projectbook_shared::PageSize;

use crate::document::{Block, Document, Font, TextStyle};

/// Margin on every side of the page.
pub const MARGIN_PT: f32 = 72.0;

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font: Font,
    pub size: f32,
    /// Left edge.
    pub x: f32,
    /// Baseline.
    pub y: f32,
}

/// Lines on one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Lay the document out on pages of the given size.
///
/// Always returns at least one page.
pub fn layout(doc: &Document, page_size: PageSize) -> Vec<LaidOutPage> {
    let (width, height) = page_size.dimensions_pt();
    let top = height - MARGIN_PT;
    let bottom = MARGIN_PT;
    let max_width = width - 2.0 * MARGIN_PT;

    let mut pages = vec![LaidOutPage::default()];
    let mut cursor = top;

    for block in doc.blocks() {
        if let Block::Spacer(gap) = block {
            if cursor - gap < bottom {
                // Spacer overflows: the next line starts a fresh page.
                cursor = bottom;
            } else {
                cursor -= gap;
            }
            continue;
        }

        let Some((text, style)) = block.text() else {
            continue;
        };

        for line in wrap(text, max_width, style) {
            if cursor - style.leading < bottom {
                if pages.last().is_some_and(|p| !p.lines.is_empty()) {
                    pages.push(LaidOutPage::default());
                }
                cursor = top;
            }
            let placed = PlacedLine {
                text: line,
                font: style.font,
                size: style.size,
                x: MARGIN_PT,
                y: cursor - style.size,
            };
            if let Some(page) = pages.last_mut() {
                page.lines.push(placed);
            }
            cursor -= style.leading;
        }
    }

    pages
}

/// Greedy word wrap. Words wider than a whole line are split.
pub fn wrap(text: &str, max_width: f32, style: TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, style) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, style) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_word(word, max_width, style);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word(word: &str, max_width: f32, style: TextStyle) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && text_width(&piece, style) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Approximate rendered width in points.
pub fn text_width(text: &str, style: TextStyle) -> f32 {
    let bold_factor = match style.font {
        Font::Helvetica => 1.0,
        Font::HelveticaBold => 1.06,
    };
    let ems: f32 = text.chars().map(glyph_width).sum();
    ems * style.size * bold_factor
}

/// Helvetica advance widths in ems, bucketed.
fn glyph_width(c: char) -> f32 {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' => 0.222,
        'i' | 'j' | 'l' | '.' | ',' | '\'' | ':' | ';' | '|' | '!' => 0.278,
        '\u{00CC}'..='\u{00CF}' | '\u{00EC}'..='\u{00EF}' | '\u{00A1}' | '\u{00B7}' => 0.278,
        ' ' | 'f' | 't' | 'I' | '/' | '(' | ')' | '[' | ']' | '-' => 0.333,
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2039}' | '\u{203A}' | '\u{02C6}' => 0.333,
        '\u{2022}' => 0.35,
        'r' => 0.389,
        'm' | 'M' | 'W' | '@' => 0.833,
        '\u{0152}' | '\u{00C6}' | '\u{2026}' | '\u{2014}' | '\u{2030}' | '\u{2122}' => 1.0,
        '\u{0153}' | '\u{00E6}' => 0.944,
        'w' | '\u{00C7}' | '\u{00D0}' | '\u{00D1}' | '\u{00D9}'..='\u{00DC}' => 0.722,
        '\u{00D2}'..='\u{00D6}' | '\u{00D8}' => 0.778,
        'A'..='Z' | '\u{00C0}'..='\u{00C5}' | '\u{00C8}'..='\u{00CB}' | '\u{00DD}' | '\u{00DE}' => 0.667,
        '\u{0160}' | '\u{0178}' => 0.667,
        '\u{017D}' => 0.611,
        '\u{00FD}' | '\u{00FF}' | '\u{017E}' => 0.5,
        '\u{0161}' => 0.5,
        _ => 0.556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BODY, HEADING};
    use projectbook_shared::ProjectRecord;

    fn record(title: &str, description: &str) -> ProjectRecord {
        ProjectRecord {
            id: "1".into(),
            title: title.into(),
            description: description.into(),
        }
    }

    #[test]
    fn wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
        let lines = wrap(&text, 200.0, BODY);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY) <= 200.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.trim());
    }

    #[test]
    fn wrap_splits_oversized_words() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 100.0, HEADING);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn wrap_empty_text_has_no_lines() {
        assert!(wrap("", 100.0, BODY).is_empty());
        assert!(wrap("   ", 100.0, BODY).is_empty());
    }

    #[test]
    fn short_document_fits_one_page_in_order() {
        let doc = Document::from_records(&[record("Alpha", "Desc A"), record("Beta", "Desc B")]);
        let pages = layout(&doc, PageSize::Letter);

        assert_eq!(pages.len(), 1);
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Desc A", "Beta", "Desc B"]);

        let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
        assert!(ys.windows(2).all(|w| w[0] > w[1]), "lines must descend: {ys:?}");
        assert_eq!(pages[0].lines[0].font, Font::HelveticaBold);
        assert_eq!(pages[0].lines[1].font, Font::Helvetica);
    }

    #[test]
    fn long_content_paginates_within_margins() {
        let long = "Lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(60);
        let records: Vec<ProjectRecord> = (0..12)
            .map(|i| record(&format!("Project {i}"), &long))
            .collect();
        let doc = Document::from_records(&records);

        for size in [PageSize::Letter, PageSize::A4] {
            let pages = layout(&doc, size);
            assert!(pages.len() > 1);

            let (_, height) = size.dimensions_pt();
            for page in &pages {
                assert!(!page.lines.is_empty());
                for line in &page.lines {
                    assert!(line.y >= MARGIN_PT);
                    assert!(line.y <= height - MARGIN_PT);
                }
            }

            let headings: Vec<&str> = pages
                .iter()
                .flat_map(|p| p.lines.iter())
                .filter(|l| l.font == Font::HelveticaBold)
                .map(|l| l.text.as_str())
                .collect();
            let expected: Vec<String> = (0..12).map(|i| format!("Project {i}")).collect();
            assert_eq!(headings, expected);
        }
    }

    #[test]
    fn blank_records_do_not_push_lines_below_margin() {
        let mut records: Vec<ProjectRecord> = (0..25).map(|_| record("", "")).collect();
        records.push(record("Alpha", "Desc"));
        let doc = Document::from_records(&records);

        let pages = layout(&doc, PageSize::Letter);
        assert_eq!(pages.len(), 1);
        let (_, height) = PageSize::Letter.dimensions_pt();
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Desc"]);
        for line in &pages[0].lines {
            assert!(line.y >= MARGIN_PT, "line {:?} below margin at {}", line.text, line.y);
            assert!(line.y <= height - MARGIN_PT);
        }
    }

    #[test]
    fn latin1_letters_use_base_widths() {
        assert_eq!(text_width("\u{00E9}", BODY), text_width("e", BODY));
        assert_eq!(text_width("\u{00EF}", BODY), text_width("i", BODY));
        assert_eq!(text_width("\u{00D6}", HEADING), text_width("\u{00D2}", HEADING));
        assert!(text_width("\u{2014}", BODY) > text_width("\u{2013}", BODY));
    }

    #[test]
    fn empty_document_still_has_a_page() {
        let pages = layout(&Document::default(), PageSize::A4);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }
}
