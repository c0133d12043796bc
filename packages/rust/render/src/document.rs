//! Document model: the ordered, styled blocks that make up the project book.

use std::sync::LazyLock;

use regex::Regex;

use projectbook_shared::ProjectRecord;

/// Space after each project title.
pub const TITLE_SPACING_PT: f32 = 12.0;

/// Space after each project description.
pub const RECORD_SPACING_PT: f32 = 20.0;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Builtin PDF fonts used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

/// Font, size, and line height for a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    /// Font size in points.
    pub size: f32,
    /// Baseline-to-baseline distance in points.
    pub leading: f32,
}

/// Project title style.
pub const HEADING: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size: 18.0,
    leading: 22.0,
};

/// Project description style.
pub const BODY: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 10.0,
    leading: 12.0,
};

/// One unit of document flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Body(String),
    /// Vertical gap in points.
    Spacer(f32),
}

impl Block {
    /// Text and style for text blocks; `None` for spacers.
    pub fn text(&self) -> Option<(&str, TextStyle)> {
        match self {
            Block::Heading(text) => Some((text.as_str(), HEADING)),
            Block::Body(text) => Some((text.as_str(), BODY)),
            Block::Spacer(_) => None,
        }
    }
}

/// The full book, in record order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Heading, spacer, body, spacer for each record.
    pub fn from_records(records: &[ProjectRecord]) -> Self {
        let mut blocks = Vec::with_capacity(records.len() * 4);
        for record in records {
            blocks.push(Block::Heading(sanitize(&record.title)));
            blocks.push(Block::Spacer(TITLE_SPACING_PT));
            blocks.push(Block::Body(sanitize(&record.description)));
            blocks.push(Block::Spacer(RECORD_SPACING_PT));
        }
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Text of heading and body blocks in order, for inspection.
    pub fn text_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !matches!(b, Block::Spacer(_)))
    }
}

/// Make text safe for the builtin fonts.
///
/// Collapses whitespace and maps a few typographic marks to ASCII. Latin-1
/// and the WinAnsi punctuation pass through unchanged; anything the builtin
/// fonts cannot encode becomes `?`.
pub fn sanitize(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    collapsed
        .chars()
        .map(|c| match c {
            '\u{00A0}' => ' ',
            '\u{2032}' => '\'',
            '\u{2033}' => '"',
            '\u{2010}'..='\u{2012}' | '\u{2015}' | '\u{2212}' => '-',
            c if is_win_ansi(c) => c,
            _ => '?',
        })
        .collect()
}

/// Whether `c` has a code point in WinAnsiEncoding.
pub fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{00A0}'..='\u{00FF}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// Characters WinAnsi places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, description: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    #[test]
    fn blocks_follow_record_order() {
        let doc = Document::from_records(&[
            record("1", "Alpha", "Desc A"),
            record("2", "Beta", "Desc B"),
        ]);

        assert_eq!(
            doc.blocks(),
            &[
                Block::Heading("Alpha".into()),
                Block::Spacer(TITLE_SPACING_PT),
                Block::Body("Desc A".into()),
                Block::Spacer(RECORD_SPACING_PT),
                Block::Heading("Beta".into()),
                Block::Spacer(TITLE_SPACING_PT),
                Block::Body("Desc B".into()),
                Block::Spacer(RECORD_SPACING_PT),
            ]
        );
    }

    #[test]
    fn sanitize_handles_markup_and_unicode() {
        assert_eq!(sanitize("  A <b>bold</b> &amp; claim \n\n next "), "A <b>bold</b> &amp; claim next");
        assert_eq!(
            sanitize("It\u{2019}s \u{201C}fine\u{201D} \u{2014} ok"),
            "It\u{2019}s \u{201C}fine\u{201D} \u{2014} ok"
        );
        assert_eq!(sanitize("caf\u{00E9} \u{03BB}"), "caf\u{00E9} ?");
        assert_eq!(sanitize("a\u{2011}b \u{2212}1"), "a-b -1");
    }

    #[test]
    fn sanitize_keeps_latin1_and_win_ansi_punctuation() {
        let text = "Caf\u{00E9} na\u{00EF}ve \u{00FC}ber \u{00A3}5 \u{2014} r\u{00E9}sum\u{00E9} \u{20AC}3 \u{2122}";
        assert_eq!(sanitize(text), text);
        assert_eq!(sanitize("Schr\u{00F6}dinger \u{4E2D}\u{6587}"), "Schr\u{00F6}dinger ??");
    }

    #[test]
    fn empty_description_is_kept_as_empty_body() {
        let doc = Document::from_records(&[record("1", "Alpha", "")]);
        assert_eq!(doc.text_blocks().count(), 2);
        assert_eq!(doc.blocks()[2], Block::Body(String::new()));
    }
}
