//! Block model → `.docx` bytes.
//!
//! Each block becomes one native Word paragraph: headings use the built-in
//! `Heading1`–`Heading3` style ids, bullets reference a single-level bullet
//! numbering, and blank lines become empty paragraphs so vertical spacing
//! survives the round trip into Word.

use super::blocks::{DocumentBlock, HeadingLevel};
use crate::error::ExtractorError;
use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start, Style, StyleType,
};
use std::io::Cursor;
use tracing::debug;

const BULLET_NUMBERING_ID: usize = 1;

// Half-point sizes, matching Word's default heading ramp.
const HEADING_STYLES: [(&str, &str, usize); 3] = [
    ("Heading1", "Heading 1", 32),
    ("Heading2", "Heading 2", 26),
    ("Heading3", "Heading 3", 24),
];

fn style_id(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "Heading1",
        HeadingLevel::H2 => "Heading2",
        HeadingLevel::H3 => "Heading3",
    }
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn heading(level: HeadingLevel, text: &str) -> Paragraph {
    text_paragraph(text).style(style_id(level))
}

fn to_paragraph(block: &DocumentBlock) -> Paragraph {
    match block {
        DocumentBlock::Heading { level, text } => heading(*level, text),
        DocumentBlock::BulletItem { text } => text_paragraph(text).numbering(
            NumberingId::new(BULLET_NUMBERING_ID),
            IndentLevel::new(0),
        ),
        DocumentBlock::Paragraph { runs } => runs
            .iter()
            .fold(Paragraph::new(), |p, r| p.add_run(Run::new().add_text(&r.text))),
        DocumentBlock::Blank => Paragraph::new(),
    }
}

fn base_document() -> Docx {
    let mut docx = Docx::new();
    for (id, name, size) in HEADING_STYLES {
        docx = docx.add_style(
            Style::new(id, StyleType::Paragraph)
                .name(name)
                .size(size)
                .bold(),
        );
    }

    docx.add_abstract_numbering(
        AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("•"),
            LevelJc::new("left"),
        )),
    )
    .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

/// Package `blocks` as a `.docx` file under a Heading-1 `title`.
///
/// The output always holds `blocks.len() + 1` body paragraphs.
pub fn serialize(blocks: &[DocumentBlock], title: &str) -> Result<Vec<u8>, ExtractorError> {
    let docx = blocks
        .iter()
        .fold(base_document().add_paragraph(heading(HeadingLevel::H1, title)), |d, b| {
            d.add_paragraph(to_paragraph(b))
        });

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExtractorError::ExportFailed {
            detail: e.to_string(),
        })?;

    let bytes = cursor.into_inner();
    debug!("Packed {} blocks into {} bytes of docx", blocks.len(), bytes.len());
    Ok(bytes)
}
