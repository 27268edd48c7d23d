//! Markdown → flat block model.
//!
//! One line in, one block out. There is no nesting and no inline styling:
//! the classifier looks only at a line's prefix, testing the longer heading
//! markers first so `## ` is never read as a level-1 heading.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Heading depth supported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric level (1–3).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// A plain text fragment inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBlock {
    Heading { level: HeadingLevel, text: String },
    BulletItem { text: String },
    Paragraph { runs: Vec<TextRun> },
    /// An intentional empty line, kept as vertical space.
    Blank,
}

impl DocumentBlock {
    /// Plain text of the block, without markdown markers.
    pub fn text(&self) -> String {
        match self {
            DocumentBlock::Heading { text, .. } | DocumentBlock::BulletItem { text } => {
                text.clone()
            }
            DocumentBlock::Paragraph { runs } => runs.iter().map(|r| r.text.as_str()).collect(),
            DocumentBlock::Blank => String::new(),
        }
    }
}

// Longest marker first.
const HEADING_MARKERS: [(&str, HeadingLevel); 3] = [
    ("### ", HeadingLevel::H3),
    ("## ", HeadingLevel::H2),
    ("# ", HeadingLevel::H1),
];

const BULLET_MARKERS: [&str; 2] = ["- ", "* "];

/// Classify a single line (without its line terminator).
pub fn classify_line(line: &str) -> DocumentBlock {
    for (marker, level) in HEADING_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return DocumentBlock::Heading {
                level,
                text: rest.to_string(),
            };
        }
    }

    for marker in BULLET_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return DocumentBlock::BulletItem {
                text: rest.to_string(),
            };
        }
    }

    if line.trim().is_empty() {
        DocumentBlock::Blank
    } else {
        DocumentBlock::Paragraph {
            runs: vec![TextRun::new(line)],
        }
    }
}

/// Split `markdown` into lines and classify each one, in order.
///
/// Lines are separated by `\n`; a `\r` left at the end of a line is dropped
/// so CRLF input counts each break once. The result always holds exactly one
/// block per line: an empty string is one blank line and a trailing newline
/// contributes a trailing blank block.
pub fn build_document(markdown: &str) -> Vec<DocumentBlock> {
    let blocks: Vec<DocumentBlock> = markdown
        .split('\n')
        .map(|line| classify_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect();

    debug!(
        "Classified {} lines ({} headings, {} bullets)",
        blocks.len(),
        blocks
            .iter()
            .filter(|b| matches!(b, DocumentBlock::Heading { .. }))
            .count(),
        blocks
            .iter()
            .filter(|b| matches!(b, DocumentBlock::BulletItem { .. }))
            .count(),
    );

    blocks
}
