//! crates/authoring_core/src/assembly/document.rs

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, RunFonts, SpecialIndentType, Start, Style, StyleType,
};

use super::{non_blank, or_default, ordered_sections};
use crate::domain::Project;
use crate::ports::{PortError, PortResult};
use crate::text::{content_lines, is_bullet_line, strip_bullet_marker};

const FONT: &str = "Segoe UI";
const BULLET_NUMBERING_ID: usize = 1;

// Sizes are in half-points.
const TITLE_SIZE: usize = 56;
const HEADING_SIZE: usize = 40;
const TOPIC_SIZE: usize = 26;
const PARAGRAPH_SIZE: usize = 24;
const BULLET_SIZE: usize = 22;

/// One block of a paginated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    Bullet(String),
    /// An empty paragraph used as a separator.
    Blank,
}

/// Lays out a paginated document: title, optional topic line, then one
/// level-2 heading per section followed by its bullets and paragraphs.
pub fn layout_document(project: &Project) -> Vec<DocumentBlock> {
    let mut blocks = vec![DocumentBlock::Heading {
        level: 1,
        text: or_default(&project.title, "Document").to_string(),
    }];

    if let Some(topic) = project.topic.as_deref().and_then(non_blank) {
        blocks.push(DocumentBlock::Paragraph(format!("Topic: {topic}")));
        blocks.push(DocumentBlock::Blank);
    }

    for section in ordered_sections(&project.sections) {
        blocks.push(DocumentBlock::Heading {
            level: 2,
            text: or_default(&section.title, "Section").to_string(),
        });
        for line in content_lines(&section.content) {
            if is_bullet_line(line) {
                blocks.push(DocumentBlock::Bullet(strip_bullet_marker(line).to_string()));
            } else {
                blocks.push(DocumentBlock::Paragraph(line.to_string()));
            }
        }
        blocks.push(DocumentBlock::Blank);
    }

    blocks
}

/// Writes `blocks` as a `.docx` package.
pub fn render_docx(blocks: &[DocumentBlock]) -> PortResult<Vec<u8>> {
    let mut docx = Docx::new()
        .add_style(Style::new("Heading1", StyleType::Paragraph).name("Heading 1").bold())
        .add_style(Style::new("Heading2", StyleType::Paragraph).name("Heading 2").bold())
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("•"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

    for (index, block) in blocks.iter().enumerate() {
        let paragraph = match block {
            DocumentBlock::Heading { level, text } => {
                let size = if *level <= 1 { TITLE_SIZE } else { HEADING_SIZE };
                Paragraph::new()
                    .style(&format!("Heading{level}"))
                    .add_run(styled_run(text, size))
            }
            // The topic line sits directly under the title.
            DocumentBlock::Paragraph(text) if index == 1 => {
                Paragraph::new().add_run(styled_run(text, TOPIC_SIZE))
            }
            DocumentBlock::Paragraph(text) => {
                Paragraph::new().add_run(styled_run(text, PARAGRAPH_SIZE))
            }
            DocumentBlock::Bullet(text) => Paragraph::new()
                .add_run(styled_run(text, BULLET_SIZE))
                .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
            DocumentBlock::Blank => Paragraph::new(),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| PortError::Unexpected(format!("Failed to write docx: {e}")))?;
    Ok(buffer.into_inner())
}

fn styled_run(text: &str, size: usize) -> Run {
    Run::new()
        .add_text(text)
        .size(size)
        .fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT))
}
