//! crates/authoring_core/src/assembly/mod.rs
//!
//! Turns a project and its sections into an Office document.
//!
//! Assembly runs in two passes. The layout pass (`layout_document`,
//! `layout_deck`) decides structure: heading levels, bullet versus paragraph,
//! one slide per section. The render pass writes that structure into an OOXML
//! package. Both are pure; identical input gives identical layout.

mod deck;
mod document;
mod ooxml;

pub use deck::{layout_deck, render_pptx, Slide, SlideKind};
pub use document::{layout_document, render_docx, DocumentBlock};

use crate::domain::{DocType, Project, Section};
use crate::ports::PortResult;

/// A rendered export ready to be streamed to the client.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub doc_type: DocType,
    pub bytes: Vec<u8>,
}

/// Renders `project` in the requested format.
pub fn assemble(project: &Project, doc_type: DocType) -> PortResult<ExportArtifact> {
    let bytes = match doc_type {
        DocType::Docx => render_docx(&layout_document(project))?,
        DocType::Pptx => render_pptx(&layout_deck(project))?,
    };
    Ok(ExportArtifact {
        file_name: format!("project_{}.{}", project.id, doc_type.extension()),
        media_type: doc_type.media_type(),
        doc_type,
        bytes,
    })
}

/// Sections sorted by `order`; equal orders keep their input order.
pub fn ordered_sections(sections: &[Section]) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| s.order);
    ordered
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    non_blank(value).unwrap_or(fallback)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::{DocType, Project, Section};

    pub fn section(title: &str, order: i32, content: &str) -> Section {
        Section {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            title: title.to_string(),
            content: content.to_string(),
            order,
            likes: 0,
            dislikes: 0,
            refinement_history: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn project(doc_type: DocType, topic: Option<&str>, sections: Vec<Section>) -> Project {
        Project {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Q1 Report".to_string(),
            topic: topic.map(str::to_string),
            doc_type,
            sections,
            created_at: Utc::now(),
        }
    }

    pub fn read_part(bytes: &[u8], name: &str) -> String {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{project, section};
    use super::*;

    #[test]
    fn ordering_is_stable_for_ties() {
        let sections = vec![
            section("c", 2, ""),
            section("a1", 1, ""),
            section("b", 5, ""),
            section("a2", 1, ""),
            section("z", -1, ""),
        ];
        let titles: Vec<_> = ordered_sections(&sections)
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["z", "a1", "a2", "c", "b"]);
    }

    #[test]
    fn artifact_metadata_follows_the_resolved_format() {
        let p = project(DocType::Docx, None, vec![section("Intro", 0, "Hello")]);
        let docx = assemble(&p, DocType::Docx).unwrap();
        let pptx = assemble(&p, DocType::Pptx).unwrap();

        assert_eq!(docx.file_name, format!("project_{}.docx", p.id));
        assert_eq!(pptx.file_name, format!("project_{}.pptx", p.id));
        assert_eq!(pptx.media_type, DocType::Pptx.media_type());
        // Both are zip packages.
        assert_eq!(&docx.bytes[..2], b"PK");
        assert_eq!(&pptx.bytes[..2], b"PK");
    }
}
