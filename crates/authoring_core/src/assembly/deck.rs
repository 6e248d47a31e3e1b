//! crates/authoring_core/src/assembly/deck.rs

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ooxml;
use super::{non_blank, or_default, ordered_sections};
use crate::domain::Project;
use crate::ports::{PortError, PortResult};
use crate::text::content_lines;

/// Body text size in hundredths of a point.
const BODY_SIZE: u32 = 2400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Title,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub kind: SlideKind,
    pub title: String,
    pub subtitle: Option<String>,
    /// One paragraph per non-empty content line, all at the same level.
    pub body: Vec<String>,
}

/// Lays out a deck: one title slide, then exactly one slide per section.
///
/// Long content is never split across slides.
pub fn layout_deck(project: &Project) -> Vec<Slide> {
    let mut slides = vec![Slide {
        kind: SlideKind::Title,
        title: or_default(&project.title, "Untitled Presentation").to_string(),
        subtitle: project
            .topic
            .as_deref()
            .and_then(non_blank)
            .map(|topic| format!("Topic: {topic}")),
        body: Vec::new(),
    }];

    slides.extend(ordered_sections(&project.sections).into_iter().map(|section| Slide {
        kind: SlideKind::Content,
        title: or_default(&section.title, "Slide").to_string(),
        subtitle: None,
        body: content_lines(&section.content).map(str::to_string).collect(),
    }));

    slides
}

/// Writes `slides` as a `.pptx` package.
pub fn render_pptx(slides: &[Slide]) -> PortResult<Vec<u8>> {
    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), ooxml::content_types(slides.len())),
        ("_rels/.rels".to_string(), ooxml::package_rels()),
        ("ppt/presentation.xml".to_string(), ooxml::presentation(slides.len())),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            ooxml::presentation_rels(slides.len()),
        ),
        ("ppt/slideMasters/slideMaster1.xml".to_string(), ooxml::slide_master()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            ooxml::slide_master_rels(),
        ),
        ("ppt/theme/theme1.xml".to_string(), ooxml::theme()),
    ];
    for layout in [ooxml::TITLE_LAYOUT, ooxml::CONTENT_LAYOUT] {
        parts.push((
            format!("ppt/slideLayouts/slideLayout{layout}.xml"),
            ooxml::slide_layout(layout),
        ));
        parts.push((
            format!("ppt/slideLayouts/_rels/slideLayout{layout}.xml.rels"),
            ooxml::slide_layout_rels(),
        ));
    }
    for (index, slide) in slides.iter().enumerate() {
        let number = index + 1;
        let layout = match slide.kind {
            SlideKind::Title => ooxml::TITLE_LAYOUT,
            SlideKind::Content => ooxml::CONTENT_LAYOUT,
        };
        parts.push((format!("ppt/slides/slide{number}.xml"), slide_xml(slide)));
        parts.push((
            format!("ppt/slides/_rels/slide{number}.xml.rels"),
            ooxml::slide_rels(layout),
        ));
    }

    write_package(&parts)
}

fn slide_xml(slide: &Slide) -> String {
    let title = [ooxml::text_paragraph(&slide.title, None)];
    let shapes = match slide.kind {
        SlideKind::Title => {
            let mut shapes = vec![ooxml::placeholder_shape(2, "Title 1", r#"type="ctrTitle""#, None, &title)];
            if let Some(subtitle) = &slide.subtitle {
                shapes.push(ooxml::placeholder_shape(
                    3,
                    "Subtitle 2",
                    r#"type="subTitle" idx="1""#,
                    None,
                    &[ooxml::text_paragraph(subtitle, None)],
                ));
            }
            shapes
        }
        SlideKind::Content => {
            let body: Vec<String> = slide
                .body
                .iter()
                .map(|line| ooxml::text_paragraph(line, Some(BODY_SIZE)))
                .collect();
            vec![
                ooxml::placeholder_shape(2, "Title 1", r#"type="title""#, None, &title),
                ooxml::placeholder_shape(3, "Content Placeholder 2", r#"idx="1""#, None, &body),
            ]
        }
    };
    ooxml::slide(&shapes)
}

fn write_package(parts: &[(String, String)]) -> PortResult<Vec<u8>> {
    let to_port_error = |e: zip::result::ZipError| PortError::Unexpected(format!("Failed to write pptx: {e}"));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, xml) in parts {
        writer.start_file(name.as_str(), options).map_err(to_port_error)?;
        writer
            .write_all(xml.as_bytes())
            .map_err(|e| PortError::Unexpected(format!("Failed to write pptx: {e}")))?;
    }
    let cursor = writer.finish().map_err(to_port_error)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{project, read_part, section};
    use super::*;
    use crate::domain::DocType;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_title_slide_then_one_slide_per_section() {
        let long = (1..=40).map(|i| format!("- point {i}")).collect::<Vec<_>>().join("\n");
        let p = project(
            DocType::Pptx,
            Some("Markets"),
            vec![section("Later", 3, &long), section("First", 1, "a\n\n  b  ")],
        );

        let slides = layout_deck(&p);
        assert_eq!(slides.len(), 3);
        assert_eq!(
            slides[0],
            Slide {
                kind: SlideKind::Title,
                title: "Q1 Report".to_string(),
                subtitle: Some("Topic: Markets".to_string()),
                body: Vec::new(),
            }
        );
        assert_eq!(
            slides[1],
            Slide {
                kind: SlideKind::Content,
                title: "First".to_string(),
                subtitle: None,
                body: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(slides[2].title, "Later");
        assert_eq!(slides[2].body.len(), 40);
        assert_eq!(slides[2].body[0], "- point 1");
    }

    #[test]
    fn blank_titles_get_defaults() {
        let mut p = project(DocType::Pptx, None, vec![section(" ", 0, "")]);
        p.title = String::new();

        let slides = layout_deck(&p);
        assert_eq!(slides[0].title, "Untitled Presentation");
        assert_eq!(slides[0].subtitle, None);
        assert_eq!(slides[1].title, "Slide");
        assert!(slides[1].body.is_empty());
    }

    #[test]
    fn rendered_deck_has_one_part_per_slide() {
        let p = project(
            DocType::Pptx,
            Some("R&D"),
            vec![section("Intro", 0, "Hello\nWorld"), section("Close", 1, "Bye")],
        );
        let bytes = render_pptx(&layout_deck(&p)).unwrap();

        let title = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(title.contains("Topic: R&amp;D"));
        assert!(title.contains(r#"type="subTitle""#));

        let intro = read_part(&bytes, "ppt/slides/slide2.xml");
        let hello = intro.find("<a:t>Hello</a:t>").unwrap();
        let world = intro.find("<a:t>World</a:t>").unwrap();
        assert!(hello < world);
        assert!(intro.contains(r#"sz="2400""#));

        assert!(read_part(&bytes, "ppt/slides/slide3.xml").contains("<a:t>Close</a:t>"));
        let rels = read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains("slideLayout2.xml"));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("/ppt/slides/slide3.xml"));
    }
}
