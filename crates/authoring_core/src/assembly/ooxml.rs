//! crates/authoring_core/src/assembly/ooxml.rs
//!
//! PresentationML package parts for the slide-deck renderer.
//!
//! The package carries one master, two layouts (title, title-and-content) and
//! a theme. Slides reference layout 1 or 2 and inherit all geometry from them.

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(super) const TITLE_LAYOUT: usize = 1;
pub(super) const CONTENT_LAYOUT: usize = 2;

pub(super) const FONT: &str = "Segoe UI";

/// Escapes text for use inside XML element content and attributes.
pub(super) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters other than tab/newline are not valid XML 1.0.
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

pub(super) fn content_types(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{slides}</Types>"#
    )
}

pub(super) fn package_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
    )
}

/// `rId1` is the master, `rId2` the theme, slides start at `rId3`.
pub(super) fn presentation(slide_count: usize) -> String {
    let slide_ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 3 + i))
        .collect();
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

pub(super) fn presentation_rels(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{}" Type="{REL_BASE}/slide" Target="slides/slide{n}.xml"/>"#,
                n + 2
            )
        })
        .collect();
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/theme" Target="theme/theme1.xml"/>{slides}</Relationships>"#
    )
}

pub(super) fn slide_rels(layout: usize) -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout{layout}.xml"/></Relationships>"#
    )
}

pub(super) fn slide_master() -> String {
    let tree = shape_tree(&[
        placeholder_shape(2, "Title Placeholder 1", r#"type="title""#, Some((457200, 274638, 8229600, 1143000)), &[empty_paragraph()]),
        placeholder_shape(3, "Text Placeholder 2", r#"type="body" idx="1""#, Some((457200, 1600200, 8229600, 4525963)), &[empty_paragraph()]),
    ]);
    let level = |size: u32| {
        format!(
            r#"<a:lvl1pPr><a:defRPr sz="{size}"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>"#
        )
    };
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{tree}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle>{}</p:titleStyle><p:bodyStyle>{}</p:bodyStyle><p:otherStyle>{}</p:otherStyle></p:txStyles></p:sldMaster>"#,
        level(4400),
        level(2400),
        level(1800)
    )
}

pub(super) fn slide_master_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout2.xml"/><Relationship Id="rId3" Type="{REL_BASE}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

pub(super) fn slide_layout(layout: usize) -> String {
    let (kind, name, shapes) = if layout == TITLE_LAYOUT {
        (
            "title",
            "Title Slide",
            vec![
                placeholder_shape(2, "Title 1", r#"type="ctrTitle""#, Some((685800, 2130425, 7772400, 1470025)), &[empty_paragraph()]),
                placeholder_shape(3, "Subtitle 2", r#"type="subTitle" idx="1""#, Some((1371600, 3886200, 6400800, 1752600)), &[empty_paragraph()]),
            ],
        )
    } else {
        (
            "obj",
            "Title and Content",
            vec![
                placeholder_shape(2, "Title 1", r#"type="title""#, None, &[empty_paragraph()]),
                placeholder_shape(3, "Content Placeholder 2", r#"idx="1""#, None, &[empty_paragraph()]),
            ],
        )
    };
    let tree = shape_tree(&shapes);
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="{kind}" preserve="1"><p:cSld name="{name}">{tree}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

pub(super) fn slide_layout_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

/// A slide made of already-built shapes.
pub(super) fn slide(shapes: &[String]) -> String {
    let tree = shape_tree(shapes);
    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld>{tree}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

/// A placeholder shape. `ph_attrs` are the raw attributes of `<p:ph>`;
/// `frame` is `(x, y, cx, cy)` in EMU, omitted to inherit geometry.
pub(super) fn placeholder_shape(
    id: u32,
    name: &str,
    ph_attrs: &str,
    frame: Option<(i64, i64, i64, i64)>,
    paragraphs: &[String],
) -> String {
    let sp_pr = match frame {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>"#
        ),
        None => "<p:spPr/>".to_string(),
    };
    let body: String = if paragraphs.is_empty() {
        empty_paragraph()
    } else {
        paragraphs.concat()
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr>{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#,
        escape_xml(name)
    )
}

/// A single-run paragraph at outline level 0. `size` is in hundredths of a point.
pub(super) fn text_paragraph(text: &str, size: Option<u32>) -> String {
    let size_attr = size.map(|s| format!(r#" sz="{s}""#)).unwrap_or_default();
    format!(
        r#"<a:p><a:pPr lvl="0"/><a:r><a:rPr lang="en-US"{size_attr} dirty="0"><a:latin typeface="{FONT}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        escape_xml(text)
    )
}

pub(super) fn empty_paragraph() -> String {
    r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
}

fn shape_tree(shapes: &[String]) -> String {
    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree>"#,
        shapes.concat()
    )
}

pub(super) fn theme() -> String {
    let accents = ["4F81BD", "C0504D", "9BBB59", "8064A2", "4BACC6", "F79646"]
        .iter()
        .enumerate()
        .map(|(i, rgb)| format!(r#"<a:accent{n}><a:srgbClr val="{rgb}"/></a:accent{n}>"#, n = i + 1))
        .collect::<String>();
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = format!(r#"<a:ln w="9525">{fill}</a:ln>"#);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let font = format!(r#"<a:latin typeface="{FONT}"/><a:ea typeface=""/><a:cs typeface=""/>"#);
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2>{accents}<a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"R&D <"core"> it's"#),
            "R&amp;D &lt;&quot;core&quot;&gt; it&apos;s"
        );
        assert_eq!(escape_xml("bell\u{7}"), "bell");
    }

    #[test]
    fn presentation_lists_every_slide() {
        let xml = presentation(3);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));
        let rels = presentation_rels(3);
        assert!(rels.contains(r#"Id="rId5""#));
        assert!(rels.contains("slides/slide3.xml"));
    }
}
