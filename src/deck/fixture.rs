//! In-memory `.pptx` builder for tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub(crate) const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FixtureShape {
    Text { name: Option<String>, text: String },
    Picture { name: String },
    Group { name: String, members: Vec<(String, String)> },
}

impl FixtureShape {
    pub fn text(name: &str, text: &str) -> Self {
        FixtureShape::Text {
            name: Some(name.to_string()),
            text: text.to_string(),
        }
    }

    pub fn unnamed_text(text: &str) -> Self {
        FixtureShape::Text {
            name: None,
            text: text.to_string(),
        }
    }

    pub fn picture(name: &str) -> Self {
        FixtureShape::Picture {
            name: name.to_string(),
        }
    }

    pub fn group(name: &str, members: &[(&str, &str)]) -> Self {
        FixtureShape::Group {
            name: name.to_string(),
            members: members
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FixtureShape::Text { name, .. } => name.as_deref(),
            FixtureShape::Picture { name } | FixtureShape::Group { name, .. } => Some(name),
        }
    }

    fn write_xml(&self, id: usize, out: &mut String) {
        match self {
            FixtureShape::Text { name, text } => {
                out.push_str("<p:sp><p:nvSpPr>");
                match name {
                    Some(name) => out.push_str(&format!(r#"<p:cNvPr id="{}" name="{}"/>"#, id, escape(name))),
                    None => out.push_str(&format!(r#"<p:cNvPr id="{}"/>"#, id)),
                }
                out.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");
                for line in text.split('\n') {
                    if line.is_empty() {
                        out.push_str("<a:p/>");
                    } else {
                        out.push_str(&format!(
                            r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p>"#,
                            escape(line)
                        ));
                    }
                }
                out.push_str("</p:txBody></p:sp>");
            }
            FixtureShape::Picture { name } => {
                out.push_str(&format!(
                    r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId9"/></p:blipFill><p:spPr/></p:pic>"#,
                    id,
                    escape(name)
                ));
            }
            FixtureShape::Group { name, members } => {
                out.push_str(&format!(
                    r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="{}" name="{}"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
                    id,
                    escape(name)
                ));
                for (offset, (member, text)) in members.iter().enumerate() {
                    FixtureShape::text(member, text).write_xml(id * 100 + offset, out);
                }
                out.push_str("</p:grpSp>");
            }
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn slide_xml(shapes: &[FixtureShape]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
        NAMESPACES
    );
    for (idx, shape) in shapes.iter().enumerate() {
        shape.write_xml(idx + 2, &mut xml);
    }
    xml.push_str("</p:spTree></p:cSld></p:sld>");
    xml
}

/// Build a deck whose presentation order is the slice order.
pub(crate) fn build_pptx(slides: &[Vec<FixtureShape>]) -> Vec<u8> {
    let order: Vec<usize> = (0..slides.len()).collect();
    build_pptx_with_order(slides, &order)
}

/// Build a deck where `slides[i]` is stored as `slide{i+1}.xml` but the
/// presentation lists them in `order`.
pub(crate) fn build_pptx_with_order(slides: &[Vec<FixtureShape>], order: &[usize]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/>"#,
    );
    for idx in 0..slides.len() {
        content_types.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            idx + 1
        ));
    }
    content_types.push_str("</Types>");

    let mut presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><p:presentation {}><p:sldIdLst>"#,
        NAMESPACES
    );
    for (pos, idx) in order.iter().enumerate() {
        presentation.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + pos,
            idx + 10
        ));
    }
    presentation.push_str("</p:sldIdLst></p:presentation>");

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for idx in 0..slides.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            idx + 10,
            idx + 1
        ));
    }
    rels.push_str("</Relationships>");

    let mut parts = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("ppt/presentation.xml".to_string(), presentation),
        ("ppt/_rels/presentation.xml.rels".to_string(), rels),
    ];
    for (idx, shapes) in slides.iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", idx + 1), slide_xml(shapes)));
    }

    for (name, body) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Replace the text of every text shape named `name`, the way a remote
/// editor would.
pub(crate) fn replace_text(slides: &mut [Vec<FixtureShape>], name: &str, content: &str) {
    for shape in slides.iter_mut().flatten() {
        if let FixtureShape::Text { name: Some(n), text } = shape {
            if n == name {
                *text = content.to_string();
            }
        }
    }
}
