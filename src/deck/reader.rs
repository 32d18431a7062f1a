use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{DeckError, Result};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Element names that form a shape when they are direct children of `spTree`.
const SHAPE_ELEMENTS: &[&[u8]] = &[b"sp", b"pic", b"graphicFrame", b"grpSp", b"cxnSp"];

/// Deck as read from the container, before any placeholder substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDeck {
    pub slides: Vec<RawSlide>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSlide {
    pub shapes: Vec<RawShape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawShape {
    /// `name` attribute of the shape's non-visual properties, if present.
    pub name: Option<String>,
    /// Paragraph text of the shape's own text frame. `None` when the shape
    /// has no text frame.
    pub text: Option<String>,
}

/// Parse a deck container. `path` is only used for error context.
pub fn parse_deck<R: Read + Seek>(reader: R, path: &Path) -> Result<RawDeck> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| DeckError::extraction(path, format!("not a pptx container: {}", e)))?;

    let presentation = read_part(&mut archive, PRESENTATION_PART, path)?;
    let rels = read_part(&mut archive, PRESENTATION_RELS_PART, path)?;

    let slide_rids = slide_relationship_ids(&presentation)
        .map_err(|e| DeckError::extraction(path, format!("{}: {}", PRESENTATION_PART, e)))?;
    let targets = relationship_targets(&rels)
        .map_err(|e| DeckError::extraction(path, format!("{}: {}", PRESENTATION_RELS_PART, e)))?;

    let mut slides = Vec::with_capacity(slide_rids.len());
    for rid in &slide_rids {
        let target = targets.get(rid).ok_or_else(|| {
            DeckError::extraction(path, format!("slide relationship {} has no target", rid))
        })?;
        let part_name = resolve_target("ppt", target);
        let xml = read_part(&mut archive, &part_name, path)?;
        let shapes = slide_shapes(&xml)
            .map_err(|e| DeckError::extraction(path, format!("{}: {}", part_name, e)))?;
        debug!("{}: {} shape(s)", part_name, shapes.len());
        slides.push(RawSlide { shapes });
    }

    Ok(RawDeck { slides })
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str, path: &Path) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| DeckError::extraction(path, format!("missing part {}: {}", name, e)))?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| DeckError::extraction(path, format!("unreadable part {}: {}", name, e)))?;
    Ok(bytes)
}

/// Resolve a relationship target relative to the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn attribute(e: &BytesStart<'_>, local: &[u8], prefixed: bool) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key;
        if key.local_name().as_ref() != local || key.prefix().is_some() != prefixed {
            return None;
        }
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        Some(unescape(&raw).map(|v| v.into_owned()).unwrap_or(raw))
    })
}

/// Relationship ids of `p:sldIdLst/p:sldId`, in presentation order.
fn slide_relationship_ids(xml: &[u8]) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(rid) = attribute(&e, b"id", true) {
                    ids.push(rid);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

fn relationship_targets(xml: &[u8]) -> std::result::Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) =
                    (attribute(&e, b"Id", false), attribute(&e, b"Target", false))
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// Shape being scanned; `depth` is the nesting depth of its own element.
struct ShapeScan {
    depth: usize,
    /// Set by the shape's own `cNvPr`, the first one inside it.
    name_seen: bool,
    name: Option<String>,
    paragraphs: Option<Vec<String>>,
    in_text: bool,
}

impl ShapeScan {
    fn push_text(&mut self, text: &str) {
        if !self.in_text {
            return;
        }
        if let Some(paragraphs) = self.paragraphs.as_mut() {
            match paragraphs.last_mut() {
                Some(last) => last.push_str(text),
                None => paragraphs.push(text.to_string()),
            }
        }
    }

    fn finish(self) -> RawShape {
        RawShape {
            name: self.name,
            text: self.paragraphs.map(|p| p.join("\n")),
        }
    }
}

#[derive(Default)]
struct SlideScan {
    depth: usize,
    tree_depth: Option<usize>,
    tree_done: bool,
    current: Option<ShapeScan>,
    shapes: Vec<RawShape>,
}

impl SlideScan {
    fn open(&mut self, e: &BytesStart<'_>) {
        self.depth += 1;
        let local = e.local_name();
        let local = local.as_ref();

        let Some(tree_depth) = self.tree_depth else {
            if local == b"spTree" && !self.tree_done {
                self.tree_depth = Some(self.depth);
            }
            return;
        };

        let Some(shape) = self.current.as_mut() else {
            if self.depth == tree_depth + 1 && SHAPE_ELEMENTS.iter().any(|s| *s == local) {
                self.current = Some(ShapeScan {
                    depth: self.depth,
                    name_seen: false,
                    name: None,
                    paragraphs: None,
                    in_text: false,
                });
            }
            return;
        };

        match local {
            // The first cNvPr inside a shape belongs to the shape itself;
            // later ones belong to group members.
            b"cNvPr" if !shape.name_seen => {
                shape.name_seen = true;
                shape.name = attribute(e, b"name", false).filter(|n| !n.is_empty());
            }
            b"txBody" if self.depth == shape.depth + 1 => {
                shape.paragraphs = Some(Vec::new());
            }
            b"p" if shape.paragraphs.is_some() && self.depth > shape.depth + 1 => {
                if let Some(paragraphs) = shape.paragraphs.as_mut() {
                    paragraphs.push(String::new());
                }
            }
            b"t" => shape.in_text = true,
            // Soft line break; reads the same as a paragraph break.
            b"br" => {
                shape.in_text = true;
                shape.push_text("\n");
                shape.in_text = false;
            }
            _ => {}
        }
    }

    fn close(&mut self, local: &[u8]) {
        if let Some(shape) = self.current.as_mut() {
            if local == b"t" {
                shape.in_text = false;
            }
            if shape.depth == self.depth {
                if let Some(done) = self.current.take() {
                    self.shapes.push(done.finish());
                }
            }
        } else if self.tree_depth == Some(self.depth) {
            self.tree_depth = None;
            self.tree_done = true;
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        if let Some(shape) = self.current.as_mut() {
            shape.push_text(text);
        }
    }
}

/// Top-level shapes of a slide's shape tree, in document order.
fn slide_shapes(xml: &[u8]) -> std::result::Result<Vec<RawShape>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut scan = SlideScan::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => scan.open(&e),
            Event::Empty(e) => {
                scan.open(&e);
                scan.close(e.local_name().as_ref());
            }
            Event::End(e) => scan.close(e.local_name().as_ref()),
            Event::Text(e) => scan.text(&String::from_utf8_lossy(&e)),
            Event::CData(e) => scan.text(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(r) => {
                if let Ok(Some(ch)) = r.resolve_char_ref() {
                    scan.text(ch.encode_utf8(&mut [0u8; 4]));
                } else if let Some(resolved) =
                    resolve_predefined_entity(&String::from_utf8_lossy(&r))
                {
                    scan.text(resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scan.shapes)
}
