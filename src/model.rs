//! Extracted slide/shape text model and its JSON document form.
//!
//! The serialized layout is
//! `{"presentation": [{"slide_number": 1, "shapes": [{"name": .., "content": ..}]}]}`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::deck::{RawDeck, RawShape};
use crate::error::{DeckError, Result};

/// Name used for shapes that expose no name.
pub const UNNAMED_SHAPE: &str = "Unnamed Shape";

/// Content used for shapes without a text frame, or whose text is blank.
pub const NO_TEXT: &str = "<No text>";

/// Synthetic shape address: 1-based slide number and 1-based position of the
/// shape on that slide. Stable for the lifetime of a [`SlideModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    pub slide_number: usize,
    pub position: usize,
}

impl ShapeId {
    pub fn new(slide_number: usize, position: usize) -> Self {
        Self {
            slide_number,
            position,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.slide_number, self.position)
    }
}

impl FromStr for ShapeId {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DeckError::Input(format!("Invalid shape id '{}', expected SLIDE.POSITION", s));
        let (slide, position) = s.trim().split_once('.').ok_or_else(invalid)?;
        let slide_number: usize = slide.parse().map_err(|_| invalid())?;
        let position: usize = position.parse().map_err(|_| invalid())?;
        if slide_number == 0 || position == 0 {
            return Err(invalid());
        }
        Ok(Self::new(slide_number, position))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub content: String,
}

impl Shape {
    fn from_raw(raw: RawShape) -> Self {
        let name = raw.name.unwrap_or_else(|| UNNAMED_SHAPE.to_string());
        let content = raw
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TEXT.to_string());
        Self { name, content }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub slide_number: usize,
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Shapes paired with their synthetic ids, in native order.
    pub fn shapes_with_ids(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        let slide_number = self.slide_number;
        self.shapes
            .iter()
            .enumerate()
            .map(move |(idx, shape)| (ShapeId::new(slide_number, idx + 1), shape))
    }

    /// Number of shapes on this slide carrying `name`.
    pub fn count_named(&self, name: &str) -> usize {
        self.shapes.iter().filter(|s| s.name == name).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideModel {
    #[serde(rename = "presentation")]
    slides: Vec<Slide>,
}

impl SlideModel {
    /// Normalize a raw deck: number slides 1..N and substitute placeholders.
    pub fn from_deck(deck: RawDeck) -> Self {
        let slides = deck
            .slides
            .into_iter()
            .enumerate()
            .map(|(idx, slide)| Slide {
                slide_number: idx + 1,
                shapes: slide.shapes.into_iter().map(Shape::from_raw).collect(),
            })
            .collect();
        Self { slides }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, slide_number: usize) -> Option<&Slide> {
        slide_number
            .checked_sub(1)
            .and_then(|idx| self.slides.get(idx))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.slide(id.slide_number)?
            .shapes
            .get(id.position.checked_sub(1)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON document form. Slide numbers must be exactly 1..N in order.
    #[cfg(test)]
    pub fn from_json(raw: &str) -> Result<Self> {
        let model: SlideModel = serde_json::from_str(raw)?;
        for (idx, slide) in model.slides.iter().enumerate() {
            if slide.slide_number != idx + 1 {
                return Err(DeckError::Input(format!(
                    "slide at position {} is numbered {}",
                    idx + 1,
                    slide.slide_number
                )));
            }
        }
        Ok(model)
    }

    pub fn save_json(&self, output: &Path) -> Result<()> {
        let content = self.to_json_pretty()?;
        std::fs::write(output, content)?;
        Ok(())
    }
}
