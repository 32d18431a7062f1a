use tracing::warn;

use crate::api::{EditConfig, Replacement};
use crate::error::{DeckError, Result};
use crate::model::{ShapeId, Slide, SlideModel};

/// Characters of content shown next to a shape name in choice labels.
const LABEL_PREVIEW_CHARS: usize = 10;

/// A shape offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeChoice {
    pub id: ShapeId,
    pub name: String,
    /// `"<name> (<first characters of content>)"`
    pub label: String,
}

/// One queued replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEntry {
    pub target: ShapeId,
    pub replacement: Replacement,
    /// Another shape on the same slide has the same name. The edit service
    /// addresses shapes by name, so which of them changes is up to it.
    pub ambiguous: bool,
}

/// Replacements collected for one edit of one artifact. Consumed by value
/// when submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementRequest {
    entries: Vec<ReplacementEntry>,
}

impl ReplacementRequest {
    pub fn entries(&self) -> &[ReplacementEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_ambiguous_targets(&self) -> bool {
        self.entries.iter().any(|e| e.ambiguous)
    }

    /// Wire form: names only, in the order the replacements were added.
    pub fn into_config(self) -> EditConfig {
        EditConfig {
            replacements: self.entries.into_iter().map(|e| e.replacement).collect(),
        }
    }
}

/// Builds a [`ReplacementRequest`] against one artifact's model.
pub struct EditSession<'a> {
    model: &'a SlideModel,
    request: ReplacementRequest,
}

impl<'a> EditSession<'a> {
    pub fn new(model: &'a SlideModel) -> Self {
        Self {
            model,
            request: ReplacementRequest::default(),
        }
    }

    pub fn slide(&self, slide_number: usize) -> Result<&'a Slide> {
        self.model.slide(slide_number).ok_or_else(|| {
            DeckError::Input(format!(
                "Slide {} does not exist (deck has {} slide(s))",
                slide_number,
                self.model.len()
            ))
        })
    }

    /// Shapes of a slide as selectable choices.
    pub fn shape_choices(&self, slide_number: usize) -> Result<Vec<ShapeChoice>> {
        let slide = self.slide(slide_number)?;
        Ok(slide
            .shapes_with_ids()
            .map(|(id, shape)| {
                let preview: String = shape.content.chars().take(LABEL_PREVIEW_CHARS).collect();
                ShapeChoice {
                    id,
                    name: shape.name.clone(),
                    label: format!("{} ({})", shape.name, preview),
                }
            })
            .collect())
    }

    /// Queue new content for the shape at `id`.
    pub fn replace(&mut self, id: ShapeId, content: impl Into<String>) -> Result<&ReplacementEntry> {
        let slide = self.slide(id.slide_number)?;
        let shape = self
            .model
            .shape(id)
            .ok_or_else(|| DeckError::Input(format!("Shape {} does not exist", id)))?;

        let ambiguous = slide.count_named(&shape.name) > 1;
        if ambiguous {
            warn!(
                "Shape name '{}' is used more than once on slide {}; the edit service decides which shape changes",
                shape.name, id.slide_number
            );
        }

        self.request.entries.push(ReplacementEntry {
            target: id,
            replacement: Replacement {
                shape_name: shape.name.clone(),
                content: content.into(),
            },
            ambiguous,
        });
        Ok(&self.request.entries[self.request.entries.len() - 1])
    }

    /// Queue new content for the first shape on `slide_number` called `name`.
    pub fn replace_by_name(
        &mut self,
        slide_number: usize,
        name: &str,
        content: impl Into<String>,
    ) -> Result<&ReplacementEntry> {
        let slide = self.slide(slide_number)?;
        let (id, _) = slide
            .shapes_with_ids()
            .find(|(_, shape)| shape.name == name)
            .ok_or_else(|| {
                DeckError::Input(format!(
                    "Slide {} has no shape named '{}'",
                    slide_number, name
                ))
            })?;
        self.replace(id, content)
    }

    #[cfg(test)]
    pub fn request(&self) -> &ReplacementRequest {
        &self.request
    }

    pub fn finish(self) -> ReplacementRequest {
        self.request
    }
}
