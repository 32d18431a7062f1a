//! Slide model extraction.

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::deck::parse_deck;
use crate::error::{DeckError, Result};
use crate::model::SlideModel;

/// Extract the slide model of the deck at `path`.
pub fn extract(path: &Path) -> Result<SlideModel> {
    let bytes = std::fs::read(path).map_err(|e| DeckError::extraction(path, e))?;
    extract_bytes(&bytes, path)
}

/// Extract from deck bytes already in memory; `path` is used for errors only.
pub fn extract_bytes(bytes: &[u8], path: &Path) -> Result<SlideModel> {
    let deck = parse_deck(Cursor::new(bytes), path)?;
    let model = SlideModel::from_deck(deck);
    debug!("Extracted {} slide(s) from {}", model.len(), path.display());
    Ok(model)
}
