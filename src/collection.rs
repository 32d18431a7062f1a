//! Append-only history of loaded and derived artifacts.

use crate::artifact::Artifact;
use crate::error::{DeckError, Result};

/// Artifacts in acquisition order, addressed 1..N. There is no removal, so
/// an index stays valid for the collection's lifetime.
#[derive(Debug, Default)]
pub struct VersionCollection {
    artifacts: Vec<Artifact>,
}

impl VersionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact and return its 1-based index.
    pub fn append(&mut self, artifact: Artifact) -> usize {
        self.artifacts.push(artifact);
        self.artifacts.len()
    }

    pub fn list(&self) -> impl Iterator<Item = (usize, &Artifact)> {
        self.artifacts.iter().enumerate().map(|(idx, a)| (idx + 1, a))
    }

    pub fn get(&self, index: usize) -> Result<&Artifact> {
        index
            .checked_sub(1)
            .and_then(|idx| self.artifacts.get(idx))
            .ok_or(DeckError::Index {
                index,
                len: self.artifacts.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
