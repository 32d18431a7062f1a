use tracing::info;

use super::builder::ReplacementRequest;
use crate::acquire::Acquirer;
use crate::artifact::{Artifact, Origin};
use crate::error::{DeckError, Result};
use crate::service::PresentationService;

/// Submits replacements for an artifact and acquires the edited result.
pub struct EditInvoker<'a, S: ?Sized> {
    acquirer: &'a Acquirer<S>,
}

impl<'a, S: PresentationService + ?Sized> EditInvoker<'a, S> {
    pub fn new(acquirer: &'a Acquirer<S>) -> Self {
        Self { acquirer }
    }

    /// Apply `request` to `artifact` remotely.
    ///
    /// One request, no retry. The original artifact is left untouched; the
    /// returned artifact is a new version for the caller to append.
    pub async fn apply(&self, artifact: &Artifact, request: ReplacementRequest) -> Result<Artifact> {
        if request.is_empty() {
            return Err(DeckError::Input("No replacements to apply.".to_string()));
        }

        let deck = std::fs::read(artifact.path()).map_err(|source| DeckError::FileMissing {
            path: artifact.path().to_path_buf(),
            source,
        })?;

        let config = request.into_config();
        info!(
            "Sending {} edit(s) for {}",
            config.replacements.len(),
            artifact.path().display()
        );

        let result_url = self
            .acquirer
            .service()
            .edit(&artifact.file_name(), deck, &config)
            .await?;
        info!("Edits applied; new presentation at {}", result_url);

        let origin = Origin::Edit {
            parent: artifact.path().to_path_buf(),
            url: result_url.to_string(),
        };
        self.acquirer.acquire_url(&result_url, origin).await
    }
}
