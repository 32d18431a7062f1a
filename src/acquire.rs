//! Artifact acquisition from a local path or a remote URL.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::artifact::{Artifact, Origin};
use crate::error::{DeckError, Result};
use crate::service::PresentationService;

/// Accepted deck extension
pub const DECK_EXTENSION: &str = "pptx";

/// A place to load a deck from, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
}

impl Source {
    /// Build a source from an explicit file and/or URL; the file wins when
    /// both are given.
    pub fn from_parts(file: Option<PathBuf>, url: Option<&str>) -> Result<Self> {
        match (file, url) {
            (Some(path), _) => Self::file(path),
            (None, Some(url)) => Self::url(url),
            (None, None) => Err(DeckError::Input(
                "You must provide either a file path or a URL.".to_string(),
            )),
        }
    }

    /// Interpret free-form input: `http(s)://` means URL, anything else a path.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Self::from_parts(None, None);
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::url(input)
        } else {
            Self::file(PathBuf::from(input))
        }
    }

    pub fn file(path: PathBuf) -> Result<Self> {
        let is_deck = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(DECK_EXTENSION))
            .unwrap_or(false);
        if !is_deck {
            return Err(DeckError::Input(format!(
                "Invalid file format: {}. Only .{} files are supported.",
                path.display(),
                DECK_EXTENSION
            )));
        }
        Ok(Source::File(path))
    }

    pub fn url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| DeckError::Input(format!("Invalid URL {}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(Source::Url(url)),
            other => Err(DeckError::Input(format!(
                "Unsupported URL scheme '{}' in {}",
                other, raw
            ))),
        }
    }
}

/// Turns sources into artifacts, downloading remote decks into
/// `download_dir` first.
pub struct Acquirer<S: ?Sized> {
    service: Arc<S>,
    download_dir: PathBuf,
}

impl<S: PresentationService + ?Sized> Acquirer<S> {
    pub fn new(service: Arc<S>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            download_dir: download_dir.into(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn acquire(&self, source: Source) -> Result<Artifact> {
        match source {
            Source::File(path) => {
                if !path.is_file() {
                    return Err(DeckError::FileMissing {
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                        path,
                    });
                }
                info!("Loading presentation {}", path.display());
                Artifact::load(path, Origin::File)
            }
            Source::Url(url) => {
                let origin = Origin::Download {
                    url: url.to_string(),
                };
                self.acquire_url(&url, origin).await
            }
        }
    }

    /// Download `url` in full to a fresh unique file and load it.
    ///
    /// The body is written under a temporary name and only renamed into
    /// place once complete.
    pub async fn acquire_url(&self, url: &Url, origin: Origin) -> Result<Artifact> {
        let bytes = self.service.download(url).await?;

        std::fs::create_dir_all(&self.download_dir)?;
        let stem = format!("presentation_{}", Uuid::new_v4().simple());
        let partial = self.download_dir.join(format!("{}.part", stem));
        let target = self
            .download_dir
            .join(format!("{}.{}", stem, DECK_EXTENSION));

        std::fs::write(&partial, &bytes)?;
        std::fs::rename(&partial, &target)?;
        debug!("Saved {} bytes to {}", bytes.len(), target.display());

        let artifact = Artifact::load(&target, origin)?;
        info!("Download complete! Saved to {}", target.display());
        Ok(artifact)
    }
}
