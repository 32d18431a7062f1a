//! Artifacts: one immutable version of a deck plus its extracted model.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{DeckError, Result};
use crate::extract::extract;
use crate::model::SlideModel;

/// Where an artifact came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Local file supplied by the user
    File,
    /// Downloaded from a URL supplied by the user
    Download { url: String },
    /// Result of a remote edit of another artifact
    Edit { parent: PathBuf, url: String },
    /// Result of a generation task
    Generated { task_id: String, url: String },
}

impl Origin {
    /// Remote location the deck was fetched from, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Origin::File => None,
            Origin::Download { url } | Origin::Edit { url, .. } | Origin::Generated { url, .. } => {
                Some(url.as_str())
            }
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File => write!(f, "local file"),
            Origin::Download { url } => write!(f, "downloaded from {}", url),
            Origin::Edit { parent, .. } => write!(f, "edit of {}", parent.display()),
            Origin::Generated { task_id, .. } => write!(f, "generated by task {}", task_id),
        }
    }
}

/// One version of a deck. Built only once extraction has succeeded, and
/// never modified afterwards.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
    origin: Origin,
    digest: String,
    acquired_at: DateTime<Utc>,
    model: SlideModel,
}

impl Artifact {
    /// Read the deck at `path` and extract its model.
    pub fn load(path: impl Into<PathBuf>, origin: Origin) -> Result<Self> {
        let path = path.into();
        let model = extract(&path)?;
        let digest = file_digest(&path).map_err(|e| DeckError::extraction(&path, e))?;

        Ok(Self {
            digest,
            path,
            origin,
            acquired_at: Utc::now(),
            model,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// SHA-256 of the deck bytes at load time (hex).
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    pub fn model(&self) -> &SlideModel {
        &self.model
    }

    /// File name used when uploading this artifact.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "presentation.pptx".to_string())
    }

    /// Default JSON export path: the deck path with a `.json` extension.
    pub fn default_json_path(&self) -> PathBuf {
        self.path.with_extension("json")
    }

    /// Write the model's JSON document, returning the path written.
    pub fn save_json(&self, output: Option<&Path>) -> Result<PathBuf> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_json_path());
        self.model.save_json(&output)?;
        Ok(output)
    }
}

fn file_digest(path: &Path) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(&mut File::open(path)?, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
