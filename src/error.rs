//! Error taxonomy for deck acquisition, extraction and remote editing.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse grouping of failures, used by the front-end to tell the user
/// whose fault a failure was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input from the user (path, URL, index, missing key).
    InvalidInput,
    /// Local deck or filesystem problem.
    Local,
    /// The remote service could not be reached at all.
    Unreachable,
    /// The remote service answered, but refused or failed the request.
    Rejected,
    /// A remote task did not finish in the allowed number of polls.
    Incomplete,
}

impl ErrorCategory {
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "local input was invalid",
            ErrorCategory::Local => "local file could not be processed",
            ErrorCategory::Unreachable => "could not reach remote service",
            ErrorCategory::Rejected => "remote service rejected the request",
            ErrorCategory::Incomplete => "remote task did not complete in time",
        }
    }
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("{0}")]
    Input(String),

    #[error("failed to download {url}: HTTP {status}")]
    Acquisition { url: String, status: u16 },

    #[error("failed to read deck {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("file not found: {}", path.display())]
    FileMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to edit presentation (HTTP {status}): {reason}")]
    RemoteEdit { status: u16, reason: String },

    #[error("request to {endpoint} failed (HTTP {status}): {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("could not reach {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("presentation {index} does not exist (loaded: {len})")]
    Index { index: usize, len: usize },

    #[error("task {task_id} still {last_status} after {attempts} polls")]
    Timeout {
        task_id: String,
        attempts: u32,
        last_status: String,
    },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeckError::Input(_) | DeckError::Index { .. } => ErrorCategory::InvalidInput,
            DeckError::Extraction { .. }
            | DeckError::FileMissing { .. }
            | DeckError::Io(_)
            | DeckError::Json(_) => ErrorCategory::Local,
            DeckError::Transport { .. } => ErrorCategory::Unreachable,
            DeckError::Acquisition { .. }
            | DeckError::RemoteEdit { .. }
            | DeckError::Rejected { .. }
            | DeckError::Generation(_) => ErrorCategory::Rejected,
            DeckError::Timeout { .. } => ErrorCategory::Incomplete,
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DeckError::Extraction {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
