//! Request and response types for the presentation service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One shape-content substitution, as sent to the edit endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub shape_name: String,
    pub content: String,
}

/// `config` part of the edit request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditConfig {
    pub replacements: Vec<Replacement>,
}

/// Edit response; `url` is absent when the service failed to produce a deck.
#[derive(Debug, Deserialize)]
pub(super) struct EditResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Generation request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub plain_text: String,
    pub theme: Option<String>,
    pub length: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Task states reported by `task_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Retry,
    Success,
    Failure,
    Revoked,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskStatus::Failure | TaskStatus::Revoked)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Started => "STARTED",
            TaskStatus::Retry => "RETRY",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Revoked => "REVOKED",
            TaskStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Task status response.
///
/// `task_result` is an object with a `url` on success but may be an error
/// string on failure, so both payloads are kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_status: TaskStatus,
    #[serde(default)]
    pub task_result: Option<serde_json::Value>,
    #[serde(default)]
    pub task_info: Option<serde_json::Value>,
}

impl TaskStatusResponse {
    pub fn result_url(&self) -> Option<&str> {
        self.task_result.as_ref()?.get("url")?.as_str()
    }

    pub fn info_url(&self) -> Option<&str> {
        self.task_info.as_ref()?.get("url")?.as_str()
    }
}
