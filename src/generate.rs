//! Deck generation: start a task, then poll it with a bounded schedule.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::api::{GenerateRequest, TaskStatus};
use crate::error::{DeckError, Result};
use crate::service::PresentationService;

/// Default number of slides requested
pub const DEFAULT_LENGTH: u32 = 10;

/// Default pause between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default poll budget (10 minutes at the default interval)
pub const DEFAULT_MAX_POLLS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Ready {
        task_id: String,
        url: String,
        info_url: Option<String>,
    },
    Failed {
        task_id: String,
        status: TaskStatus,
        detail: Option<String>,
    },
    TimedOut {
        task_id: String,
        polls: u32,
        last_status: TaskStatus,
    },
}

impl GenerationOutcome {
    /// Result URL, or the matching error for failed and timed-out tasks.
    pub fn into_url(self) -> Result<(String, String)> {
        match self {
            GenerationOutcome::Ready { task_id, url, .. } => Ok((task_id, url)),
            GenerationOutcome::Failed {
                task_id,
                status,
                detail,
            } => Err(DeckError::Generation(format!(
                "task {} ended with {}{}",
                task_id,
                status,
                detail.map(|d| format!(": {}", d)).unwrap_or_default()
            ))),
            GenerationOutcome::TimedOut {
                task_id,
                polls,
                last_status,
            } => Err(DeckError::Timeout {
                task_id,
                attempts: polls,
                last_status: last_status.to_string(),
            }),
        }
    }
}

/// Start a generation task and wait for it under `policy`.
///
/// Sleeps `policy.interval` before every poll; gives up with
/// [`GenerationOutcome::TimedOut`] after `policy.max_polls` polls.
pub async fn generate_and_wait<S: PresentationService + ?Sized>(
    service: &S,
    request: &GenerateRequest,
    policy: PollPolicy,
) -> Result<GenerationOutcome> {
    let task_id = service.generate(request).await?;
    info!("Task ID: {}", task_id);
    info!("Polling for completion...");

    let mut last_status = TaskStatus::Pending;
    for poll in 1..=policy.max_polls {
        sleep(policy.interval).await;

        let status = service.task_status(&task_id).await?;
        info!("Status: {} (poll {}/{})", status.task_status, poll, policy.max_polls);

        match status.task_status {
            TaskStatus::Success => {
                let url = status.result_url().map(str::to_string).ok_or_else(|| {
                    DeckError::Generation(format!(
                        "task {} succeeded without a result url",
                        task_id
                    ))
                })?;
                info!("Presentation generation complete!");
                return Ok(GenerationOutcome::Ready {
                    info_url: status.info_url().map(str::to_string),
                    task_id,
                    url,
                });
            }
            ref failed if failed.is_failed() => {
                warn!("Task {} ended with {}", task_id, failed);
                return Ok(GenerationOutcome::Failed {
                    detail: status.task_result.as_ref().map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    }),
                    status: status.task_status.clone(),
                    task_id,
                });
            }
            other => last_status = other,
        }
    }

    warn!(
        "Task {} not finished after {} polls (last status {})",
        task_id, policy.max_polls, last_status
    );
    Ok(GenerationOutcome::TimedOut {
        task_id,
        polls: policy.max_polls,
        last_status,
    })
}
