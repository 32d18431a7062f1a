//! Generation and task-status endpoints.

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::client::{ApiClient, API_KEY_HEADER};
use super::http::send_with_retry;
use super::types::{GenerateRequest, GenerateResponse, TaskStatusResponse};
use crate::error::{DeckError, Result};

const GENERATE_ENDPOINT: &str = "presentation/generate";
const TASK_STATUS_ENDPOINT: &str = "task_status/";

impl ApiClient {
    /// Start a generation task and return its id.
    pub async fn generate_presentation(&self, request: &GenerateRequest) -> Result<String> {
        let url = self.build_url(GENERATE_ENDPOINT)?;
        let api_key = self.api_key()?;

        info!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, api_key)
            .header("User-Agent", &self.user_agent)
            .json(request)
            .send()
            .await
            .map_err(|source| DeckError::Transport {
                url: url.to_string(),
                source,
            })?;

        let body: GenerateResponse = read_json(response, GENERATE_ENDPOINT).await?;
        body.task_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DeckError::Generation("response does not contain a task_id".to_string()))
    }

    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        let url = self.build_url(&format!("{}{}", TASK_STATUS_ENDPOINT, task_id))?;
        let api_key = self.api_key()?;

        let response = send_with_retry(|| {
            self.client
                .get(url.clone())
                .header(API_KEY_HEADER, api_key)
                .header("User-Agent", &self.user_agent)
        })
        .await
        .map_err(|source| DeckError::Transport {
            url: url.to_string(),
            source,
        })?;

        read_json(response, TASK_STATUS_ENDPOINT).await
    }
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response, endpoint: &str) -> Result<R> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|source| DeckError::Transport { url, source })?;
    debug!("{} -> HTTP {}", endpoint, status);

    if !status.is_success() {
        return Err(DeckError::Rejected {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
