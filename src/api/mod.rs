//! HTTP client for the remote presentation service.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST presentation/edit` : multipart deck + replacement config
//! - `POST presentation/generate` : start a generation task
//! - `GET task_status/{id}` : poll a task
//!
//! Plain artifact downloads go straight to the URL the service handed out.

mod client;
mod download;
mod edit;
mod generate;
mod http;
mod types;

pub use client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use types::{
    EditConfig, GenerateRequest, Replacement, TaskStatus, TaskStatusResponse,
};

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::service::PresentationService;

#[async_trait]
impl PresentationService for ApiClient {
    async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        ApiClient::download(self, url).await
    }

    async fn edit(&self, file_name: &str, deck: Vec<u8>, config: &EditConfig) -> Result<Url> {
        self.edit_presentation(file_name, deck, config).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.generate_presentation(request).await
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        ApiClient::task_status(self, task_id).await
    }
}
