//! Remote presentation service seam.
//!
//! Acquisition, editing and generation talk to the remote service only
//! through this trait; `ApiClient` is the HTTP implementation.

use async_trait::async_trait;
use url::Url;

use crate::api::{EditConfig, GenerateRequest, TaskStatusResponse};
use crate::error::Result;

#[async_trait]
pub trait PresentationService: Send + Sync {
    /// Fetch the full body of a deck. Any status other than 200 is an
    /// `Acquisition` error.
    async fn download(&self, url: &Url) -> Result<Vec<u8>>;

    /// Submit a deck plus replacements; returns the location of the edited deck.
    async fn edit(&self, file_name: &str, deck: Vec<u8>, config: &EditConfig) -> Result<Url>;

    /// Start a generation task; returns its task id.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse>;
}
