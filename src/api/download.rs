use futures_util::StreamExt;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use super::client::ApiClient;
use super::http::send_with_retry;
use crate::error::{DeckError, Result};

impl ApiClient {
    /// Download a deck in full. Only HTTP 200 is accepted.
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        info!("Downloading presentation from {}", url);

        let transport = |source| DeckError::Transport {
            url: url.to_string(),
            source,
        };

        let response = send_with_retry(|| {
            self.client
                .get(url.clone())
                .header("User-Agent", &self.user_agent)
        })
        .await
        .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DeckError::Acquisition {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.map_err(transport)?);
        }

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}
