use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::{DeckError, Result};

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://api.slidespeak.co/api/v1/";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub(super) const API_KEY_HEADER: &str = "X-API-key";

/// Default CLI version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn build_user_agent() -> String {
    format!("deckhand/{}", DEFAULT_VERSION)
}

/// HTTP client for the presentation service
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) user_agent: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// `api_key` may be absent; only endpoints that need it (edit, generate,
    /// task status) will then fail. Downloads work without a key.
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| DeckError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            user_agent: build_user_agent(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub(super) fn build_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| DeckError::Input(format!("Failed to build URL for endpoint {}: {}", endpoint, e)))
    }

    pub(super) fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DeckError::Input(
                "No API key configured. Set SLIDE_SPEAK_API_KEY or pass --api-key.".to_string(),
            )
        })
    }

    #[cfg(test)]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Parse the service root, making sure it ends with `/` so endpoints are
/// joined below it rather than replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| DeckError::Input(format!("Invalid base URL {}: {}", raw, e)))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
