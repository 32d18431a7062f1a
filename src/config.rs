//! Runtime settings resolved from flags and environment.

use std::path::PathBuf;
use std::sync::Arc;

use crate::acquire::Acquirer;
use crate::api::ApiClient;
use crate::cli::Cli;
use crate::error::Result;

/// Environment variable holding the service API key
pub const API_KEY_ENV: &str = "SLIDE_SPEAK_API_KEY";

#[derive(Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub download_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: cli.base_url.clone(),
            download_dir: cli.download_dir.clone(),
            timeout_secs: cli.timeout_secs,
        }
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.base_url, self.api_key.clone(), self.timeout_secs)
    }

    pub fn acquirer(&self) -> Result<Acquirer<ApiClient>> {
        Ok(Acquirer::new(
            Arc::new(self.api_client()?),
            self.download_dir.clone(),
        ))
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("download_dir", &self.download_dir)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
