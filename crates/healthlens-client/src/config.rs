//! Client configuration: where the backing services live.
//!
//! Resolution order for the base URL:
//!
//! 1. an explicit override from the front end (`--api-url`)
//! 2. `HEALTHLENS_API_URL` environment variable
//! 3. `api_url` in the TOML config file, if one was given
//! 4. `http://localhost:8000`
//!
//! Example file:
//!
//! ```toml
//! api_url = "https://health.example.org/api"
//! predict_path = "/predict"
//! chat_path = "/chat"
//! request_timeout_secs = 30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use healthlens_contracts::error::{HealthlensResult, ServiceError};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const ENV_API_URL: &str = "HEALTHLENS_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL both contracts are resolved against.
    pub api_url: String,
    /// Path of the prediction contract, relative to `api_url`.
    pub predict_path: String,
    /// Path of the chat contract, relative to `api_url`.
    pub chat_path: String,
    /// Per-request timeout. Unset means the client never gives up on its
    /// own and the service's timeout governs.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            predict_path: "/predict".to_string(),
            chat_path: "/chat".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Parse `s` as a TOML client configuration.
    ///
    /// Returns `ServiceError::Config` if the TOML is malformed or has
    /// unknown keys.
    pub fn from_toml_str(s: &str) -> HealthlensResult<Self> {
        let config: ClientConfig = toml::from_str(s).map_err(|e| ServiceError::Config {
            reason: format!("failed to parse client config TOML: {}", e),
        })?;
        config.validated()
    }

    /// Read and parse the config file at `path`.
    pub fn from_file(path: &Path) -> HealthlensResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ServiceError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Full resolution: optional file, then environment override.
    pub fn load(path: Option<&Path>) -> HealthlensResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_api_url_override(std::env::var(ENV_API_URL).ok())
    }

    /// Replace `api_url` when `url` is set and non-blank.
    pub fn with_api_url_override(mut self, url: Option<String>) -> HealthlensResult<Self> {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        self.validated()
    }

    /// Absolute URL of the prediction contract.
    pub fn predict_url(&self) -> String {
        self.endpoint(&self.predict_path)
    }

    /// Absolute URL of the chat contract.
    pub fn chat_url(&self) -> String {
        self.endpoint(&self.chat_path)
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        let suffix = path.trim_start_matches('/');
        format!("{base}/{suffix}")
    }

    fn validated(self) -> HealthlensResult<Self> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ServiceError::Config {
                reason: "api_url is empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ServiceError::Config {
                reason: format!("api_url '{}' must start with http:// or https://", url),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ServiceError::Config {
                reason: "request_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
