//! Client configuration and its file storage.
//!
//! The configuration is a small JSON document kept in the platform config
//! directory. Front ends layer their own overrides (flags, environment) on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;

/// Default backend address (py4web development server)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

const CONFIG_FILE: &str = "client.json";

/// Settings needed to reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without the `/bcm` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidBaseUrl(self.base_url.clone());

        let url = Url::parse(self.base_url.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_ms));
        }

        Ok(())
    }

    /// Apply overrides that take precedence over the stored values.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(timeout) = timeout_ms {
            self.timeout_ms = timeout;
        }
        self
    }
}

/// File-backed storage for [`ClientConfig`].
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(dir: PathBuf) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { config_dir: dir })
    }

    /// Platform default config directory, e.g. `~/.config/bcm` on Linux.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "bcm")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load the stored configuration, or the defaults if none was saved yet.
    pub async fn load(&self) -> Result<ClientConfig, ConfigError> {
        let path = self.path();

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&path).await?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate and persist a configuration.
    pub async fn save(&self, config: &ClientConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let content = serde_json::to_string_pretty(config)?;
        fs::write(self.path(), content).await?;
        tracing::debug!("Saved config to {}", self.path().display());

        Ok(())
    }
}
