//! Per-invocation session setup: configuration layering and view-model construction.

use std::path::PathBuf;
use std::sync::Arc;

use bcm_core::viewmodel::{Change, DirectoryState, StateListener};
use bcm_core::{ClientConfig, ConfigStore, DeviceDirectory, HttpBackend};

use crate::cli::Cli;
use crate::error::CliError;

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub json: bool,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub config_dir: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            base_url: cli.base_url.clone(),
            timeout: cli.timeout,
            config_dir: cli.config_dir.clone(),
        }
    }

    pub fn config_store(&self) -> Result<ConfigStore, CliError> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => ConfigStore::default_dir()?,
        };
        Ok(ConfigStore::new(dir)?)
    }

    /// Stored configuration with flag/environment overrides applied.
    pub async fn client_config(&self) -> Result<ClientConfig, CliError> {
        let stored = self.config_store()?.load().await?;
        Ok(stored.with_overrides(self.base_url.clone(), self.timeout))
    }

    /// Fresh view-model for this invocation, not yet loaded.
    pub async fn directory(&self) -> Result<DeviceDirectory, CliError> {
        let config = self.client_config().await?;
        let backend = HttpBackend::new(&config)?;
        tracing::debug!("Using backend {}", backend.base_url());

        Ok(DeviceDirectory::new(Arc::new(backend), Arc::new(LogListener)))
    }

    /// View-model with the device and role lists loaded.
    pub async fn loaded_directory(&self) -> Result<DeviceDirectory, CliError> {
        let directory = self.directory().await?;
        directory.load().await?;
        Ok(directory)
    }
}

/// Traces every state update at debug level.
struct LogListener;

impl StateListener for LogListener {
    fn on_change(&self, change: Change, state: &DirectoryState) {
        tracing::debug!(
            "{:?}: {} device(s), {} in filter, {} failure(s)",
            change,
            state.devices.len(),
            state.devices_by_role.as_ref().map_or(0, Vec::len),
            state.failures.len()
        );
    }
}
