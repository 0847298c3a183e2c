//! HTTP implementation of [`Backend`] on top of reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::endpoints;
use super::Backend;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::types::{CommandId, Comparison, Device, DeviceId, DeviceResult, DeviceRole, ResultId};

/// Talks to a BCM backend over plain HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = build_client(Duration::from_millis(config.timeout_ms))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path and decode the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { url, status, body });
        }

        response.json::<Value>().await.map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// GET a path and decode one field of the JSON object it returns.
    async fn get_field<T: DeserializeOwned>(&self, path: &str, field: &str) -> Result<T, ApiError> {
        let body = self.get_json(path).await?;
        take_field(body, field, &self.url(path))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.get_field(&endpoints::get_devices(), "devices").await
    }

    async fn get_device_roles(&self) -> Result<Vec<DeviceRole>, ApiError> {
        self.get_field(&endpoints::get_device_roles(), "roles").await
    }

    async fn get_devices_by_role(&self, role: &str) -> Result<Vec<Device>, ApiError> {
        let path = endpoints::get_devices_by_role(role)?;
        self.get_field(&path, "devices_by_role").await
    }

    async fn run_commands(&self, device_id: DeviceId) -> Result<Value, ApiError> {
        self.get_json(&endpoints::run_commands(device_id)).await
    }

    async fn run_commands_by_role(&self, role: &str) -> Result<Value, ApiError> {
        let path = endpoints::run_commands_by_role(role)?;
        self.get_json(&path).await
    }

    async fn device_results_by_command(
        &self,
        device_id: DeviceId,
        command_id: &CommandId,
    ) -> Result<Vec<DeviceResult>, ApiError> {
        self.get_field(
            &endpoints::device_results_by_command(device_id, command_id),
            "results",
        )
        .await
    }

    async fn compare_results(&self, a: ResultId, b: ResultId) -> Result<Comparison, ApiError> {
        let body = self.get_json(&endpoints::compare_results(a, b)).await?;
        Ok(Comparison(body))
    }
}

fn build_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

fn take_field<T: DeserializeOwned>(body: Value, field: &str, url: &str) -> Result<T, ApiError> {
    let value = match body {
        Value::Object(mut map) => map.remove(field),
        _ => None,
    }
    .ok_or_else(|| ApiError::MissingField {
        url: url.to_string(),
        field: field.to_string(),
    })?;

    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: format!("Failed to parse '{}': {}", field, e),
    })
}
