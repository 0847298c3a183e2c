//! Backend access layer.
//!
//! `Backend` is the seam between the view-model and the BCM REST endpoints.
//! `HttpBackend` is the production implementation; tests substitute their own.

pub mod endpoints;
pub mod http;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{CommandId, Comparison, Device, DeviceId, DeviceResult, DeviceRole, ResultId};

pub use http::HttpBackend;

/// Operations exposed by the BCM backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /bcm/get_devices`
    async fn get_devices(&self) -> Result<Vec<Device>, ApiError>;

    /// `GET /bcm/get_device_roles`
    async fn get_device_roles(&self) -> Result<Vec<DeviceRole>, ApiError>;

    /// `GET /bcm/get_devices_by_role/{role}` (server-side filtering)
    ///
    /// `DeviceDirectory` filters its loaded snapshot instead and never calls
    /// this; it serves front ends that want the backend's own view of a role.
    async fn get_devices_by_role(&self, role: &str) -> Result<Vec<Device>, ApiError>;

    /// `GET /bcm/run_commands/{device_id}`; the response is opaque.
    async fn run_commands(&self, device_id: DeviceId) -> Result<serde_json::Value, ApiError>;

    /// `GET /bcm/run_commands_by_role/{role}`; the response is opaque.
    ///
    /// Role names that cannot be a single path segment fail with
    /// [`ApiError::Rejected`] before any request.
    async fn run_commands_by_role(&self, role: &str) -> Result<serde_json::Value, ApiError>;

    /// `GET /bcm/device_results_by_command/{device_id}/{command_id}`
    async fn device_results_by_command(
        &self,
        device_id: DeviceId,
        command_id: &CommandId,
    ) -> Result<Vec<DeviceResult>, ApiError>;

    /// `GET /bcm/compare_results/{a}n{b}`
    async fn compare_results(&self, a: ResultId, b: ResultId) -> Result<Comparison, ApiError>;
}
