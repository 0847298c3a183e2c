//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use std::path::Path;

use bcm_core::types::{Comparison, Device, DeviceResult, DeviceRole, ResultId, RoleFilter};
use bcm_core::ClientConfig;
use serde_json::Value;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the role-filtered device list
    fn format_devices(&self, devices: &[Device], filter: &RoleFilter) -> String;

    /// Format the role list
    fn format_roles(&self, roles: &[DeviceRole]) -> String;

    /// Format a single device with its commands
    fn format_device(&self, device: &Device) -> String;

    /// Format a device's results for one command
    fn format_results(&self, device: &Device, command: &str, results: &[DeviceResult]) -> String;

    /// Format a backend comparison
    fn format_comparison(&self, a: ResultId, b: ResultId, comparison: &Comparison) -> String;

    /// Format the response of a fire-and-forget trigger
    fn format_trigger(&self, target: &str, response: &Value) -> String;

    /// Format the effective client configuration
    fn format_config(&self, config: &ClientConfig, path: &Path) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
