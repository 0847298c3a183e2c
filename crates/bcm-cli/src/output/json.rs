//! JSON-formatted output for CLI.

use std::path::Path;

use bcm_core::api::endpoints;
use bcm_core::types::{Comparison, Device, DeviceResult, DeviceRole, ResultId, RoleFilter};
use bcm_core::ClientConfig;
use serde::Serialize;
use serde_json::{json, Value};

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[Device], filter: &RoleFilter) -> String {
        Self::to_json(&json!({
            "role": filter.as_str(),
            "devices": devices,
            "count": devices.len()
        }))
    }

    fn format_roles(&self, roles: &[DeviceRole]) -> String {
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        Self::to_json(&json!({
            "roles": names,
            "count": roles.len()
        }))
    }

    fn format_device(&self, device: &Device) -> String {
        let mut output = serde_json::to_value(device).unwrap_or(json!({}));
        if let Value::Object(ref mut map) = output {
            map.insert(
                "results_page".to_string(),
                json!(endpoints::device_results_page(Some(device.id))),
            );
        }
        Self::to_json(&output)
    }

    fn format_results(&self, device: &Device, command: &str, results: &[DeviceResult]) -> String {
        Self::to_json(&json!({
            "device": device.id,
            "command": command,
            "results": results,
            "count": results.len()
        }))
    }

    fn format_comparison(&self, a: ResultId, b: ResultId, comparison: &Comparison) -> String {
        Self::to_json(&json!({
            "results": [a, b],
            "comparison": comparison
        }))
    }

    fn format_trigger(&self, target: &str, response: &Value) -> String {
        Self::to_json(&json!({
            "target": target,
            "response": response
        }))
    }

    fn format_config(&self, config: &ClientConfig, path: &Path) -> String {
        Self::to_json(&json!({
            "path": path.display().to_string(),
            "config": config
        }))
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}
