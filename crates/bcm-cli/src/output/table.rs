//! Table-formatted output for CLI.

use std::path::Path;

use bcm_core::api::endpoints;
use bcm_core::types::{Comparison, Device, DeviceResult, DeviceRole, ResultId, RoleFilter};
use bcm_core::ClientConfig;
use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::Value;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn or_dash(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("-")
    }

    fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[Device], filter: &RoleFilter) -> String {
        if devices.is_empty() {
            return format!("No devices with role '{}'.", filter.as_str());
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Mgmt IP", "Vendor", "Roles", "Commands"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(device.id),
                Cell::new(device.display_name()),
                Cell::new(Self::or_dash(&device.mgmt_ip)),
                Cell::new(Self::or_dash(&device.vendor)),
                Cell::new(device.device_roles.join(", ")),
                Cell::new(device.commands.len()),
            ]);
        }

        format!(
            "{}\n\n{} device(s) with role '{}'",
            table,
            devices.len(),
            filter.as_str()
        )
    }

    fn format_roles(&self, roles: &[DeviceRole]) -> String {
        if roles.is_empty() {
            return "No device roles defined.".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Role"]);
        for role in roles {
            table.add_row(vec![Cell::new(&role.name)]);
        }
        table.to_string()
    }

    fn format_device(&self, device: &Device) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Device: {} (id {})", device.display_name(), device.id));
        lines.push(format!("  Mgmt IP:    {}", Self::or_dash(&device.mgmt_ip)));
        lines.push(format!("  Vendor:     {}", Self::or_dash(&device.vendor)));
        lines.push(format!("  Function:   {}", Self::or_dash(&device.device_function)));
        lines.push(format!("  Region:     {}", Self::or_dash(&device.region)));
        lines.push(format!("  Site:       {}", Self::or_dash(&device.site_code)));
        lines.push(format!("  Roles:      {}", device.device_roles.join(", ")));
        lines.push(format!(
            "  Results:    {}",
            endpoints::device_results_page(Some(device.id))
        ));

        if device.commands.is_empty() {
            lines.push("  Commands:   none".to_string());
        } else {
            lines.push("  Commands:".to_string());
            for (id, syntax) in &device.commands {
                lines.push(format!("    [{}] {}", id, syntax));
            }
        }

        lines.join("\n")
    }

    fn format_results(&self, device: &Device, command: &str, results: &[DeviceResult]) -> String {
        let header = format!("{} '{}'", device.display_name().as_str().bold(), command);
        if results.is_empty() {
            return format!("{}\nNo results.", header);
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Result ID", "Created", "Command ID"]);

        for result in results {
            table.add_row(vec![
                Cell::new(result.id),
                Cell::new(Self::or_dash(&result.created_at)),
                Cell::new(
                    result
                        .command
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |id| id.to_string()),
                ),
            ]);
        }

        format!("{}\n{}\n\n{} result(s)", header, table, results.len())
    }

    fn format_comparison(&self, a: ResultId, b: ResultId, comparison: &Comparison) -> String {
        format!(
            "{} result {} vs result {}\n{}",
            "Comparison:".bold(),
            a,
            b,
            Self::pretty(&comparison.0)
        )
    }

    fn format_trigger(&self, target: &str, response: &Value) -> String {
        format!("{} {}\n{}", "[OK]".green(), target, Self::pretty(response))
    }

    fn format_config(&self, config: &ClientConfig, path: &Path) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Config file: {}", path.display()));
        lines.push(format!("  Base URL:  {}", config.base_url));
        lines.push(format!("  Timeout:   {} ms", config.timeout_ms));
        lines.join("\n")
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}
