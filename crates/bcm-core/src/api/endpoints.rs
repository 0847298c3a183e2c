//! Endpoint paths served by the BCM backend.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::{CommandId, DeviceId, ResultId};

/// Path prefix of the BCM application
pub const APP_PREFIX: &str = "/bcm";

/// Role names end up as a path segment: alphanumeric, dash, underscore only
const ROLE_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

/// Maximum role name length
const MAX_ROLE_LENGTH: usize = 64;

/// Separator between the two result ids of a comparison path.
///
/// The backend splits on this literal character, so it is part of the wire format.
pub const COMPARE_SEPARATOR: char = 'n';

pub fn get_devices() -> String {
    format!("{}/get_devices", APP_PREFIX)
}

pub fn get_device_roles() -> String {
    format!("{}/get_device_roles", APP_PREFIX)
}

pub fn get_devices_by_role(role: &str) -> Result<String, ValidationError> {
    validate_role(role)?;
    Ok(format!("{}/get_devices_by_role/{}", APP_PREFIX, role))
}

pub fn run_commands(device_id: DeviceId) -> String {
    format!("{}/run_commands/{}", APP_PREFIX, device_id)
}

pub fn run_commands_by_role(role: &str) -> Result<String, ValidationError> {
    validate_role(role)?;
    Ok(format!("{}/run_commands_by_role/{}", APP_PREFIX, role))
}

pub fn device_results_by_command(device_id: DeviceId, command_id: &CommandId) -> String {
    format!(
        "{}/device_results_by_command/{}/{}",
        APP_PREFIX, device_id, command_id
    )
}

pub fn compare_results(a: ResultId, b: ResultId) -> String {
    format!(
        "{}/compare_results/{}{}{}",
        APP_PREFIX, a, COMPARE_SEPARATOR, b
    )
}

/// Page listing devices, or the results page of one device.
pub fn device_results_page(device_id: Option<DeviceId>) -> String {
    match device_id {
        Some(id) => format!("{}/devices/{}/results", APP_PREFIX, id),
        None => format!("{}/devices", APP_PREFIX),
    }
}

/// Check that a role name is safe to place in a URL path.
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    static ROLE_REGEX: OnceLock<Regex> = OnceLock::new();

    if role.is_empty() || role.len() > MAX_ROLE_LENGTH {
        return Err(ValidationError::InvalidRole(role.to_string()));
    }

    let regex = ROLE_REGEX.get_or_init(|| Regex::new(ROLE_PATTERN).expect("role pattern is valid"));
    if !regex.is_match(role) {
        return Err(ValidationError::InvalidRole(role.to_string()));
    }

    Ok(())
}
