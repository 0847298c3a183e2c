//! View-model state and change notification.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{CommandId, Comparison, Device, DeviceId, DeviceResult, DeviceRole, ResultId, RoleFilter};

/// Outcome of the last device selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "device", rename_all = "snake_case")]
pub enum DeviceSelection {
    #[default]
    Unselected,
    Selected(Device),
    /// The id was not in the filtered subset
    NotFound(DeviceId),
}

impl DeviceSelection {
    pub fn device(&self) -> Option<&Device> {
        match self {
            DeviceSelection::Selected(device) => Some(device),
            _ => None,
        }
    }
}

/// Outcome of the last command selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandSelection {
    #[default]
    Unselected,
    Selected { id: CommandId, syntax: String },
    /// No command of the selected device has this syntax
    NotFound { syntax: String },
}

impl CommandSelection {
    pub fn id(&self) -> Option<&CommandId> {
        match self {
            CommandSelection::Selected { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Backend operations that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadDevices,
    LoadRoles,
    RunCommands,
    RunCommandsByRole,
    DeviceResults,
    CompareResults,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadDevices => "load devices",
            Operation::LoadRoles => "load roles",
            Operation::RunCommands => "run commands",
            Operation::RunCommandsByRole => "run commands by role",
            Operation::DeviceResults => "device results",
            Operation::CompareResults => "compare results",
        }
    }
}

/// A backend failure kept on the state so the view can show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub operation: Operation,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Everything the view renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryState {
    pub devices: Vec<Device>,
    pub device_roles: Vec<DeviceRole>,
    /// Active role filter; `None` until one is chosen
    pub role_filter: Option<RoleFilter>,
    /// `None` until a role filter is applied
    pub devices_by_role: Option<Vec<Device>>,
    pub device: DeviceSelection,
    pub selected_command: CommandSelection,
    /// Results of the selected device for the selected command
    pub results: Option<Vec<DeviceResult>>,
    pub checked_results: Vec<ResultId>,
    pub comparison: Option<Comparison>,
    pub failures: Vec<Failure>,
    /// Set by the first `load`; later loads are no-ops
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Kind of mutation that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    DevicesLoaded,
    RolesLoaded,
    FilterChanged,
    DeviceSelected,
    CommandSelected,
    ResultsLoaded,
    ResultsChecked,
    ComparisonLoaded,
    FailuresChanged,
}

/// Receives every state update of a [`super::DeviceDirectory`].
///
/// Called with the state lock held: implementations must not call back into
/// the directory.
pub trait StateListener: Send + Sync {
    fn on_change(&self, change: Change, state: &DirectoryState);
}

/// Listener that ignores all updates.
pub struct NoopListener;

impl StateListener for NoopListener {
    fn on_change(&self, _change: Change, _state: &DirectoryState) {}
}
