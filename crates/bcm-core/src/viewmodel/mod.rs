//! Device directory view-model.
//!
//! Holds the device and role snapshots fetched once per session, derives the
//! role-filtered subset, resolves the selected device and command, and
//! forwards run/compare actions to the backend.
//!
//! Role filtering happens client-side on the loaded snapshot, and device
//! lookups search the filtered subset only. Fields written from responses
//! (`results`, `comparison`) are guarded by a [`RequestSequencer`], so the last
//! call issued wins whatever order responses arrive in.

mod sequence;
mod state;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::api::endpoints::validate_role;
use crate::api::Backend;
use crate::error::{ApiError, CoreError, ValidationError};
use crate::types::{Comparison, DeviceId, ResultId, RoleFilter};

pub use sequence::{RequestSequencer, Ticket};
pub use state::{
    Change, CommandSelection, DeviceSelection, DirectoryState, Failure, NoopListener, Operation,
    StateListener,
};

/// Per-session view-model. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct DeviceDirectory {
    backend: Arc<dyn Backend>,
    state: Arc<RwLock<DirectoryState>>,
    results_seq: Arc<RequestSequencer>,
    comparison_seq: Arc<RequestSequencer>,
    listener: Arc<dyn StateListener>,
}

impl DeviceDirectory {
    pub fn new(backend: Arc<dyn Backend>, listener: Arc<dyn StateListener>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(DirectoryState::default())),
            results_seq: Arc::new(RequestSequencer::new()),
            comparison_seq: Arc::new(RequestSequencer::new()),
            listener,
        }
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> DirectoryState {
        self.state.read().await.clone()
    }

    /// Fetch the device and role lists concurrently.
    ///
    /// Runs once per session. A failed request leaves its list empty and is
    /// recorded in `failures`; the first error is also returned.
    pub async fn load(&self) -> Result<(), CoreError> {
        {
            let mut state = self.state.write().await;
            if state.loaded_at.is_some() {
                tracing::debug!("Directory already loaded, skipping");
                return Ok(());
            }
            state.loaded_at = Some(Utc::now());
        }

        let (devices, roles) = futures::join!(
            self.backend.get_devices(),
            self.backend.get_device_roles()
        );

        let mut state = self.state.write().await;
        let mut outcome = Ok(());

        match devices {
            Ok(devices) => {
                tracing::info!("Loaded {} device(s)", devices.len());
                state.devices = devices;
                self.notify(Change::DevicesLoaded, &state);
            }
            Err(e) => {
                self.record_failure(&mut state, Operation::LoadDevices, &e);
                outcome = Err(e);
            }
        }

        match roles {
            Ok(roles) => {
                tracing::info!("Loaded {} device role(s)", roles.len());
                state.device_roles = roles;
                self.notify(Change::RolesLoaded, &state);
            }
            Err(e) => {
                self.record_failure(&mut state, Operation::LoadRoles, &e);
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }

        outcome.map_err(CoreError::from)
    }

    /// Narrow the device list to one role, or to everything for `"ALL"`.
    ///
    /// Always clears the device selection. Returns the subset size.
    pub async fn filter_by_role(&self, role: &str) -> usize {
        let filter = RoleFilter::parse(role);
        let mut state = self.state.write().await;

        let subset: Vec<_> = state
            .devices
            .iter()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect();
        let count = subset.len();
        tracing::debug!(
            "Role filter '{}' matched {} of {} device(s)",
            filter.as_str(),
            count,
            state.devices.len()
        );

        state.devices_by_role = Some(subset);
        state.role_filter = Some(filter);
        self.clear_device(&mut state);
        self.notify(Change::FilterChanged, &state);

        count
    }

    /// Select a device from the filtered subset.
    ///
    /// A miss, including when no filter has been applied yet, yields
    /// `DeviceSelection::NotFound`.
    pub async fn select_device(&self, device_id: DeviceId) -> DeviceSelection {
        let mut state = self.state.write().await;

        let found = state
            .devices_by_role
            .as_ref()
            .and_then(|subset| subset.iter().find(|device| device.id == device_id))
            .cloned();

        self.clear_device(&mut state);
        state.device = match found {
            Some(device) => DeviceSelection::Selected(device),
            None => {
                tracing::debug!("Device {} is not in the current subset", device_id);
                DeviceSelection::NotFound(device_id)
            }
        };
        self.notify(Change::DeviceSelected, &state);

        state.device.clone()
    }

    /// Resolve a command of the selected device by its exact syntax and
    /// fetch that device's results for it.
    ///
    /// An unknown syntax yields `CommandSelection::NotFound` without a request.
    pub async fn select_command(&self, syntax: &str) -> Result<CommandSelection, CoreError> {
        let (device_id, selection, ticket) = {
            let mut state = self.state.write().await;

            let lookup = state
                .device
                .device()
                .map(|device| (device.id, device.command_id_for(syntax).cloned()));
            let Some((device_id, command_id)) = lookup else {
                let err = ValidationError::NoDeviceSelected;
                tracing::warn!("Cannot select command '{}': {}", syntax, err);
                return Err(err.into());
            };

            state.results = None;
            state.checked_results.clear();

            match command_id {
                Some(id) => {
                    state.selected_command = CommandSelection::Selected {
                        id,
                        syntax: syntax.to_string(),
                    };
                    self.notify(Change::CommandSelected, &state);
                    (device_id, state.selected_command.clone(), self.results_seq.issue())
                }
                None => {
                    tracing::debug!("Device {} has no command '{}'", device_id, syntax);
                    self.results_seq.invalidate();
                    state.selected_command = CommandSelection::NotFound {
                        syntax: syntax.to_string(),
                    };
                    self.notify(Change::CommandSelected, &state);
                    return Ok(state.selected_command.clone());
                }
            }
        };

        let Some(command_id) = selection.id() else {
            return Ok(selection);
        };
        let response = self
            .backend
            .device_results_by_command(device_id, command_id)
            .await;

        let mut state = self.state.write().await;
        let current = self.results_seq.is_current(ticket);

        match response {
            Ok(results) if current => {
                tracing::debug!(
                    "Device {} has {} result(s) for command {}",
                    device_id,
                    results.len(),
                    command_id
                );
                state.results = Some(results);
                self.notify(Change::ResultsLoaded, &state);
            }
            Ok(_) => {
                tracing::debug!(
                    "Dropping stale results for device {} command {}",
                    device_id,
                    command_id
                );
            }
            Err(e) => {
                if current {
                    self.record_failure(&mut state, Operation::DeviceResults, &e);
                }
                return Err(e.into());
            }
        }

        Ok(selection)
    }

    /// Trigger command execution on one device. The response is only logged.
    pub async fn run_commands(&self, device_id: DeviceId) -> Result<serde_json::Value, CoreError> {
        match self.backend.run_commands(device_id).await {
            Ok(body) => {
                tracing::info!("run_commands({}) -> {}", device_id, body);
                Ok(body)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                self.record_failure(&mut state, Operation::RunCommands, &e);
                Err(e.into())
            }
        }
    }

    /// Trigger command execution on every device of a role.
    pub async fn run_commands_by_role(&self, role: &str) -> Result<serde_json::Value, CoreError> {
        if let Err(err) = validate_role(role) {
            tracing::warn!("Refusing to run commands: {}", err);
            return Err(err.into());
        }

        match self.backend.run_commands_by_role(role).await {
            Ok(body) => {
                tracing::info!("run_commands_by_role({}) -> {}", role, body);
                Ok(body)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                self.record_failure(&mut state, Operation::RunCommandsByRole, &e);
                Err(e.into())
            }
        }
    }

    /// Toggle a result in the checked set. Returns whether it is now checked.
    pub async fn toggle_result(&self, result_id: ResultId) -> bool {
        let mut state = self.state.write().await;

        let checked = match state.checked_results.iter().position(|id| *id == result_id) {
            Some(pos) => {
                state.checked_results.remove(pos);
                false
            }
            None => {
                state.checked_results.push(result_id);
                true
            }
        };
        self.notify(Change::ResultsChecked, &state);

        checked
    }

    /// Compare the currently checked results.
    pub async fn compare_checked(&self) -> Result<Comparison, CoreError> {
        let ids = self.state.read().await.checked_results.clone();
        self.compare_results(&ids).await
    }

    /// Request the diff of exactly two results and store it verbatim.
    pub async fn compare_results(&self, result_ids: &[ResultId]) -> Result<Comparison, CoreError> {
        let (a, b) = match result_ids {
            [a, b] => (*a, *b),
            _ => {
                let err = ValidationError::ResultCount {
                    count: result_ids.len(),
                };
                tracing::warn!("{}", err);
                return Err(err.into());
            }
        };

        let ticket = self.comparison_seq.issue();
        let response = self.backend.compare_results(a, b).await;

        let mut state = self.state.write().await;
        let current = self.comparison_seq.is_current(ticket);

        match response {
            Ok(comparison) => {
                if current {
                    state.comparison = Some(comparison.clone());
                    self.notify(Change::ComparisonLoaded, &state);
                } else {
                    tracing::debug!("Dropping stale comparison of {} and {}", a, b);
                }
                Ok(comparison)
            }
            Err(e) => {
                if current {
                    self.record_failure(&mut state, Operation::CompareResults, &e);
                }
                Err(e.into())
            }
        }
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.failures.clear();
        self.notify(Change::FailuresChanged, &state);
    }

    /// Reset everything hanging off the selected device and drop pending results.
    fn clear_device(&self, state: &mut DirectoryState) {
        state.device = DeviceSelection::Unselected;
        state.selected_command = CommandSelection::Unselected;
        state.results = None;
        state.checked_results.clear();
        self.results_seq.invalidate();
    }

    fn record_failure(&self, state: &mut DirectoryState, operation: Operation, err: &ApiError) {
        tracing::error!("{} failed: {}", operation.as_str(), err);
        state.failures.push(Failure {
            operation,
            message: err.to_string(),
            at: Utc::now(),
        });
        self.notify(Change::FailuresChanged, state);
    }

    fn notify(&self, change: Change, state: &DirectoryState) {
        self.listener.on_change(change, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::types::{CommandId, Device, DeviceResult, DeviceRole};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// In-memory backend. Results and comparisons can be held back with gates
    /// so tests decide the order responses arrive in.
    #[derive(Default)]
    struct FakeBackend {
        devices: Vec<Device>,
        roles: Vec<DeviceRole>,
        fail_devices: bool,
        fail_runs: bool,
        calls: Mutex<Vec<String>>,
        result_gates: Mutex<VecDeque<oneshot::Receiver<Vec<DeviceResult>>>>,
        compare_gates: Mutex<VecDeque<oneshot::Receiver<Comparison>>>,
    }

    impl FakeBackend {
        fn with_fixture() -> Self {
            Self {
                devices: vec![
                    make_device(1, &["core"], &[("1", "show version"), ("2", "show ip route")]),
                    make_device(2, &["edge"], &[("1", "show version")]),
                    make_device(3, &["core", "edge"], &[]),
                    make_device(4, &[], &[]),
                ],
                roles: vec![DeviceRole::new("core"), DeviceRole::new("edge")],
                ..Default::default()
            }
        }

        fn record(&self, path: String) {
            self.calls.lock().unwrap().push(path);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn gate_results(&self) -> oneshot::Sender<Vec<DeviceResult>> {
            let (tx, rx) = oneshot::channel();
            self.result_gates.lock().unwrap().push_back(rx);
            tx
        }

        fn gate_compare(&self) -> oneshot::Sender<Comparison> {
            let (tx, rx) = oneshot::channel();
            self.compare_gates.lock().unwrap().push_back(rx);
            tx
        }

        fn failure(path: &str) -> ApiError {
            ApiError::Status {
                url: path.to_string(),
                status: 503,
                body: "unavailable".to_string(),
            }
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn get_devices(&self) -> Result<Vec<Device>, ApiError> {
            let path = endpoints::get_devices();
            self.record(path.clone());
            if self.fail_devices {
                return Err(Self::failure(&path));
            }
            Ok(self.devices.clone())
        }

        async fn get_device_roles(&self) -> Result<Vec<DeviceRole>, ApiError> {
            self.record(endpoints::get_device_roles());
            Ok(self.roles.clone())
        }

        async fn get_devices_by_role(&self, role: &str) -> Result<Vec<Device>, ApiError> {
            self.record(endpoints::get_devices_by_role(role)?);
            Ok(self.devices.iter().filter(|d| d.has_role(role)).cloned().collect())
        }

        async fn run_commands(&self, device_id: DeviceId) -> Result<Value, ApiError> {
            let path = endpoints::run_commands(device_id);
            self.record(path.clone());
            if self.fail_runs {
                return Err(Self::failure(&path));
            }
            Ok(json!({"status": "started", "device": device_id.0}))
        }

        async fn run_commands_by_role(&self, role: &str) -> Result<Value, ApiError> {
            self.record(endpoints::run_commands_by_role(role)?);
            Ok(json!({"status": "started", "role": role}))
        }

        async fn device_results_by_command(
            &self,
            device_id: DeviceId,
            command_id: &CommandId,
        ) -> Result<Vec<DeviceResult>, ApiError> {
            let path = endpoints::device_results_by_command(device_id, command_id);
            self.record(path.clone());
            let gate = self.result_gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.map_err(|_| Self::failure(&path)),
                None => Ok(vec![make_result(100), make_result(101)]),
            }
        }

        async fn compare_results(&self, a: ResultId, b: ResultId) -> Result<Comparison, ApiError> {
            let path = endpoints::compare_results(a, b);
            self.record(path.clone());
            let gate = self.compare_gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.map_err(|_| Self::failure(&path)),
                None => Ok(Comparison(json!({"a": a.0, "b": b.0, "diff": []}))),
            }
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        changes: Mutex<Vec<Change>>,
    }

    impl StateListener for RecordingListener {
        fn on_change(&self, change: Change, _state: &DirectoryState) {
            self.changes.lock().unwrap().push(change);
        }
    }

    fn make_device(id: i64, roles: &[&str], commands: &[(&str, &str)]) -> Device {
        Device {
            id: DeviceId(id),
            name: Some(format!("dev-{}", id)),
            mgmt_ip: None,
            vendor: None,
            device_function: None,
            device_roles: roles.iter().map(|r| r.to_string()).collect(),
            commands: commands
                .iter()
                .map(|(id, syntax)| (CommandId::new(*id), syntax.to_string()))
                .collect(),
            region: None,
            site_code: None,
            created_at: None,
        }
    }

    fn make_result(id: i64) -> DeviceResult {
        DeviceResult {
            id: ResultId(id),
            device: None,
            command: None,
            created_at: None,
            payload: serde_json::Map::new(),
        }
    }

    fn ids(devices: &[Device]) -> Vec<i64> {
        devices.iter().map(|d| d.id.0).collect()
    }

    async fn loaded_directory() -> (DeviceDirectory, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::with_fixture());
        let directory = DeviceDirectory::new(backend.clone(), Arc::new(NoopListener));
        directory.load().await.unwrap();
        (directory, backend)
    }

    #[tokio::test]
    async fn test_load_populates_devices_and_roles() {
        let (directory, backend) = loaded_directory().await;

        let state = directory.snapshot().await;
        assert_eq!(ids(&state.devices), vec![1, 2, 3, 4]);
        assert_eq!(state.device_roles.len(), 2);
        assert!(state.devices_by_role.is_none());
        assert!(state.loaded_at.is_some());
        assert!(state.failures.is_empty());

        let calls = backend.calls();
        assert!(calls.contains(&"/bcm/get_devices".to_string()));
        assert!(calls.contains(&"/bcm/get_device_roles".to_string()));
    }

    #[tokio::test]
    async fn test_load_runs_once() {
        let (directory, backend) = loaded_directory().await;
        directory.load().await.unwrap();
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_is_recorded() {
        let backend = Arc::new(FakeBackend {
            fail_devices: true,
            ..FakeBackend::with_fixture()
        });
        let directory = DeviceDirectory::new(backend.clone(), Arc::new(NoopListener));

        let err = directory.load().await.unwrap_err();
        assert!(matches!(err, CoreError::Api(ApiError::Status { status: 503, .. })));

        let state = directory.snapshot().await;
        assert!(state.devices.is_empty());
        assert_eq!(state.device_roles.len(), 2);
        assert_eq!(state.failures.len(), 1);
        assert_eq!(state.failures[0].operation, Operation::LoadDevices);

        directory.clear_failures().await;
        assert!(directory.snapshot().await.failures.is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_role_preserves_order() {
        let (directory, _backend) = loaded_directory().await;

        assert_eq!(directory.filter_by_role("core").await, 2);
        let state = directory.snapshot().await;
        assert_eq!(ids(state.devices_by_role.as_ref().unwrap()), vec![1, 3]);
        assert_eq!(state.role_filter, Some(RoleFilter::Role("core".to_string())));

        directory.filter_by_role("edge").await;
        let state = directory.snapshot().await;
        assert_eq!(ids(state.devices_by_role.as_ref().unwrap()), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_filter_all_returns_everything() {
        let (directory, _backend) = loaded_directory().await;

        assert_eq!(directory.filter_by_role("ALL").await, 4);
        let state = directory.snapshot().await;
        assert_eq!(state.devices_by_role.as_ref().unwrap(), &state.devices);
    }

    #[tokio::test]
    async fn test_filter_unknown_role_is_empty() {
        let (directory, backend) = loaded_directory().await;

        assert_eq!(directory.filter_by_role("INTERNET").await, 0);
        assert_eq!(
            directory.snapshot().await.devices_by_role,
            Some(Vec::new())
        );
        // filtering never touches the network
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_filter_clears_selection() {
        let (directory, _backend) = loaded_directory().await;

        directory.filter_by_role("core").await;
        directory.select_device(DeviceId(1)).await;
        directory.select_command("show version").await.unwrap();
        directory.toggle_result(ResultId(100)).await;

        directory.filter_by_role("core").await;
        let state = directory.snapshot().await;
        assert_eq!(state.device, DeviceSelection::Unselected);
        assert_eq!(state.selected_command, CommandSelection::Unselected);
        assert!(state.results.is_none());
        assert!(state.checked_results.is_empty());
    }

    #[tokio::test]
    async fn test_select_device_in_subset() {
        let (directory, _backend) = loaded_directory().await;
        directory.filter_by_role("edge").await;

        let selection = directory.select_device(DeviceId(3)).await;
        assert_eq!(selection.device().map(|d| d.id), Some(DeviceId(3)));
        assert_eq!(directory.snapshot().await.device, selection);
    }

    #[tokio::test]
    async fn test_select_device_outside_subset_not_found() {
        let (directory, _backend) = loaded_directory().await;
        directory.filter_by_role("edge").await;

        let selection = directory.select_device(DeviceId(1)).await;
        assert_eq!(selection, DeviceSelection::NotFound(DeviceId(1)));

        let selection = directory.select_device(DeviceId(99)).await;
        assert_eq!(selection, DeviceSelection::NotFound(DeviceId(99)));
    }

    #[tokio::test]
    async fn test_select_device_before_filter_not_found() {
        let (directory, _backend) = loaded_directory().await;
        let selection = directory.select_device(DeviceId(1)).await;
        assert_eq!(selection, DeviceSelection::NotFound(DeviceId(1)));
    }

    #[tokio::test]
    async fn test_select_command_resolves_id() {
        let (directory, backend) = loaded_directory().await;
        directory.filter_by_role("ALL").await;
        directory.select_device(DeviceId(1)).await;

        let selection = directory.select_command("show ip route").await.unwrap();
        assert_eq!(
            selection,
            CommandSelection::Selected {
                id: CommandId::new("2"),
                syntax: "show ip route".to_string()
            }
        );
        assert_eq!(
            backend.calls().last().unwrap(),
            "/bcm/device_results_by_command/1/2"
        );

        let state = directory.snapshot().await;
        let results = state.results.unwrap();
        assert_eq!(results.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ResultId(100), ResultId(101)]);
    }

    #[tokio::test]
    async fn test_select_command_not_found_skips_request() {
        let (directory, backend) = loaded_directory().await;
        directory.filter_by_role("ALL").await;
        directory.select_device(DeviceId(1)).await;

        let selection = directory.select_command("show running-config").await.unwrap();
        assert_eq!(
            selection,
            CommandSelection::NotFound {
                syntax: "show running-config".to_string()
            }
        );
        assert_eq!(backend.calls().len(), 2);
        assert!(directory.snapshot().await.results.is_none());
    }

    #[tokio::test]
    async fn test_select_command_without_device() {
        let (directory, backend) = loaded_directory().await;
        directory.filter_by_role("ALL").await;

        let err = directory.select_command("show version").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NoDeviceSelected)
        ));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_results_dropped_after_filter_change() {
        let (directory, backend) = loaded_directory().await;
        directory.filter_by_role("core").await;
        directory.select_device(DeviceId(1)).await;

        let release = backend.gate_results();
        let pending = directory.select_command("show version");
        let refilter = async {
            tokio::task::yield_now().await;
            directory.filter_by_role("edge").await;
            release.send(vec![make_result(7)]).unwrap();
        };

        let (selection, ()) = tokio::join!(pending, refilter);
        assert!(selection.is_ok());

        let state = directory.snapshot().await;
        assert!(state.results.is_none());
        assert_eq!(state.device, DeviceSelection::Unselected);
        assert_eq!(ids(state.devices_by_role.as_ref().unwrap()), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_compare_rejects_wrong_counts() {
        let (directory, backend) = loaded_directory().await;

        for result_ids in [vec![], vec![ResultId(5)], vec![ResultId(1), ResultId(2), ResultId(3)]] {
            let err = directory.compare_results(&result_ids).await.unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::ResultCount { count }) if count == result_ids.len()
            ));
        }

        assert_eq!(backend.calls().len(), 2);
        assert!(directory.snapshot().await.comparison.is_none());
    }

    #[tokio::test]
    async fn test_compare_two_results() {
        let (directory, backend) = loaded_directory().await;

        let comparison = directory
            .compare_results(&[ResultId(1), ResultId(2)])
            .await
            .unwrap();
        assert_eq!(comparison.0["diff"], json!([]));

        let compare_calls: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("/bcm/compare_results"))
            .collect();
        assert_eq!(compare_calls, vec!["/bcm/compare_results/1n2".to_string()]);
        assert_eq!(directory.snapshot().await.comparison, Some(comparison));
    }

    #[tokio::test]
    async fn test_compare_last_issued_wins() {
        let (directory, backend) = loaded_directory().await;

        let first_tx = backend.gate_compare();
        let second_tx = backend.gate_compare();

        let first = directory.compare_results(&[ResultId(1), ResultId(2)]);
        let second = directory.compare_results(&[ResultId(3), ResultId(4)]);
        let release = async {
            second_tx.send(Comparison(json!("second"))).unwrap();
            tokio::task::yield_now().await;
            first_tx.send(Comparison(json!("first"))).unwrap();
        };

        let (first, second, ()) = tokio::join!(first, second, release);
        assert_eq!(first.unwrap().0, json!("first"));
        assert_eq!(second.unwrap().0, json!("second"));
        assert_eq!(
            directory.snapshot().await.comparison,
            Some(Comparison(json!("second")))
        );
    }

    #[tokio::test]
    async fn test_results_last_issued_wins() {
        let (directory, backend) = loaded_directory().await;
        directory.filter_by_role("core").await;
        directory.select_device(DeviceId(1)).await;

        let first_tx = backend.gate_results();
        let second_tx = backend.gate_results();

        let first = directory.select_command("show version");
        let second = directory.select_command("show ip route");
        let release = async {
            second_tx.send(vec![make_result(20)]).unwrap();
            tokio::task::yield_now().await;
            first_tx.send(vec![make_result(10)]).unwrap();
        };

        let (first, second, ()) = tokio::join!(first, second, release);
        assert_eq!(first.unwrap().id(), Some(&CommandId::new("1")));
        assert_eq!(second.unwrap().id(), Some(&CommandId::new("2")));

        let state = directory.snapshot().await;
        assert_eq!(state.selected_command.id(), Some(&CommandId::new("2")));
        let results = state.results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ResultId(20));
    }

    #[tokio::test]
    async fn test_toggle_and_compare_checked() {
        let (directory, backend) = loaded_directory().await;

        assert!(directory.toggle_result(ResultId(10)).await);
        assert!(directory.compare_checked().await.is_err());

        assert!(directory.toggle_result(ResultId(11)).await);
        assert!(directory.toggle_result(ResultId(12)).await);
        assert!(!directory.toggle_result(ResultId(11)).await);
        assert_eq!(
            directory.snapshot().await.checked_results,
            vec![ResultId(10), ResultId(12)]
        );

        directory.compare_checked().await.unwrap();
        assert_eq!(
            backend.calls().last().unwrap(),
            "/bcm/compare_results/10n12"
        );
    }

    #[tokio::test]
    async fn test_run_commands_not_stored() {
        let (directory, backend) = loaded_directory().await;
        let before = directory.snapshot().await;

        let body = directory.run_commands(DeviceId(2)).await.unwrap();
        assert_eq!(body["device"], 2);
        let body = directory.run_commands_by_role("edge").await.unwrap();
        assert_eq!(body["role"], "edge");

        assert_eq!(directory.snapshot().await, before);
        assert_eq!(
            &backend.calls()[2..],
            &["/bcm/run_commands/2".to_string(), "/bcm/run_commands_by_role/edge".to_string()]
        );
    }

    #[tokio::test]
    async fn test_run_commands_by_role_rejects_bad_role() {
        let (directory, backend) = loaded_directory().await;
        let err = directory.run_commands_by_role("../admin").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidRole(_))));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_run_commands_failure_recorded() {
        let backend = Arc::new(FakeBackend {
            fail_runs: true,
            ..FakeBackend::with_fixture()
        });
        let directory = DeviceDirectory::new(backend, Arc::new(NoopListener));

        assert!(directory.run_commands(DeviceId(1)).await.is_err());
        let state = directory.snapshot().await;
        assert_eq!(state.failures.len(), 1);
        assert_eq!(state.failures[0].operation, Operation::RunCommands);
    }

    #[tokio::test]
    async fn test_listener_sees_each_update() {
        let backend = Arc::new(FakeBackend::with_fixture());
        let listener = Arc::new(RecordingListener::default());
        let directory = DeviceDirectory::new(backend, listener.clone());

        directory.load().await.unwrap();
        directory.filter_by_role("core").await;
        directory.select_device(DeviceId(1)).await;
        directory.select_command("show version").await.unwrap();

        assert_eq!(
            *listener.changes.lock().unwrap(),
            vec![
                Change::DevicesLoaded,
                Change::RolesLoaded,
                Change::FilterChanged,
                Change::DeviceSelected,
                Change::CommandSelected,
                Change::ResultsLoaded,
            ]
        );
    }
}
