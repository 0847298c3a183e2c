//! Command implementations.

pub mod compare;
pub mod config;
pub mod devices;
pub mod results;
pub mod run;

pub use compare::run_compare;
pub use config::run_config;
pub use devices::{run_device, run_devices, run_roles};
pub use results::run_results;
pub use run::{run_run, run_run_role};
