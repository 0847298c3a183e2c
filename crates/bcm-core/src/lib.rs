//! BCM core library.
//!
//! Typed access to the BCM backend endpoints and the device directory
//! view-model shared by every front end (currently the CLI).

pub mod api;
pub mod config;
pub mod error;
pub mod types;
pub mod viewmodel;

pub use api::{Backend, HttpBackend};
pub use config::{ClientConfig, ConfigStore};
pub use error::{ApiError, ConfigError, CoreError, Result, ValidationError};
pub use viewmodel::{DeviceDirectory, DirectoryState, NoopListener, StateListener};
