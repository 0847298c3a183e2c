//! Error types for BCM CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use bcm_core::error::CoreError;
use thiserror::Error;

pub use bcm_core::error::{ApiError, ConfigError, ValidationError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Api(ApiError::Rejected(_)) => exit_codes::INVALID_ARGS,
                CoreError::Api(_) => exit_codes::NETWORK_ERROR,
                CoreError::Validation(_) => exit_codes::INVALID_ARGS,
                CoreError::Config(ConfigError::InvalidBaseUrl(_))
                | CoreError::Config(ConfigError::InvalidTimeout(_)) => exit_codes::INVALID_ARGS,
                CoreError::Config(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::NotFound(_) => exit_codes::NOT_FOUND,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Core(CoreError::Api(e))
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        CliError::Core(CoreError::Validation(e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}
