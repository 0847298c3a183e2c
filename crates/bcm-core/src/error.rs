//! Error types for BCM core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Response from {url} has no '{field}' field")]
    MissingField { url: String, field: String },

    #[error("Request not sent: {0}")]
    Rejected(#[from] ValidationError),
}

/// Preconditions checked locally, before any request is issued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select 2 results (got {count})")]
    ResultCount { count: usize },

    #[error("No device selected")]
    NoDeviceSelected,

    #[error("Invalid role name: {0}")]
    InvalidRole(String),
}

/// Client configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0} ms")]
    InvalidTimeout(u64),

    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
