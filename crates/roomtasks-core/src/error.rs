//! Core error types for roomtasks-core.
//!
//! User-facing failures (unknown room snapshot, stale index, malformed input)
//! and backend failures share one hierarchy so that the command dispatcher
//! can turn any of them into a plain-text reply.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for roomtasks-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A room has no snapshot, or a named task list does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Index outside the bounds of the current room snapshot
    #[error("Index {index} out of range (expected 1 to {len})")]
    OutOfRange { index: usize, len: usize },

    /// Non-numeric index token, malformed due date, bad argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream task service failure
    #[error("Backend error for '{service}': {message}")]
    Backend {
        service: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Command restricted to room admins
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Backend failure without an underlying source error.
    pub fn backend(service: &str, message: impl Into<String>) -> Self {
        CoreError::Backend {
            service: service.to_string(),
            message: message.into(),
            source: None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Backend {
            service: "google".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
