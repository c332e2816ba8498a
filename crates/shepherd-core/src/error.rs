//! Core error types for shepherd-core.
//!
//! This module defines the error hierarchy using thiserror. Persistence and
//! player errors are mostly logged and swallowed by the tracker, but they are
//! still typed so callers that want to surface them can.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shepherd-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio player errors
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store rejected the write
    #[error("Write rejected for key '{key}': {message}")]
    WriteRejected { key: String, message: String },

    /// Store is locked
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Daily goal must be at least one
    #[error("Daily goal must be a positive integer, got {0}")]
    InvalidDailyGoal(u32),

    /// Notification time outside a 24h clock
    #[error("Invalid notification time {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    /// Unknown modal or milestone name
    #[error("Unknown modal '{0}'")]
    UnknownModal(String),
}

/// Errors reported by an audio player capability.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Resource could not be loaded
    #[error("Failed to load audio '{uri}': {message}")]
    LoadFailed { uri: String, message: String },

    /// Volume outside 0.0..=1.0
    #[error("Volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),

    /// Backend-specific failure
    #[error("Playback failed: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_wraps_into_core_error() {
        let err: CoreError = StorageError::Locked.into();
        assert_eq!(err.to_string(), "Storage error: Store is locked");
    }

    #[test]
    fn invalid_time_formats_with_padding() {
        let err = ValidationError::InvalidTime { hour: 7, minute: 5 };
        assert_eq!(err.to_string(), "Invalid notification time 07:05");
    }
}
