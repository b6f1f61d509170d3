//! Core error types for hearthside-core.
//!
//! The store, reducer and scheduler are infallible. Errors only arise at the
//! edges: configuration I/O, audio playback, and talking to a session whose
//! loop has already stopped.

use std::path::PathBuf;
use thiserror::Error;

use crate::audio::Cue;

/// Core error type for hearthside-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio-related errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The session loop is no longer running
    #[error("Session is closed")]
    SessionClosed,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not locate or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Audio playback errors. These never leave [`crate::AudioAlertService`].
#[derive(Error, Debug)]
pub enum AudioError {
    /// The cue resource could not be constructed
    #[error("Failed to load {cue:?} cue from {source_url}: {message}")]
    LoadFailed {
        cue: Cue,
        source_url: String,
        message: String,
    },

    /// Platform refused to start playback (autoplay policy)
    #[error("Playback of {0:?} cue blocked until a user gesture unlocks audio")]
    Blocked(Cue),

    /// Playback failed for another reason
    #[error("Playback of {cue:?} cue failed: {message}")]
    PlaybackFailed { cue: Cue, message: String },

    /// No output device could be opened
    #[error("Audio output unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
