//! Core error types for pomodeck-core.
//!
//! Errors are grouped by the subsystem that raises them. Playback errors
//! never leave the alarm dispatcher; everything else propagates to the
//! caller through [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// AI service errors
    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),

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

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Referenced item does not exist
    #[error("Unknown {kind}: {id}")]
    NotFound { kind: String, id: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the generative-AI service client.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key in config or environment
    #[error("No API key configured (set ai.api_key or POMODECK_API_KEY)")]
    MissingApiKey,

    /// Nothing to send
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid endpoint URL
    #[error("Invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    /// Service answered with a non-success status
    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Service answered but without any text
    #[error("No response from AI")]
    EmptyResponse,

    /// Image request answered without inline image data
    #[error("No image generated")]
    NoImage,

    /// Response could not be interpreted
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Audio playback failures. Logged by the alarm dispatcher, never surfaced.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The player program could not be spawned
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The source cannot be played by this player
    #[error("Unsupported sound source: {0}")]
    Unsupported(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
