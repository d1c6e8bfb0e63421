//! Error types for the notification system
//!
//! Entry points on [`crate::Notifier`] are total and never return these; they
//! surface from transports, configuration loading and command parsing.

use thiserror::Error;

/// Result type alias for notifier operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the notification system
#[derive(Error, Debug)]
pub enum Error {
    /// The transport could not build or send a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (unknown technology name, malformed command)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
