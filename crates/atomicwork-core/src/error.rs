//! Error types for atomicwork-mcp.

use thiserror::Error;

/// Main error type for atomicwork operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required tool argument was missing or empty
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// API returned a non-success status
    #[error("Atomicwork API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (DNS, refused connection, reset)
    #[error("Failed to connect to Atomicwork: {0}")]
    Connection(String),

    /// Response body could not be parsed
    #[error("Invalid response from Atomicwork: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an API error from an HTTP status code and the raw response body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }
}

/// Result type alias for atomicwork operations.
pub type Result<T> = std::result::Result<T, Error>;
