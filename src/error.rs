//! Error types for Courier.

use thiserror::Error;

/// Common error type for Courier.
#[derive(Error, Debug)]
pub enum CourierError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// SMTP transport or message construction error.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Fetching a remote resource failed before a response was received.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Remote resource answered with a non-success status.
    ///
    /// The message is the status line as received, e.g. `404 Not Found`.
    #[error("{0}")]
    UpstreamStatus(String),

    /// Asset host upload failed.
    #[error("upload error: {0}")]
    Upload(String),

    /// HTTP client construction error.
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for CourierError {
    fn from(e: reqwest::Error) -> Self {
        CourierError::Fetch(e.to_string())
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(e: serde_json::Error) -> Self {
        CourierError::InvalidJson(e.to_string())
    }
}

/// Result type alias for Courier operations.
pub type Result<T> = std::result::Result<T, CourierError>;
