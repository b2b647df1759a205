//! Error types for adapters.

use powerwatch_types::UnknownReadingType;
use thiserror::Error;

/// Errors that can occur when talking to the monitor or the state store.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The state store rejected the bearer token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The monitor reported a reading type outside the known mapping.
    #[error("Invalid reading type mapping: {0}")]
    InvalidReadingType(#[from] UnknownReadingType),

    /// The adapter could not be constructed.
    #[error("Invalid adapter configuration: {0}")]
    Config(String),
}

#[cfg(any(feature = "hwinfo", feature = "webhook"))]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
