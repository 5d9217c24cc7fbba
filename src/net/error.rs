//! Transport error taxonomy shared by every REST call.

use thiserror::Error;

/// Errors produced by the HTTP layer before any store logic runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    /// The backend exposes no endpoint for the requested operation.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// Raised by the native build, where no browser transport exists.
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// The server-provided message for `Http` errors, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}
