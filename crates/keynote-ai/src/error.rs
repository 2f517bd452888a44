//! Error types for keynote-ai

use thiserror::Error;

/// Result type alias using keynote-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the assistant API
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API rejected the request before any stream bytes were read
    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },
}

impl Error {
    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
