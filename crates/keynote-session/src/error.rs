//! Error types for keynote-session

use thiserror::Error;

/// Result type alias using keynote-session Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving a chat session
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the wire/client layer
    #[error(transparent)]
    Ai(#[from] keynote_ai::Error),

    /// Submission rejected: question text was empty
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Submission rejected: a question is already in flight
    #[error("a question is already in flight")]
    Busy,
}
