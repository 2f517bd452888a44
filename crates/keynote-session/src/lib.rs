//! keynote-session: conversation session runtime
//!
//! Owns the transcript for one chat and drives one question/answer cycle
//! at a time against a streaming transport.

pub mod error;
pub mod session;
pub mod transcript;
pub mod transport;

pub use error::{Error, Result};
pub use session::{ChatSession, SessionState};
pub use transcript::{EntryId, Role, Transcript, TranscriptEntry};
pub use transport::QuestionTransport;
