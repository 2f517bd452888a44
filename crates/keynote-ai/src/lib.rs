//! keynote-ai: wire protocol and HTTP client for the event assistant
//!
//! This crate decodes the assistant's server-sent event stream into typed
//! answer events and provides the client for the streaming ask endpoint.

pub mod client;
pub mod context;
pub mod error;
pub mod sse;
pub mod stream;

pub use client::{AnswerStream, AskClient};
pub use context::EventContext;
pub use error::{Error, Result};
pub use stream::StreamEvent;
