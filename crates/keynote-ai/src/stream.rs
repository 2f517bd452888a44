//! Answer stream events and frame interpretation.

use serde::Deserialize;

use crate::sse::DATA_PREFIX;

/// Events decoded from the answer stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental token(s) to append
    Chunk(String),
    /// Authoritative full answer, replaces anything accumulated so far
    Final(String),
    /// Terminal failure reported by the server or transport
    Failure(String),
}

impl StreamEvent {
    /// Check if this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Final(_) | StreamEvent::Failure(_))
    }
}

/// Wire payload of a `data:` frame. Every field is optional so one
/// deserialization covers the chunk, terminal, and error shapes.
#[derive(Debug, Deserialize)]
struct FramePayload {
    #[serde(default)]
    chunk: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret one raw frame, producing zero or one event.
///
/// Frames without the `data: ` prefix (comments, keep-alives) carry no
/// event. A malformed payload is logged and skipped so one corrupt frame
/// cannot abort an otherwise healthy stream. When a payload matches more
/// than one shape, `error` wins, then `done` + `answer`, then `chunk`.
pub fn parse_frame(frame: &str) -> Option<StreamEvent> {
    let payload = frame.trim().strip_prefix(DATA_PREFIX)?;

    let payload: FramePayload = match serde_json::from_str(payload.trim()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Skipping malformed frame: {}", e);
            return None;
        }
    };

    if let Some(error) = payload.error {
        return Some(StreamEvent::Failure(error));
    }
    if payload.done {
        if let Some(answer) = payload.answer {
            return Some(StreamEvent::Final(answer));
        }
    }
    payload.chunk.map(StreamEvent::Chunk)
}
