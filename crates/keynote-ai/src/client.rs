//! HTTP client for the streaming ask endpoint.

use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;

use async_stream::stream;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::Stream;

use crate::{
    context::EventContext,
    error::{Error, Result},
    sse::FrameDecoder,
    stream::{StreamEvent, parse_frame},
};

/// A stream of answer events for one question
pub type AnswerStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Client for the assistant's streaming ask endpoint
pub struct AskClient {
    client: reqwest::Client,
    base_url: String,
}

impl AskClient {
    /// Create a client with no request timeout; the server may hold the
    /// connection open for the duration of generation.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize(base_url),
        }
    }

    /// Create a client with an overall request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize(base_url),
        })
    }

    /// Submit a question about an event, returning the answer stream.
    ///
    /// Transport-level rejection (non-success status or network failure)
    /// surfaces as an error here, before any frame is decoded.
    pub async fn ask(&self, context: &EventContext, question: &str) -> Result<AnswerStream> {
        let prompt = context.prompt(question);
        let url = format!("{}/stream/groq", self.base_url);
        tracing::debug!("Submitting question to {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("prompt", prompt.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), error_detail(&body)));
        }

        Ok(Box::pin(decode_answer_stream(response.bytes_stream())))
    }
}

/// Fold a raw byte stream into answer events: frames are peeled off as
/// bytes arrive, interpreted in order, and the stream ends at the first
/// terminal event or at end-of-stream (flushing any residual frame).
pub fn decode_answer_stream<S, B, E>(bytes: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    stream! {
        let mut decoder = FrameDecoder::new();
        let mut bytes = std::pin::pin!(bytes);

        while let Some(next) = bytes.next().await {
            match next {
                Ok(chunk) => {
                    for frame in decoder.push(chunk.as_ref()) {
                        if let Some(event) = parse_frame(&frame) {
                            let terminal = event.is_terminal();
                            yield event;
                            if terminal {
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    yield StreamEvent::Failure(format!("stream read failed: {}", e));
                    return;
                }
            }
        }

        if let Some(frame) = decoder.finish() {
            if let Some(event) = parse_frame(&frame) {
                yield event;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Error bodies carry the message in a `detail` field; fall back to the
/// raw body when the shape differs.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.to_string())
}

fn normalize(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    type ByteChunk = std::result::Result<Vec<u8>, String>;

    async fn decode(chunks: Vec<ByteChunk>) -> Vec<StreamEvent> {
        decode_answer_stream(stream::iter(chunks))
            .collect::<Vec<_>>()
            .await
    }

    #[tokio::test]
    async fn test_frames_split_across_reads() {
        let events = decode(vec![
            Ok(b"data: {\"chunk\":\"ab\"}\n\nda".to_vec()),
            Ok(b"ta: {\"chunk\":\"cd\"}\n\n".to_vec()),
        ])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Chunk("ab".to_string()),
                StreamEvent::Chunk("cd".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_frame_between_valid_chunks() {
        let events = decode(vec![Ok(
            b"data: {\"chunk\":\"He\"}\n\ndata: not-json\n\ndata: {\"chunk\":\"llo\"}\n\n".to_vec(),
        )])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Chunk("He".to_string()),
                StreamEvent::Chunk("llo".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_terminal_frame_ends_stream() {
        let events = decode(vec![Ok(b"data: {\"chunk\":\"a\"}\n\n\
                data: {\"done\":true,\"answer\":\"done\"}\n\n\
                data: {\"chunk\":\"late\"}\n\n"
            .to_vec())])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Chunk("a".to_string()),
                StreamEvent::Final("done".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_error_frame_yields_failure() {
        let events = decode(vec![Ok(b"data: {\"error\":\"overloaded\"}\n\n".to_vec())]).await;
        assert_eq!(
            events,
            vec![StreamEvent::Failure("overloaded".to_string())]
        );
    }

    #[tokio::test]
    async fn test_read_error_yields_failure() {
        let events = decode(vec![
            Ok(b"data: {\"chunk\":\"a\"}\n\n".to_vec()),
            Err("connection reset".to_string()),
        ])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Chunk("a".to_string()),
                StreamEvent::Failure("stream read failed: connection reset".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_residual_terminal_frame_at_eof() {
        // No trailing delimiter: the residue is still a valid data frame.
        let events = decode(vec![Ok(b"data: {\"done\":true,\"answer\":\"bye\"}".to_vec())]).await;
        assert_eq!(events, vec![StreamEvent::Final("bye".to_string())]);
    }

    #[tokio::test]
    async fn test_keep_alive_frames_ignored() {
        let events = decode(vec![Ok(
            b": ping\n\ndata: {\"chunk\":\"hi\"}\n\n: ping\n\n".to_vec()
        )])
        .await;
        assert_eq!(events, vec![StreamEvent::Chunk("hi".to_string())]);
    }

    #[test]
    fn test_error_detail_parses_json_body() {
        assert_eq!(error_detail("{\"detail\":\"not found\"}"), "not found");
        assert_eq!(error_detail("plain text"), "plain text");
    }
}
