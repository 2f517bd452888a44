//! Transport abstraction for submitting questions.

use async_trait::async_trait;
use keynote_ai::{AnswerStream, AskClient, EventContext};

/// Transport that submits a question and returns the answer stream.
///
/// Transport-level status is surfaced by `ask` itself, before any frame
/// is decoded. The HTTP client implements this directly; tests substitute
/// scripted transports.
#[async_trait]
pub trait QuestionTransport: Send + Sync {
    async fn ask(
        &self,
        context: &EventContext,
        question: &str,
    ) -> keynote_ai::Result<AnswerStream>;
}

#[async_trait]
impl QuestionTransport for AskClient {
    async fn ask(
        &self,
        context: &EventContext,
        question: &str,
    ) -> keynote_ai::Result<AnswerStream> {
        AskClient::ask(self, context, question).await
    }
}
