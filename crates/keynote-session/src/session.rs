//! Conversation session state machine.

use std::sync::Arc;

use futures::StreamExt;
use keynote_ai::{EventContext, StreamEvent};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    transcript::{Transcript, TranscriptEntry},
    transport::QuestionTransport,
};

/// Lifecycle of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
    Streaming,
    Completed,
    Failed,
}

impl SessionState {
    /// Whether a new question may be submitted in this state
    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::Completed | SessionState::Failed
        )
    }
}

/// Callback invoked with the live assistant entry after each reduction
pub type UpdateObserver = Box<dyn FnMut(&TranscriptEntry) + Send>;

/// One chat session scoped to a single event.
///
/// Owns the transcript and the session lifecycle; exactly one question is
/// in flight at a time, and all transcript mutation happens on the task
/// driving [`ChatSession::submit`]. Dropping the session mid-stream drops
/// the read loop with it, so a late chunk can never touch the transcript.
pub struct ChatSession {
    context: EventContext,
    transport: Arc<dyn QuestionTransport>,
    transcript: Transcript,
    state: SessionState,
    cancel: CancellationToken,
    on_update: Option<UpdateObserver>,
}

impl ChatSession {
    /// Create a session for one event
    pub fn new(context: EventContext, transport: Arc<dyn QuestionTransport>) -> Self {
        Self {
            context,
            transport,
            transcript: Transcript::new(),
            state: SessionState::Idle,
            cancel: CancellationToken::new(),
            on_update: None,
        }
    }

    /// Register an observer called with the live assistant entry after
    /// each transcript mutation.
    pub fn on_update(&mut self, observer: impl FnMut(&TranscriptEntry) + Send + 'static) {
        self.on_update = Some(Box::new(observer));
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    /// Token that aborts the in-flight question when cancelled. A
    /// cancelled token is replaced on the next submission, so prior
    /// cancellation never blocks future questions.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submit a question and drive the answer stream to completion.
    ///
    /// Both transcript entries are appended synchronously, before any
    /// network activity. Transport rejection and stream failures land in
    /// the transcript and set the session to `Failed`; they are terminal
    /// to the current question only and never poison later submissions.
    pub async fn submit(&mut self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }
        if !self.state.can_submit() {
            return Err(Error::Busy);
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        self.transcript.begin_exchange(question);
        self.state = SessionState::Sending;
        self.notify();

        let mut stream = match self.transport.ask(&self.context, question).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Question rejected by transport: {}", e);
                self.fail(e.to_string());
                return Ok(());
            }
        };

        self.state = SessionState::Streaming;
        tracing::debug!("Streaming answer for question of {} chars", question.len());
        let cancel = self.cancel.clone();

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => {
                    self.fail("request cancelled".to_string());
                    return Ok(());
                }
                event = stream.next() => event,
            };

            let Some(event) = event else {
                // End-of-stream without a terminal frame: keep what
                // accumulated and close the entry.
                self.transcript.close();
                self.state = SessionState::Completed;
                return Ok(());
            };

            let next_state = match &event {
                StreamEvent::Chunk(_) => SessionState::Streaming,
                StreamEvent::Final(_) => SessionState::Completed,
                StreamEvent::Failure(_) => SessionState::Failed,
            };
            self.transcript.apply(event);
            self.notify();
            self.state = next_state;

            if next_state != SessionState::Streaming {
                return Ok(());
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.transcript.apply(StreamEvent::Failure(message));
        self.notify();
        self.state = SessionState::Failed;
    }

    fn notify(&mut self) {
        if let Some(observer) = self.on_update.as_mut() {
            if let Some(entry) = self.transcript.entries().last() {
                observer(entry);
            }
        }
    }
}
