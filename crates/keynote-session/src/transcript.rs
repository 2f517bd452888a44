//! Conversation transcript and stream-event reduction.

use keynote_ai::StreamEvent;
use serde::{Deserialize, Serialize};

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// Handle to a transcript entry, returned at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(usize);

/// Ordered conversation transcript with at most one open assistant entry.
///
/// Entries are never reordered or removed; a closed assistant entry is
/// immutable for the remainder of the session.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    open: Option<EntryId>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user entry plus an empty assistant entry for one
    /// exchange, and return the handle to the assistant entry. That
    /// entry stays open until a terminal event closes it.
    pub fn begin_exchange(&mut self, question: impl Into<String>) -> EntryId {
        self.entries.push(TranscriptEntry {
            role: Role::User,
            content: question.into(),
        });
        let id = EntryId(self.entries.len());
        self.entries.push(TranscriptEntry {
            role: Role::Assistant,
            content: String::new(),
        });
        self.open = Some(id);
        id
    }

    /// Fold one stream event into the open assistant entry. Chunks
    /// accumulate; `Final` and `Failure` replace the content wholesale
    /// and close the entry. Without an open entry this is a no-op.
    pub fn apply(&mut self, event: StreamEvent) {
        let Some(EntryId(index)) = self.open else {
            return;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };

        match event {
            StreamEvent::Chunk(text) => entry.content.push_str(&text),
            StreamEvent::Final(answer) => {
                entry.content = answer;
                self.open = None;
            }
            StreamEvent::Failure(message) => {
                entry.content = format!("Sorry, I encountered an error: {}", message);
                self.open = None;
            }
        }
    }

    /// Close the open entry without further mutation (normal
    /// end-of-stream with no terminal frame).
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Whether an assistant entry is still streaming
    pub fn has_open_entry(&self) -> bool {
        self.open.is_some()
    }

    /// All entries, in insertion order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Look up an entry by its handle
    pub fn entry(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_exchange_appends_user_and_open_assistant() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_exchange("What time?");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].role, Role::User);
        assert_eq!(transcript.entries()[0].content, "What time?");
        let assistant = transcript.entry(id).unwrap();
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.content, "");
        assert!(transcript.has_open_entry());
    }

    #[test]
    fn test_chunks_accumulate() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_exchange("q");
        transcript.apply(StreamEvent::Chunk("He".to_string()));
        transcript.apply(StreamEvent::Chunk("llo".to_string()));

        assert_eq!(transcript.entry(id).unwrap().content, "Hello");
        assert!(transcript.has_open_entry());
    }

    #[test]
    fn test_final_overrides_accumulated_content() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_exchange("q");
        transcript.apply(StreamEvent::Chunk("Hel".to_string()));
        transcript.apply(StreamEvent::Final("Goodbye".to_string()));

        assert_eq!(transcript.entry(id).unwrap().content, "Goodbye");
        assert!(!transcript.has_open_entry());
    }

    #[test]
    fn test_failure_replaces_content_with_error_message() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_exchange("q");
        transcript.apply(StreamEvent::Chunk("partial".to_string()));
        transcript.apply(StreamEvent::Failure("boom".to_string()));

        assert_eq!(
            transcript.entry(id).unwrap().content,
            "Sorry, I encountered an error: boom"
        );
        assert!(!transcript.has_open_entry());
    }

    #[test]
    fn test_apply_after_close_is_a_no_op() {
        let mut transcript = Transcript::new();
        let id = transcript.begin_exchange("q");
        transcript.apply(StreamEvent::Final("done".to_string()));
        transcript.apply(StreamEvent::Chunk("late".to_string()));

        assert_eq!(transcript.entry(id).unwrap().content, "done");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_apply_without_open_entry_is_a_no_op() {
        let mut transcript = Transcript::new();
        transcript.apply(StreamEvent::Chunk("orphan".to_string()));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_new_exchange_leaves_prior_entries_untouched() {
        let mut transcript = Transcript::new();
        let first = transcript.begin_exchange("one");
        transcript.apply(StreamEvent::Final("answer one".to_string()));
        let second = transcript.begin_exchange("two");
        transcript.apply(StreamEvent::Chunk("ans".to_string()));

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.entry(first).unwrap().content, "answer one");
        assert_eq!(transcript.entry(second).unwrap().content, "ans");
    }
}
