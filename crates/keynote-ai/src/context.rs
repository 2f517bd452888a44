//! Event context injected into every question.

use chrono::{DateTime, Utc};

/// Immutable snapshot of the event a chat session is scoped to, taken
/// when the chat is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub event_name: String,
    pub organizer: String,
    pub chief_guest: String,
    pub venue: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub transcription: Option<String>,
}

impl EventContext {
    /// Render the context block sent with every question. Absent optional
    /// fields omit their line entirely.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Event: {}", self.event_name),
            format!("Organizer: {}", self.organizer),
            format!("Chief Guest: {}", self.chief_guest),
        ];
        if let Some(venue) = &self.venue {
            lines.push(format!("Venue: {}", venue));
        }
        lines.push(format!("Start: {}", format_time(self.start_time)));
        lines.push(format!("End: {}", format_time(self.end_time)));
        if let Some(transcription) = &self.transcription {
            lines.push(format!("Transcription: {}", transcription));
        }
        lines.join("\n")
    }

    /// Combine the context block and the question into the request prompt.
    pub fn prompt(&self, question: &str) -> String {
        format!("Context: {}\n\nQuestion: {}", self.render(), question)
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}
