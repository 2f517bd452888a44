//! Thin client for the events REST API.
//!
//! Read-only surface: just enough to pick the event a chat session is
//! scoped to. Event CRUD lives elsewhere.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use keynote_ai::EventContext;
use serde::Deserialize;

/// Event record as returned by the events API
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub event_name: String,
    pub organizer: String,
    pub chief_guest_name: String,
    #[serde(default)]
    pub venue: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub transcription: Option<String>,
}

impl EventRecord {
    /// Snapshot this record into the immutable chat context.
    pub fn to_context(&self) -> EventContext {
        EventContext {
            event_name: self.event_name.clone(),
            organizer: self.organizer.clone(),
            chief_guest: self.chief_guest_name.clone(),
            venue: self.venue.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            transcription: self.transcription.clone(),
        }
    }
}

/// Upcoming and recent events
#[derive(Debug, Deserialize)]
pub struct DashboardSummary {
    pub upcoming: Vec<EventRecord>,
    pub recent: Vec<EventRecord>,
}

/// Client for the event CRUD API
pub struct EventsClient {
    client: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// List events for one month
    pub async fn list_events(&self, month: u32, year: i32) -> Result<Vec<EventRecord>> {
        let url = format!("{}/events/", self.base_url);
        tracing::debug!("Fetching events from {} ({}/{})", url, month, year);

        let response = self
            .client
            .get(&url)
            .query(&[("month", month.to_string()), ("year", year.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("events API returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    /// Fetch the dashboard summary (upcoming and recent events)
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let url = format!("{}/dashboard/summary", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            bail!("events API returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    /// Find one event by id in a month's listing
    pub async fn find_event(&self, id: i64, month: u32, year: i32) -> Result<EventRecord> {
        let events = self.list_events(month, year).await?;
        events
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow!("event {} not found in {}/{}", id, month, year))
    }
}
