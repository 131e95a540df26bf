//! Google Calendar events provider.
//!
//! [`EventsProvider`] is the seam the calendar data store talks to;
//! [`GoogleCalendarClient`] implements it over the v3 REST API.

pub mod client;
pub mod error;
pub mod mapping;
pub mod types;

use async_trait::async_trait;

use crate::models::calendar::CalendarListEntry;

pub use client::GoogleCalendarClient;
pub use error::ProviderError;
pub use mapping::{map_raw_event, map_raw_events};
pub use types::{EventDateTime, EventPayload, ListEventsQuery, RawEvent};

/// Remote calendar backend. Every call fails with a descriptive error on a
/// non-success response and is never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsProvider: Send + Sync {
    async fn list_calendars(&self, token: &str) -> Result<Vec<CalendarListEntry>, ProviderError>;

    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        query: &ListEventsQuery,
    ) -> Result<Vec<RawEvent>, ProviderError>;

    async fn create_event(
        &self,
        token: &str,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> Result<RawEvent, ProviderError>;

    async fn update_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<RawEvent, ProviderError>;

    async fn delete_event(&self, token: &str, calendar_id: &str, event_id: &str) -> Result<(), ProviderError>;
}
