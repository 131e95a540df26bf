//! Calendar data store.
//!
//! Holds the calendar list, the selected calendars and the events of the
//! visible range. Mutations always finish with a full re-fetch of the range,
//! so the stored events only ever reflect what the provider confirmed.
//! Provider failures are kept as an error message and never clear the
//! events already loaded.

use chrono::{SecondsFormat, Utc};
use chrono_tz::Tz;
use futures::future::try_join_all;
use thiserror::Error;

use crate::models::calendar::CalendarListEntry;
use crate::models::draft::CalendarEventDraft;
use crate::models::event::CalendarEvent;
use crate::models::view::DateRange;
use crate::services::draft::build_event_payload;
use crate::services::google::{map_raw_events, EventsProvider, ListEventsQuery, ProviderError};

#[derive(Debug, Error)]
pub enum DataError {
    /// Rejected before anything was sent
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct CalendarDataService<P: EventsProvider> {
    provider: P,
    zone: Tz,
    token: Option<String>,
    calendars: Vec<CalendarListEntry>,
    selected_calendar_ids: Vec<String>,
    events: Vec<CalendarEvent>,
    range: Option<DateRange>,
    loaded_range_key: Option<String>,
    loading_calendars: bool,
    loading_events: bool,
    error: Option<String>,
}

impl<P: EventsProvider> CalendarDataService<P> {
    pub fn new(provider: P, zone: Tz) -> Self {
        Self {
            provider,
            zone,
            token: None,
            calendars: Vec::new(),
            selected_calendar_ids: Vec::new(),
            events: Vec::new(),
            range: None,
            loaded_range_key: None,
            loading_calendars: false,
            loading_events: false,
            error: None,
        }
    }

    pub fn calendars(&self) -> &[CalendarListEntry] {
        &self.calendars
    }

    pub fn selected_calendar_ids(&self) -> &[String] {
        &self.selected_calendar_ids
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading_calendars(&self) -> bool {
        self.loading_calendars
    }

    pub fn is_loading_events(&self) -> bool {
        self.loading_events
    }

    pub fn zone(&self) -> &Tz {
        &self.zone
    }

    /// Replace the access token. Signing out clears everything.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|token| !token.trim().is_empty());
        if self.token.is_none() {
            self.calendars.clear();
            self.selected_calendar_ids.clear();
            self.events.clear();
            self.loaded_range_key = None;
            self.loading_calendars = false;
            self.loading_events = false;
        }
    }

    pub fn toggle_calendar(&mut self, id: &str) {
        if let Some(index) = self.selected_calendar_ids.iter().position(|selected| selected == id) {
            self.selected_calendar_ids.remove(index);
        } else {
            self.selected_calendar_ids.push(id.to_string());
        }
        // Selection changed, so the loaded events no longer match
        self.loaded_range_key = None;
    }

    /// Calendar new events go to: the first selected one, else the first listed.
    pub fn default_calendar_id(&self) -> Option<&str> {
        self.selected_calendar_ids
            .first()
            .map(String::as_str)
            .or_else(|| self.calendars.first().map(|calendar| calendar.id.as_str()))
    }

    pub async fn refresh_calendars(&mut self) -> Result<(), DataError> {
        let Some(token) = self.token.clone() else {
            return Ok(());
        };

        self.loading_calendars = true;
        let result = self.provider.list_calendars(&token).await;
        self.loading_calendars = false;

        match result {
            Ok(calendars) => {
                self.selected_calendar_ids =
                    CalendarListEntry::reconcile_selection(&self.selected_calendar_ids, &calendars);
                self.calendars = calendars;
                self.loaded_range_key = None;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to load calendars: {}", err);
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Fetch `range` unless it is the range already loaded.
    pub async fn ensure_range(&mut self, range: DateRange) -> Result<(), DataError> {
        let key = range.key();
        self.range = Some(range);
        if self.loaded_range_key.as_deref() == Some(key.as_str()) {
            return Ok(());
        }
        self.refresh_events().await
    }

    /// Re-fetch every selected calendar for the current range.
    pub async fn refresh_events(&mut self) -> Result<(), DataError> {
        let (Some(token), Some(range)) = (self.token.clone(), self.range.clone()) else {
            self.events.clear();
            return Ok(());
        };
        if self.selected_calendar_ids.is_empty() {
            self.events.clear();
            self.loaded_range_key = Some(range.key());
            return Ok(());
        }

        self.loading_events = true;
        let result = self.fetch_range(&token, &range).await;
        self.loading_events = false;

        match result {
            Ok(events) => {
                self.events = events;
                self.loaded_range_key = Some(range.key());
                self.error = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to load events: {}", err);
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    async fn fetch_range(&self, token: &str, range: &DateRange) -> Result<Vec<CalendarEvent>, ProviderError> {
        if range.end < range.start {
            return Err(ProviderError::InvalidRange);
        }

        let query = ListEventsQuery {
            time_min: range.start.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
            time_max: range.end.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
            time_zone: self.zone.name().to_string(),
        };

        let fetches = self.selected_calendar_ids.iter().map(|calendar_id| {
            let query = &query;
            async move {
                let raws = self.provider.list_events(token, calendar_id, query).await?;
                let calendar = self.calendars.iter().find(|calendar| &calendar.id == calendar_id);
                Ok::<_, ProviderError>(map_raw_events(&raws, calendar_id, calendar, &self.zone))
            }
        });

        let mut events: Vec<CalendarEvent> = try_join_all(fetches).await?.into_iter().flatten().collect();
        events.sort_by_key(|event| event.start_in(&self.zone));
        Ok(events)
    }

    /// Run a provider mutation, then re-fetch the range. Errors are stored
    /// and the current events are kept.
    async fn after_mutation(&mut self, result: Result<(), ProviderError>) -> Result<(), DataError> {
        if let Err(err) = result {
            log::warn!("Event update failed: {}", err);
            self.error = Some(err.to_string());
            return Err(err.into());
        }

        self.loaded_range_key = None;
        self.refresh_events().await
    }

    fn require_token(&mut self) -> Result<String, DataError> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => {
                self.error = Some(ProviderError::NotAuthenticated.to_string());
                Err(ProviderError::NotAuthenticated.into())
            }
        }
    }

    pub async fn create_event(&mut self, draft: &CalendarEventDraft) -> Result<(), DataError> {
        let draft = draft.normalized().map_err(DataError::Invalid)?;
        let payload = build_event_payload(&draft, self.zone.name()).map_err(DataError::Invalid)?;
        let token = self.require_token()?;

        self.loading_events = true;
        let result = self
            .provider
            .create_event(&token, &draft.calendar_id, &payload)
            .await
            .map(|_| ());
        self.loading_events = false;
        self.after_mutation(result).await
    }

    /// Save `draft` over the existing `event`.
    pub async fn update_event(&mut self, event: &CalendarEvent, draft: &CalendarEventDraft) -> Result<(), DataError> {
        let draft = draft.normalized().map_err(DataError::Invalid)?;
        let payload = build_event_payload(&draft, self.zone.name()).map_err(DataError::Invalid)?;
        let token = self.require_token()?;

        self.loading_events = true;
        let result = self
            .provider
            .update_event(&token, &event.calendar_id, &event.external_id, &payload)
            .await
            .map(|_| ());
        self.loading_events = false;
        self.after_mutation(result).await
    }

    pub async fn delete_event(&mut self, event: &CalendarEvent) -> Result<(), DataError> {
        let token = self.require_token()?;

        self.loading_events = true;
        let result = self
            .provider
            .delete_event(&token, &event.calendar_id, &event.external_id)
            .await;
        self.loading_events = false;
        self.after_mutation(result).await
    }
}
