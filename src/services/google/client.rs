use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::ProviderError;
use super::types::{CalendarListResponse, EventListResponse, EventPayload, ListEventsQuery, RawEvent};
use super::EventsProvider;
use crate::models::calendar::CalendarListEntry;
use crate::models::settings::GOOGLE_API_BASE;

const CALENDAR_PAGE_SIZE: &str = "50";
const EVENT_PAGE_SIZE: &str = "2500";

/// Google Calendar v3 REST client authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(GOOGLE_API_BASE)
    }

    /// Client against a different API root (e.g. a local mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(Duration::from_secs(20)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: &str) -> Result<RequestBuilder, ProviderError> {
        if token.trim().is_empty() {
            return Err(ProviderError::NotAuthenticated);
        }
        log::debug!("{} {}{}", method, self.base_url, path);
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token))
    }

    async fn check(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ProviderError::from_response_body(status, &body);
        log::warn!("Google API request failed: {}", error);
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| ProviderError::InvalidResponse(err.to_string()))
    }

    fn events_path(calendar_id: &str) -> String {
        format!("/calendars/{}/events", urlencoding::encode(calendar_id))
    }

    fn event_path(calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/{}",
            Self::events_path(calendar_id),
            urlencoding::encode(event_id)
        )
    }
}

#[async_trait]
impl EventsProvider for GoogleCalendarClient {
    async fn list_calendars(&self, token: &str) -> Result<Vec<CalendarListEntry>, ProviderError> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, "/users/me/calendarList", token)?
                .query(&[("maxResults", CALENDAR_PAGE_SIZE)]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let page: CalendarListResponse = Self::send_json(request).await?;
            calendars.extend(page.items.into_iter().map(CalendarListEntry::from));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        log::debug!("Loaded {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        query: &ListEventsQuery,
    ) -> Result<Vec<RawEvent>, ProviderError> {
        let path = Self::events_path(calendar_id);
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request(Method::GET, &path, token)?.query(&[
                ("timeMin", query.time_min.as_str()),
                ("timeMax", query.time_max.as_str()),
                ("timeZone", query.time_zone.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("showDeleted", "false"),
                ("maxResults", EVENT_PAGE_SIZE),
            ]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let page: EventListResponse = Self::send_json(request).await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        log::debug!("Loaded {} events from {}", events.len(), calendar_id);
        Ok(events)
    }

    async fn create_event(
        &self,
        token: &str,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> Result<RawEvent, ProviderError> {
        let request = self
            .request(Method::POST, &Self::events_path(calendar_id), token)?
            .json(payload);
        let created: RawEvent = Self::send_json(request).await?;
        log::info!("Created event {} in {}", created.id, calendar_id);
        Ok(created)
    }

    async fn update_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<RawEvent, ProviderError> {
        let request = self
            .request(Method::PATCH, &Self::event_path(calendar_id, event_id), token)?
            .json(payload);
        let updated: RawEvent = Self::send_json(request).await?;
        log::info!("Updated event {} in {}", event_id, calendar_id);
        Ok(updated)
    }

    async fn delete_event(&self, token: &str, calendar_id: &str, event_id: &str) -> Result<(), ProviderError> {
        let request = self.request(Method::DELETE, &Self::event_path(calendar_id, event_id), token)?;
        Self::check(request.send().await?).await?;
        log::info!("Deleted event {} from {}", event_id, calendar_id);
        Ok(())
    }
}
