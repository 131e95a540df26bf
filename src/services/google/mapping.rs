// Provider response mapping
// Turns raw API events into CalendarEvent values in the display zone

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::error::ProviderError;
use super::types::{EventDateTime, RawEvent};
use crate::models::calendar::CalendarListEntry;
use crate::models::event::{CalendarEvent, EventTiming};
use crate::utils::date::{from_naive, parse_zone, Instant};

const DEFAULT_CALENDAR_SUMMARY: &str = "Calendar";

fn parse_date(value: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ProviderError::MalformedEvent(format!("invalid date '{}'", value)))
}

/// Parse a `dateTime` boundary and express it in `zone`.
///
/// Values with an offset are taken as-is; values without one are wall-clock
/// time in the boundary's own `timeZone` (UTC when absent).
fn parse_date_time(boundary: &EventDateTime, value: &str, zone: &Tz) -> Result<Instant, ProviderError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(zone));
    }

    let source_zone = match boundary.time_zone.as_deref() {
        Some(name) if !name.trim().is_empty() => parse_zone(name).map_err(ProviderError::MalformedEvent)?,
        _ => chrono_tz::UTC,
    };

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| from_naive(naive, &source_zone).with_timezone(zone))
        .ok_or_else(|| ProviderError::MalformedEvent(format!("invalid dateTime '{}'", value)))
}

fn map_timing(raw: &RawEvent, zone: &Tz) -> Result<EventTiming, ProviderError> {
    match (&raw.start.date, &raw.end.date) {
        (Some(start), Some(end)) => {
            let timing = EventTiming::from_exclusive_end(parse_date(start)?, parse_date(end)?);
            return timing.map_err(ProviderError::MalformedEvent);
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ProviderError::MalformedEvent(format!(
                "event {} mixes date and dateTime boundaries",
                raw.id
            )));
        }
        (None, None) => {}
    }

    let (Some(start), Some(end)) = (&raw.start.date_time, &raw.end.date_time) else {
        return Err(ProviderError::MalformedEvent(format!("event {} has no start or end", raw.id)));
    };

    let start = parse_date_time(&raw.start, start, zone)?;
    let end = parse_date_time(&raw.end, end, zone)?;
    // Zero-length events are kept; layout drops them per day
    if end < start {
        return Err(ProviderError::MalformedEvent(format!("event {} ends before it starts", raw.id)));
    }
    Ok(EventTiming::Timed { start, end })
}

/// Map a raw provider event from `calendar_id` into the display `zone`.
pub fn map_raw_event(
    raw: &RawEvent,
    calendar_id: &str,
    calendar: Option<&CalendarListEntry>,
    zone: &Tz,
) -> Result<CalendarEvent, ProviderError> {
    let timing = map_timing(raw, zone)?;

    let summary = calendar
        .map(|entry| entry.summary.as_str())
        .filter(|summary| !summary.is_empty())
        .unwrap_or(DEFAULT_CALENDAR_SUMMARY);

    Ok(CalendarEvent {
        id: format!("{}-{}", calendar_id, raw.id),
        external_id: raw.id.clone(),
        calendar_id: calendar_id.to_string(),
        calendar_summary: summary.to_string(),
        title: raw
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(crate::models::draft::UNTITLED_EVENT)
            .to_string(),
        timing,
        hangout_link: raw.hangout_link.clone(),
        location: raw.location.clone(),
        description: raw.description.clone(),
        color: calendar.and_then(|entry| entry.background_color.clone()),
    })
}

/// Map every event of a calendar, skipping (and logging) malformed ones.
pub fn map_raw_events(
    raws: &[RawEvent],
    calendar_id: &str,
    calendar: Option<&CalendarListEntry>,
    zone: &Tz,
) -> Vec<CalendarEvent> {
    raws.iter()
        .filter_map(|raw| match map_raw_event(raw, calendar_id, calendar, zone) {
            Ok(event) => Some(event),
            Err(err) => {
                log::warn!("Skipping event {} from {}: {}", raw.id, calendar_id, err);
                None
            }
        })
        .collect()
}
