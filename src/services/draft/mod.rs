// Draft service
// Click-to-create drafts and the provider payload built from a draft

use chrono::{Duration, NaiveTime, SecondsFormat, Utc};

use crate::models::draft::{CalendarEventDraft, UNTITLED_EVENT};
use crate::models::event::EventTiming;
use crate::services::google::types::{EventDateTime, EventPayload};
use crate::utils::date::{local_instant, parse_zone, Instant, MINUTES_IN_DAY};

pub const NEW_EVENT_TITLE: &str = "New event";

pub fn clamp_minutes(minutes: f64) -> f64 {
    if minutes.is_nan() {
        return 0.0;
    }
    minutes.clamp(0.0, MINUTES_IN_DAY as f64)
}

/// Round a click offset to a whole hour, leaving room for a one-hour block
/// before midnight. Always in `0..=1380`.
pub fn round_minutes_to_nearest_hour(minutes: f64) -> i64 {
    let hour = (clamp_minutes(minutes) / 60.0).round() as i64;
    (hour * 60).min(MINUTES_IN_DAY - 60)
}

/// One-hour block on `day` starting at the hour nearest `clicked_minutes`.
///
/// The hour is a wall-clock hour of the day, so a DST change earlier in the
/// day does not push the block onto the next date. An hour skipped by DST
/// starts at the first valid time after it.
pub fn build_draft_times(day: &Instant, clicked_minutes: f64) -> (Instant, Instant) {
    let hour = (round_minutes_to_nearest_hour(clicked_minutes) / 60) as u32;
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let start = local_instant(day.date_naive(), time, &day.timezone());
    (start, start + Duration::hours(1))
}

impl CalendarEventDraft {
    /// Draft created by clicking an empty slot of the week grid.
    pub fn from_click(calendar_id: impl Into<String>, day: &Instant, clicked_minutes: f64) -> Self {
        let (start, end) = build_draft_times(day, clicked_minutes);
        Self::new(calendar_id, NEW_EVENT_TITLE, EventTiming::Timed { start, end })
    }
}

/// Build the insert/update body for `draft`.
///
/// All-day drafts get date-only boundaries with an exclusive end date. Timed
/// drafts get UTC timestamps plus `zone` so the provider can render them in
/// the user's zone. Fails when `zone` is not a known IANA name.
pub fn build_event_payload(draft: &CalendarEventDraft, zone: &str) -> Result<EventPayload, String> {
    let summary = match draft.title.trim() {
        "" => UNTITLED_EVENT.to_string(),
        title => title.to_string(),
    };

    let (start, end) = match &draft.timing {
        EventTiming::AllDay { start_day, .. } => {
            let end = draft
                .timing
                .exclusive_end_day()
                .ok_or_else(|| "Invalid event date".to_string())?;
            (
                EventDateTime::date(start_day.format("%Y-%m-%d").to_string()),
                EventDateTime::date(end.format("%Y-%m-%d").to_string()),
            )
        }
        EventTiming::Timed { start, end } => {
            let zone = parse_zone(zone).map_err(|_| "Invalid event time".to_string())?;
            let to_utc = |instant: &Instant| {
                instant
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true)
            };
            (
                EventDateTime::date_time(to_utc(start), zone.name()),
                EventDateTime::date_time(to_utc(end), zone.name()),
            )
        }
    };

    Ok(EventPayload {
        summary,
        description: draft.description.clone(),
        location: draft.location.clone(),
        start,
        end,
    })
}
