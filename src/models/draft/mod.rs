// Draft module
// In-progress edit of a new or existing event

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::models::event::{CalendarEvent, EventTiming};
use crate::utils::date::from_naive;

pub const UNTITLED_EVENT: &str = "Untitled event";

const FORM_DATE: &str = "%Y-%m-%d";
const FORM_DATETIME: &str = "%Y-%m-%dT%H:%M";

/// Unsaved event edit. Carries back-reference ids when editing an existing event.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventDraft {
    pub calendar_id: String,
    pub title: String,
    pub timing: EventTiming,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Id of the event being edited (`<calendar_id>-<external_id>`)
    pub event_id: Option<String>,
    /// Provider id of the event being edited
    pub external_id: Option<String>,
}

impl CalendarEventDraft {
    pub fn new(calendar_id: impl Into<String>, title: impl Into<String>, timing: EventTiming) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            title: title.into(),
            timing,
            location: None,
            description: None,
            event_id: None,
            external_id: None,
        }
    }

    /// Draft for editing `event` in place.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            calendar_id: event.calendar_id.clone(),
            title: event.title.clone(),
            timing: event.timing.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            event_id: Some(event.id.clone()),
            external_id: Some(event.external_id.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.external_id.is_some()
    }

    /// Same draft moved by `minutes`, as produced by a committed drag.
    pub fn with_shift(mut self, minutes: i64) -> Self {
        self.timing = self.timing.shifted(minutes);
        self
    }

    /// Validate and tidy the draft before it is sent to the provider.
    ///
    /// Blank titles become [`UNTITLED_EVENT`]; blank location and description
    /// are dropped.
    pub fn normalized(&self) -> Result<Self, String> {
        if self.calendar_id.trim().is_empty() {
            return Err("Choose a calendar for the event".to_string());
        }

        let timing = match &self.timing {
            EventTiming::Timed { start, end } => EventTiming::timed(*start, *end)?,
            EventTiming::AllDay {
                start_day,
                end_day_inclusive,
            } => EventTiming::all_day(*start_day, *end_day_inclusive)?,
        };

        let title = match self.title.trim() {
            "" => UNTITLED_EVENT.to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Self {
            calendar_id: self.calendar_id.clone(),
            title,
            timing,
            location: non_blank(self.location.as_deref()),
            description: non_blank(self.description.as_deref()),
            event_id: self.event_id.clone(),
            external_id: self.external_id.clone(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Parse all-day editor values (`YYYY-MM-DD`, end date exclusive).
pub fn parse_all_day_form(start_date: &str, end_date_exclusive: &str) -> Result<EventTiming, String> {
    let start = NaiveDate::parse_from_str(start_date.trim(), FORM_DATE);
    let end = NaiveDate::parse_from_str(end_date_exclusive.trim(), FORM_DATE);
    let (Ok(start), Ok(end)) = (start, end) else {
        return Err("Enter valid dates".to_string());
    };

    if end <= start {
        return Err("End must be after start".to_string());
    }

    EventTiming::from_exclusive_end(start, end)
}

/// Parse timed editor values (`YYYY-MM-DDTHH:MM`) as wall-clock time in `zone`.
pub fn parse_timed_form(start: &str, end: &str, zone: &Tz) -> Result<EventTiming, String> {
    let start = NaiveDateTime::parse_from_str(start.trim(), FORM_DATETIME);
    let end = NaiveDateTime::parse_from_str(end.trim(), FORM_DATETIME);
    let (Ok(start), Ok(end)) = (start, end) else {
        return Err("Enter valid times".to_string());
    };

    EventTiming::timed(from_naive(start, zone), from_naive(end, zone))
}

/// Editor values for an all-day timing: start date and exclusive end date.
pub fn all_day_form_values(timing: &EventTiming) -> Option<(String, String)> {
    match timing {
        EventTiming::AllDay { start_day, .. } => {
            let end = timing.exclusive_end_day()?;
            Some((
                start_day.format(FORM_DATE).to_string(),
                end.format(FORM_DATE).to_string(),
            ))
        }
        EventTiming::Timed { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Timelike};
    use chrono_tz::{Europe, UTC};

    use crate::utils::date::local_instant;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timed(h1: u32, h2: u32) -> EventTiming {
        let day = date(2024, 7, 10);
        EventTiming::Timed {
            start: local_instant(day, NaiveTime::from_hms_opt(h1, 0, 0).unwrap(), &UTC),
            end: local_instant(day, NaiveTime::from_hms_opt(h2, 0, 0).unwrap(), &UTC),
        }
    }

    #[test]
    fn test_normalized_fills_title_and_drops_blanks() {
        let mut draft = CalendarEventDraft::new("primary", "   ", timed(9, 10));
        draft.location = Some("  ".to_string());
        draft.description = Some(" Agenda ".to_string());

        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.title, UNTITLED_EVENT);
        assert_eq!(normalized.location, None);
        assert_eq!(normalized.description.as_deref(), Some("Agenda"));
    }

    #[test]
    fn test_normalized_rejects_inverted_times() {
        let draft = CalendarEventDraft::new("primary", "Meeting", timed(10, 9));
        assert_eq!(draft.normalized().unwrap_err(), "End must be after start");
    }

    #[test]
    fn test_normalized_requires_calendar() {
        let draft = CalendarEventDraft::new(" ", "Meeting", timed(9, 10));
        assert!(draft.normalized().is_err());
    }

    #[test]
    fn test_with_shift_moves_both_ends() {
        let draft = CalendarEventDraft::new("primary", "Meeting", timed(9, 10)).with_shift(30);
        assert_eq!(draft.timing, timed(9, 10).shifted(30));
    }

    #[test]
    fn test_from_event_targets_existing_event() {
        let event = CalendarEvent::builder()
            .external_id("abc")
            .calendar("work", "Work")
            .title("Standup")
            .timing(timed(9, 10))
            .location("Room 4")
            .build()
            .unwrap();

        let draft = CalendarEventDraft::from_event(&event).with_shift(-60);
        assert!(draft.is_edit());
        assert_eq!(draft.event_id.as_deref(), Some("work-abc"));
        assert_eq!(draft.external_id.as_deref(), Some("abc"));
        assert_eq!(draft.location.as_deref(), Some("Room 4"));
        assert_eq!(draft.timing, timed(8, 9));
    }

    #[test]
    fn test_parse_all_day_form_converts_exclusive_end() {
        let timing = parse_all_day_form("2024-07-10", "2024-07-13").unwrap();
        assert_eq!(
            timing,
            EventTiming::AllDay {
                start_day: date(2024, 7, 10),
                end_day_inclusive: date(2024, 7, 12),
            }
        );
        assert_eq!(
            all_day_form_values(&timing),
            Some(("2024-07-10".to_string(), "2024-07-13".to_string()))
        );
    }

    #[test]
    fn test_parse_all_day_form_errors() {
        assert_eq!(parse_all_day_form("nope", "2024-07-13").unwrap_err(), "Enter valid dates");
        assert_eq!(
            parse_all_day_form("2024-07-10", "2024-07-10").unwrap_err(),
            "End must be after start"
        );
    }

    #[test]
    fn test_parse_timed_form_uses_zone() {
        let timing = parse_timed_form("2024-07-10T09:00", "2024-07-10T10:30", &Europe::Helsinki).unwrap();
        match timing {
            EventTiming::Timed { start, end } => {
                assert_eq!(start.hour(), 9);
                assert_eq!(start.timezone(), Europe::Helsinki);
                assert_eq!((end - start).num_minutes(), 90);
            }
            EventTiming::AllDay { .. } => panic!("expected timed event"),
        }
    }

    #[test]
    fn test_parse_timed_form_errors() {
        assert_eq!(
            parse_timed_form("2024-07-10 09:00", "2024-07-10T10:00", &UTC).unwrap_err(),
            "Enter valid times"
        );
        assert_eq!(
            parse_timed_form("2024-07-10T10:00", "2024-07-10T09:00", &UTC).unwrap_err(),
            "End must be after start"
        );
    }
}
