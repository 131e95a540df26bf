// Event module
// Calendar event model as delivered by the events provider

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use crate::utils::date::{day_end, day_start, Instant};

/// When an event happens.
///
/// All-day events are stored with an inclusive last day. The provider wire
/// format uses an exclusive end date; convert with [`EventTiming::from_exclusive_end`]
/// and [`EventTiming::exclusive_end_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTiming {
    AllDay {
        start_day: NaiveDate,
        end_day_inclusive: NaiveDate,
    },
    Timed {
        start: Instant,
        end: Instant,
    },
}

impl EventTiming {
    /// Create a timed range, rejecting `end <= start`.
    pub fn timed(start: Instant, end: Instant) -> Result<Self, String> {
        if end <= start {
            return Err("End must be after start".to_string());
        }
        Ok(Self::Timed { start, end })
    }

    /// Create an all-day range covering `start_day..=end_day_inclusive`.
    pub fn all_day(start_day: NaiveDate, end_day_inclusive: NaiveDate) -> Result<Self, String> {
        if end_day_inclusive < start_day {
            return Err("End must be after start".to_string());
        }
        Ok(Self::AllDay {
            start_day,
            end_day_inclusive,
        })
    }

    /// Build an all-day range from a wire-style exclusive end date.
    pub fn from_exclusive_end(start_day: NaiveDate, end_day_exclusive: NaiveDate) -> Result<Self, String> {
        let end_day_inclusive = end_day_exclusive
            .pred_opt()
            .ok_or_else(|| "End date is out of range".to_string())?;
        Self::all_day(start_day, end_day_inclusive)
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay { .. })
    }

    /// Exclusive end date for all-day ranges, `None` for timed ones.
    pub fn exclusive_end_day(&self) -> Option<NaiveDate> {
        match self {
            Self::AllDay {
                end_day_inclusive, ..
            } => end_day_inclusive.succ_opt(),
            Self::Timed { .. } => None,
        }
    }

    /// Start instant expressed in `zone`. All-day ranges start at day start.
    pub fn start_in(&self, zone: &Tz) -> Instant {
        match self {
            Self::AllDay { start_day, .. } => day_start(*start_day, zone),
            Self::Timed { start, .. } => start.with_timezone(zone),
        }
    }

    /// End instant expressed in `zone`. All-day ranges end on the last
    /// millisecond of their last included day.
    pub fn end_in(&self, zone: &Tz) -> Instant {
        match self {
            Self::AllDay {
                end_day_inclusive, ..
            } => day_end(*end_day_inclusive, zone),
            Self::Timed { end, .. } => end.with_timezone(zone),
        }
    }

    /// Whether the range touches `day` (both ends inclusive).
    pub fn intersects_day(&self, day: NaiveDate, zone: &Tz) -> bool {
        match self {
            Self::AllDay {
                start_day,
                end_day_inclusive,
            } => *start_day <= day && day <= *end_day_inclusive,
            Self::Timed { start, end } => *start <= day_end(day, zone) && *end >= day_start(day, zone),
        }
    }

    /// Move a timed range by `minutes`, keeping its duration. All-day ranges are unchanged.
    pub fn shifted(&self, minutes: i64) -> Self {
        match self {
            Self::Timed { start, end } => Self::Timed {
                start: *start + Duration::minutes(minutes),
                end: *end + Duration::minutes(minutes),
            },
            all_day => all_day.clone(),
        }
    }
}

/// Calendar event normalized from a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Unique across calendars: `<calendar_id>-<external_id>`
    pub id: String,
    /// Provider-specific event id
    pub external_id: String,
    pub calendar_id: String,
    pub calendar_summary: String,
    pub title: String,
    pub timing: EventTiming,
    pub hangout_link: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl CalendarEvent {
    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn is_all_day(&self) -> bool {
        self.timing.is_all_day()
    }

    pub fn start_in(&self, zone: &Tz) -> Instant {
        self.timing.start_in(zone)
    }

    pub fn end_in(&self, zone: &Tz) -> Instant {
        self.timing.end_in(zone)
    }

    pub fn occurs_on(&self, day: NaiveDate, zone: &Tz) -> bool {
        self.timing.intersects_day(day, zone)
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    external_id: Option<String>,
    calendar_id: Option<String>,
    calendar_summary: Option<String>,
    title: Option<String>,
    timing: Option<EventTiming>,
    hangout_link: Option<String>,
    location: Option<String>,
    description: Option<String>,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            external_id: None,
            calendar_id: None,
            calendar_summary: None,
            title: None,
            timing: None,
            hangout_link: None,
            location: None,
            description: None,
            color: None,
        }
    }

    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    pub fn calendar(mut self, id: impl Into<String>, summary: impl Into<String>) -> Self {
        self.calendar_id = Some(id.into());
        self.calendar_summary = Some(summary.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn timing(mut self, timing: EventTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn hangout_link(mut self, link: impl Into<String>) -> Self {
        self.hangout_link = Some(link.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display colour (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the event
    pub fn build(self) -> Result<CalendarEvent, String> {
        let external_id = self.external_id.ok_or("Event id is required")?;
        let calendar_id = self.calendar_id.ok_or("Calendar id is required")?;
        let timing = self.timing.ok_or("Event timing is required")?;

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(CalendarEvent {
            id: format!("{}-{}", calendar_id, external_id),
            external_id,
            calendar_id,
            calendar_summary: self.calendar_summary.unwrap_or_else(|| "Calendar".to_string()),
            title: self.title.unwrap_or_else(|| "Untitled event".to_string()),
            timing,
            hangout_link: self.hangout_link,
            location: self.location,
            description: self.description,
            color: self.color,
        })
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
