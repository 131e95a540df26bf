// Test fixtures - reusable test data
// Provides consistent dates and events across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use daylight_calendar::models::event::{CalendarEvent, EventTiming};
use daylight_calendar::utils::date::{day_start, local_instant, Instant};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Wednesday, July 10, 2024
    pub fn july_10_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
    }

    /// Summer solstice 2024 (local date)
    pub fn solstice_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    /// Helsinki falls back from 04:00 to 03:00: a 25 hour day
    pub fn fall_back_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 27).unwrap()
    }

    /// Helsinki springs forward from 03:00 to 04:00: a 23 hour day
    pub fn spring_forward_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    pub fn day(date: NaiveDate, zone: &Tz) -> Instant {
        day_start(date, zone)
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32, zone: &Tz) -> Instant {
        local_instant(date, NaiveTime::from_hms_opt(hour, minute, 0).unwrap(), zone)
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    /// Timed event on one calendar
    pub fn timed(id: &str, start: Instant, end: Instant) -> CalendarEvent {
        CalendarEvent::builder()
            .external_id(id)
            .calendar("primary", "Personal")
            .title(id)
            .timing(EventTiming::Timed { start, end })
            .build()
            .unwrap()
    }

    /// All-day event covering `first..=last`
    pub fn all_day(id: &str, first: NaiveDate, last: NaiveDate) -> CalendarEvent {
        CalendarEvent::builder()
            .external_id(id)
            .calendar("primary", "Personal")
            .title(id)
            .timing(EventTiming::all_day(first, last).unwrap())
            .build()
            .unwrap()
    }

    /// The A/B/C day used in the layout scenarios
    pub fn overlapping_day(zone: &Tz) -> Vec<CalendarEvent> {
        let date = dates::july_10_2024();
        vec![
            timed("A", dates::at(date, 9, 0, zone), dates::at(date, 10, 0, zone)),
            timed("B", dates::at(date, 9, 30, zone), dates::at(date, 10, 30, zone)),
            timed("C", dates::at(date, 11, 0, zone), dates::at(date, 12, 0, zone)),
        ]
    }
}
