// Date utility functions
// Day boundaries and minute arithmetic in an explicit timezone

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Timezone-aware point in time used by every calendar computation.
pub type Instant = DateTime<Tz>;

pub const MINUTES_IN_DAY: i64 = 24 * 60;

pub fn is_same_day(date1: &Instant, date2: &Instant) -> bool {
    date1.date_naive() == date2.date_naive()
}

/// Resolve a wall-clock time in `zone`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// fall into a DST gap move forward in 15 minute steps to the first valid one.
pub fn local_instant(date: NaiveDate, time: NaiveTime, zone: &Tz) -> Instant {
    let wall_clock = date.and_time(time);
    (0..=12)
        .map(|step| wall_clock + Duration::minutes(15 * step))
        .find_map(|candidate| zone.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| zone.from_utc_datetime(&wall_clock))
}

/// First instant of `date` in `zone`.
pub fn day_start(date: NaiveDate, zone: &Tz) -> Instant {
    local_instant(date, NaiveTime::MIN, zone)
}

/// Last millisecond of `date` in `zone` (start of the next day minus 1ms).
pub fn day_end(date: NaiveDate, zone: &Tz) -> Instant {
    let next = date.succ_opt().unwrap_or(date);
    day_start(next, zone) - Duration::milliseconds(1)
}

pub fn start_of_day(date: &Instant) -> Instant {
    day_start(date.date_naive(), &date.timezone())
}

pub fn end_of_day(date: &Instant) -> Instant {
    day_end(date.date_naive(), &date.timezone())
}

/// Fractional minutes from `from` to `to` (negative when `to` is earlier).
pub fn minutes_between(from: &Instant, to: &Instant) -> f64 {
    (*to - *from).num_milliseconds() as f64 / 60_000.0
}

pub fn minutes_since_day_start(instant: &Instant) -> f64 {
    minutes_between(&start_of_day(instant), instant)
}

/// Elapsed minutes in the calendar day containing `instant`: 1440 on most
/// days, 1380 or 1500 across a DST change.
pub fn day_length_minutes(instant: &Instant) -> f64 {
    let next = end_of_day(instant) + Duration::milliseconds(1);
    minutes_between(&start_of_day(instant), &next)
}

/// ISO calendar date (`YYYY-MM-DD`) of the instant in its own zone.
pub fn iso_date(instant: &Instant) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Parse an IANA timezone name such as `Europe/Helsinki`.
pub fn parse_zone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| format!("Unknown time zone: {}", name))
}

/// Interpret a naive wall-clock value in `zone`.
pub fn from_naive(value: NaiveDateTime, zone: &Tz) -> Instant {
    local_instant(value.date(), value.time(), zone)
}
