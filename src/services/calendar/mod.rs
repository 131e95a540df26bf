//! Calendar arithmetic for week and month views.
//!
//! Every function takes the anchor as an [`Instant`] and works in the anchor's
//! own timezone. Day offsets are calendar days, not 24 hour spans, so DST
//! transitions never shift a boundary off midnight.

use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::models::view::{CalendarView, DateRange, NavigationDirection};
use crate::utils::date::{day_start, local_instant, Instant};

pub const DAYS_IN_WEEK: usize = 7;
pub const MONTH_ROWS: usize = 6;

/// Fixed 6x7 grid of day starts.
pub type MonthMatrix = [[Instant; DAYS_IN_WEEK]; MONTH_ROWS];

/// Map any integer onto 0 (Sunday) ..= 6 (Saturday).
pub fn normalize_first_day(first_day_of_week: i32) -> i64 {
    first_day_of_week.rem_euclid(7) as i64
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The instant to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc. Values outside 0..=6 wrap.
pub fn start_of_week(date: &Instant, first_day_of_week: i32) -> Instant {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - normalize_first_day(first_day_of_week) + 7) % 7;
    day_start(add_days(date.date_naive(), -offset), &date.timezone())
}

pub fn start_of_month(date: &Instant) -> Instant {
    let first = date.date_naive().with_day(1).unwrap_or(date.date_naive());
    day_start(first, &date.timezone())
}

/// The seven day starts of the week containing `anchor`.
pub fn week_days(anchor: &Instant, first_day_of_week: i32) -> [Instant; DAYS_IN_WEEK] {
    let start = start_of_week(anchor, first_day_of_week);
    let zone = start.timezone();
    std::array::from_fn(|index| day_start(add_days(start.date_naive(), index as i64), &zone))
}

/// 42 day starts beginning with the week that contains the first of the
/// anchor's month. Leading and trailing cells belong to adjacent months.
pub fn month_matrix(anchor: &Instant, first_day_of_week: i32) -> MonthMatrix {
    let start = start_of_week(&start_of_month(anchor), first_day_of_week);
    let zone = start.timezone();
    let first = start.date_naive();

    std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            day_start(add_days(first, (row * DAYS_IN_WEEK + col) as i64), &zone)
        })
    })
}

/// Inclusive range covered by a view: 7 days for week, 42 days for month.
pub fn view_range(view: CalendarView, anchor: &Instant, first_day_of_week: i32) -> DateRange {
    let (start, days) = match view {
        CalendarView::Week => (start_of_week(anchor, first_day_of_week), DAYS_IN_WEEK),
        CalendarView::Month => (
            start_of_week(&start_of_month(anchor), first_day_of_week),
            DAYS_IN_WEEK * MONTH_ROWS,
        ),
    };

    let boundary = day_start(add_days(start.date_naive(), days as i64), &start.timezone());
    DateRange {
        start,
        end: boundary - Duration::milliseconds(1),
    }
}

/// Toolbar heading. Month view shows `July 2024`; week view shows a compact
/// range that omits a repeated month or year.
pub fn toolbar_label(view: CalendarView, anchor: &Instant, first_day_of_week: i32) -> String {
    if view == CalendarView::Month {
        return anchor.format("%B %Y").to_string();
    }

    let week_start = start_of_week(anchor, first_day_of_week).date_naive();
    let week_end = add_days(week_start, 6);
    let same_month = week_start.month() == week_end.month();
    let same_year = week_start.year() == week_end.year();

    if same_month && same_year {
        format!("{} – {}", week_start.format("%b %-d"), week_end.format("%-d, %Y"))
    } else if same_year {
        format!("{} – {}", week_start.format("%b %-d"), week_end.format("%b %-d, %Y"))
    } else {
        format!("{} – {}", week_start.format("%b %-d, %Y"), week_end.format("%b %-d, %Y"))
    }
}

/// Move the anchor one week or one month, keeping its wall-clock time.
pub fn navigate(view: CalendarView, anchor: &Instant, direction: NavigationDirection) -> Instant {
    let date = anchor.date_naive();
    let target = match (view, direction) {
        (CalendarView::Week, NavigationDirection::Next) => add_days(date, 7),
        (CalendarView::Week, NavigationDirection::Previous) => add_days(date, -7),
        (CalendarView::Month, NavigationDirection::Next) => {
            date.checked_add_months(Months::new(1)).unwrap_or(date)
        }
        (CalendarView::Month, NavigationDirection::Previous) => {
            date.checked_sub_months(Months::new(1)).unwrap_or(date)
        }
    };

    local_instant(target, anchor.time(), &anchor.timezone())
}

/// Current instant in `zone`.
pub fn today(zone: &Tz) -> Instant {
    Utc::now().with_timezone(zone)
}
