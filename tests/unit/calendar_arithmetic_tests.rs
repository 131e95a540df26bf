// Parameterised tests for week/month arithmetic and toolbar labels

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use chrono_tz::{America, Australia, Europe, Tz, UTC};
use test_case::test_case;

use daylight_calendar::models::view::{CalendarView, NavigationDirection};
use daylight_calendar::services::calendar::{navigate, start_of_week, toolbar_label, view_range, week_days};
use daylight_calendar::utils::date::{local_instant, Instant};

fn at(y: i32, m: u32, d: u32, zone: &Tz) -> Instant {
    local_instant(
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        zone,
    )
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Thursday, Feb 29, 2024
#[test_case(0, ymd(2024, 2, 25) ; "sunday start")]
#[test_case(1, ymd(2024, 2, 26) ; "monday start")]
#[test_case(4, ymd(2024, 2, 29) ; "thursday start is the same day")]
#[test_case(5, ymd(2024, 2, 23) ; "friday start reaches previous week")]
#[test_case(6, ymd(2024, 2, 24) ; "saturday start")]
#[test_case(-1, ymd(2024, 2, 24) ; "negative wraps to saturday")]
#[test_case(13, ymd(2024, 2, 24) ; "overflow wraps to saturday")]
fn test_start_of_week_for_leap_day(first_day: i32, expected: NaiveDate) {
    let start = start_of_week(&at(2024, 2, 29, &UTC), first_day);
    assert_eq!(start.date_naive(), expected);
    assert_eq!((start.hour(), start.minute()), (0, 0));
}

#[test_case(Europe::London ; "london spring forward")]
#[test_case(America::New_York ; "new york spring forward")]
#[test_case(Australia::Sydney ; "sydney")]
fn test_week_days_start_at_midnight_across_dst(zone: Tz) {
    for day in week_days(&at(2024, 3, 31, &zone), 1) {
        assert_eq!(day.hour(), 0, "{} in {}", day, zone.name());
    }
}

#[test_case(CalendarView::Week, ymd(2024, 7, 10), 7 ; "week")]
#[test_case(CalendarView::Month, ymd(2024, 2, 10), 42 ; "month in leap february")]
#[test_case(CalendarView::Month, ymd(2026, 6, 10), 42 ; "month starting on first day")]
fn test_view_range_day_count(view: CalendarView, date: NaiveDate, days: usize) {
    let anchor = local_instant(date, NaiveTime::MIN, &Europe::Helsinki);
    let range = view_range(view, &anchor, 1);

    assert_eq!(range.days().len(), days);
    assert_eq!((range.end + Duration::milliseconds(1)).hour(), 0);
}

#[test_case(CalendarView::Week, ymd(2024, 7, 10), "Jul 8 – 14, 2024" ; "same month")]
#[test_case(CalendarView::Week, ymd(2024, 7, 31), "Jul 29 – Aug 4, 2024" ; "crosses month")]
#[test_case(CalendarView::Week, ymd(2025, 1, 1), "Dec 30, 2024 – Jan 5, 2025" ; "crosses year")]
#[test_case(CalendarView::Month, ymd(2025, 1, 1), "January 2025" ; "month")]
fn test_toolbar_label(view: CalendarView, date: NaiveDate, expected: &str) {
    let anchor = local_instant(date, NaiveTime::MIN, &UTC);
    assert_eq!(toolbar_label(view, &anchor, 1), expected);
}

#[test_case(CalendarView::Week, NavigationDirection::Next, ymd(2024, 3, 7) ; "next week")]
#[test_case(CalendarView::Week, NavigationDirection::Previous, ymd(2024, 2, 22) ; "previous week")]
#[test_case(CalendarView::Month, NavigationDirection::Next, ymd(2024, 3, 29) ; "next month")]
#[test_case(CalendarView::Month, NavigationDirection::Previous, ymd(2024, 1, 29) ; "previous month")]
fn test_navigate_from_leap_day(view: CalendarView, direction: NavigationDirection, expected: NaiveDate) {
    let moved = navigate(view, &at(2024, 2, 29, &UTC), direction);
    assert_eq!(moved.date_naive(), expected);
    assert_eq!(moved.hour(), 15);
}
