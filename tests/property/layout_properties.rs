// Property-based tests for calendar arithmetic and the day layout engine

#[path = "../fixtures/mod.rs"]
mod fixtures;

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::{America, Europe, Tz, UTC};
use proptest::prelude::*;

use daylight_calendar::models::event::CalendarEvent;
use daylight_calendar::services::calendar::{month_matrix, start_of_week};
use daylight_calendar::services::draft::round_minutes_to_nearest_hour;
use daylight_calendar::services::layout::event_segments_for_day;
use daylight_calendar::utils::date::Instant;

use fixtures::{dates, events};

fn zones() -> impl Strategy<Value = Tz> {
    prop_oneof![Just(UTC), Just(Europe::Helsinki), Just(America::New_York)]
}

fn any_instant() -> impl Strategy<Value = Instant> {
    (2000..2040i32, 1..=12u32, 1..=28u32, 0..24u32, 0..60u32, zones())
        .prop_map(|(y, m, d, h, min, zone)| dates::at(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min, &zone))
}

/// Up to 12 events on 2024-07-10 (UTC), as (start minute, duration) pairs.
fn day_events() -> impl Strategy<Value = Vec<CalendarEvent>> {
    prop::collection::vec((0..1440i64, 1..300i64), 0..12).prop_map(|specs| {
        let day = dates::day(dates::july_10_2024(), &UTC);
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (start, duration))| {
                let start = day + Duration::minutes(start);
                events::timed(&format!("e{}", index), start, start + Duration::minutes(duration))
            })
            .collect()
    })
}

/// Largest number of segments active at the same instant.
fn max_concurrency(intervals: &[(Instant, Instant)]) -> usize {
    intervals
        .iter()
        .map(|(start, _)| {
            intervals
                .iter()
                .filter(|(other_start, other_end)| other_start <= start && start < other_end)
                .count()
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    /// Property: the week start is on or before the date and less than 7 days earlier
    #[test]
    fn prop_start_of_week_brackets_date(date in any_instant(), first_day in 0..7i32) {
        let start = start_of_week(&date, first_day);
        prop_assert!(start <= date);
        prop_assert!(date.date_naive() < start.date_naive() + Duration::days(7));
        prop_assert_eq!(
            start.date_naive().format("%w").to_string(),
            first_day.to_string()
        );
    }

    /// Property: month grids are always 6x7 consecutive days covering the 1st
    #[test]
    fn prop_month_matrix_shape(date in any_instant(), first_day in -7..14i32) {
        let matrix = month_matrix(&date, first_day);
        prop_assert_eq!(matrix.len(), 6);

        let cells: Vec<NaiveDate> = matrix.iter().flatten().map(|day| day.date_naive()).collect();
        prop_assert_eq!(cells.len(), 42);
        for pair in cells.windows(2) {
            prop_assert_eq!(pair[0] + Duration::days(1), pair[1]);
        }
        let first_of_month = date.date_naive().with_day0(0).unwrap();
        prop_assert!(cells[..7].contains(&first_of_month));
    }

    /// Property: segments sharing a column never overlap
    #[test]
    fn prop_segments_in_a_column_do_not_overlap(events in day_events()) {
        let day = dates::day(dates::july_10_2024(), &UTC);
        let layout = event_segments_for_day(&events, &day);

        for (i, a) in layout.timed.iter().enumerate() {
            prop_assert!(a.column < a.column_span);
            prop_assert!(a.height >= 2.0);
            for b in layout.timed.iter().skip(i + 1) {
                if a.column == b.column && a.column_span == b.column_span {
                    prop_assert!(a.end <= b.start || b.end <= a.start);
                }
            }
        }
    }

    /// Property: each cluster uses exactly as many columns as its peak concurrency
    #[test]
    fn prop_column_count_is_minimal(events in day_events()) {
        let day = dates::day(dates::july_10_2024(), &UTC);
        let layout = event_segments_for_day(&events, &day);

        // Segments come out cluster by cluster; rebuild clusters by sweeping
        let mut sorted: Vec<_> = layout.timed.iter().collect();
        sorted.sort_by_key(|segment| segment.start);

        let mut cluster: Vec<(Instant, Instant)> = Vec::new();
        let mut spans: Vec<usize> = Vec::new();
        let mut cluster_end: Option<Instant> = None;
        for segment in sorted {
            if cluster_end.is_some_and(|end| segment.start >= end) {
                prop_assert!(spans.iter().all(|span| *span == max_concurrency(&cluster)));
                cluster.clear();
                spans.clear();
                cluster_end = None;
            }
            cluster.push((segment.start, segment.end));
            spans.push(segment.column_span);
            cluster_end = Some(cluster_end.map_or(segment.end, |end| end.max(segment.end)));
        }
        prop_assert!(spans.iter().all(|span| *span == max_concurrency(&cluster)));
    }

    /// Property: rounding stays in [0, 1380] and is idempotent
    #[test]
    fn prop_round_minutes_bounded_and_idempotent(minutes in 0.0..=1440.0f64) {
        let rounded = round_minutes_to_nearest_hour(minutes);
        prop_assert!((0..=1380).contains(&rounded));
        prop_assert_eq!(rounded % 60, 0);
        prop_assert_eq!(round_minutes_to_nearest_hour(rounded as f64), rounded);
    }
}
