//! Day layout engine.
//!
//! Splits a day's events into all-day chips and timed segments, then packs
//! overlapping timed segments into side-by-side columns. Each overlap
//! cluster is packed independently, so a day with two unrelated meetings
//! lets both use the full width.

pub mod month;

use crate::models::event::{CalendarEvent, EventTiming};
use crate::utils::date::{day_length_minutes, end_of_day, minutes_between, start_of_day, Instant};

/// Minimum segment height, in percent of the day
pub const MIN_SEGMENT_HEIGHT: f64 = 2.0;

/// A timed event clipped to one day and placed in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSegment<'a> {
    pub event: &'a CalendarEvent,
    /// Clipped start, never before the day start
    pub start: Instant,
    /// Clipped end, never after the day end
    pub end: Instant,
    /// Offset from the top of the day, in percent of the day's elapsed length
    /// (23 or 25 hours across a DST change)
    pub top: f64,
    /// Height in percent, at least [`MIN_SEGMENT_HEIGHT`]
    pub height: f64,
    pub column: usize,
    /// Number of columns in this segment's overlap cluster
    pub column_span: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayLayout<'a> {
    pub timed: Vec<EventSegment<'a>>,
    pub all_day: Vec<&'a CalendarEvent>,
}

/// Timed event clipped to the day, before column assignment.
#[derive(Debug, Clone)]
struct ClippedSegment<'a> {
    event: &'a CalendarEvent,
    start: Instant,
    end: Instant,
    start_minutes: f64,
    end_minutes: f64,
    day_minutes: f64,
}

impl<'a> ClippedSegment<'a> {
    fn place(self, column: usize, column_span: usize) -> EventSegment<'a> {
        let total = self.day_minutes;
        EventSegment {
            event: self.event,
            start: self.start,
            end: self.end,
            top: self.start_minutes / total * 100.0,
            height: ((self.end_minutes - self.start_minutes) / total * 100.0).max(MIN_SEGMENT_HEIGHT),
            column,
            column_span,
        }
    }
}

/// Lay out `events` for the calendar day containing `day`.
///
/// Events that do not touch the day are left out. Never fails.
pub fn event_segments_for_day<'a>(events: &'a [CalendarEvent], day: &Instant) -> DayLayout<'a> {
    let zone = day.timezone();
    let date = day.date_naive();

    let all_day = events
        .iter()
        .filter(|event| event.is_all_day() && event.occurs_on(date, &zone))
        .collect();

    let clipped = clip_timed_events(events, day);
    let timed = overlap_clusters(&clipped)
        .into_iter()
        .flat_map(assign_columns)
        .collect();

    DayLayout { timed, all_day }
}

/// Clip timed events to the day and sort them by start. Ties keep input order.
fn clip_timed_events<'a>(events: &'a [CalendarEvent], day: &Instant) -> Vec<ClippedSegment<'a>> {
    let day_start = start_of_day(day);
    let day_end = end_of_day(day);
    let day_minutes = day_length_minutes(day);

    let mut clipped: Vec<ClippedSegment<'a>> = events
        .iter()
        .filter_map(|event| {
            let EventTiming::Timed { start, end } = &event.timing else {
                return None;
            };
            let start = start.with_timezone(&day.timezone()).max(day_start);
            let end = end.with_timezone(&day.timezone()).min(day_end);
            if end <= start {
                return None;
            }
            Some(ClippedSegment {
                event,
                start_minutes: minutes_between(&day_start, &start),
                end_minutes: minutes_between(&day_start, &end),
                day_minutes,
                start,
                end,
            })
        })
        .collect();

    clipped.sort_by_key(|segment| segment.start);
    clipped
}

/// Split sorted segments into maximal runs that transitively overlap.
fn overlap_clusters<'s, 'a>(segments: &'s [ClippedSegment<'a>]) -> Vec<&'s [ClippedSegment<'a>]> {
    let mut clusters = Vec::new();
    let mut cluster_start = 0;
    let mut cluster_end = f64::NEG_INFINITY;

    for (index, segment) in segments.iter().enumerate() {
        if index > cluster_start && segment.start_minutes >= cluster_end {
            clusters.push(&segments[cluster_start..index]);
            cluster_start = index;
            cluster_end = segment.end_minutes;
        } else {
            cluster_end = cluster_end.max(segment.end_minutes);
        }
    }

    if cluster_start < segments.len() {
        clusters.push(&segments[cluster_start..]);
    }
    clusters
}

/// Greedy interval colouring: each segment goes into the first column whose
/// last segment has ended.
fn assign_columns<'a>(cluster: &[ClippedSegment<'a>]) -> Vec<EventSegment<'a>> {
    let mut columns: Vec<Vec<&ClippedSegment<'a>>> = Vec::new();

    for segment in cluster {
        let free = columns.iter_mut().find(|column| {
            column
                .last()
                .is_some_and(|last| last.end_minutes <= segment.start_minutes)
        });
        match free {
            Some(column) => column.push(segment),
            None => columns.push(vec![segment]),
        }
    }

    let span = columns.len().max(1);
    columns
        .into_iter()
        .enumerate()
        .flat_map(|(column, segments)| {
            segments
                .into_iter()
                .map(move |segment| segment.clone().place(column, span))
        })
        .collect()
}
