//! Drag-to-reschedule for timed events in the week grid.
//!
//! A gesture is a small state machine: `Idle -> Dragging -> Idle`. Releasing
//! the pointer either commits a snapped minute delta or, when the net delta
//! is zero, reports a click so the caller can open the event instead.

use chrono::Duration;
use chrono_tz::Tz;

use crate::models::event::{CalendarEvent, EventTiming};
use crate::models::settings::Settings;
use crate::utils::date::{day_length_minutes, is_same_day, minutes_between, minutes_since_day_start};

pub const SNAP_MINUTES: i64 = 15;

/// Convert a vertical pointer offset to minutes, snapped to [`SNAP_MINUTES`].
pub fn minutes_delta_for_offset(delta_y: f64, hour_height: f64) -> i64 {
    if hour_height <= 0.0 || !delta_y.is_finite() {
        return 0;
    }
    let raw = (delta_y * 60.0 / hour_height).round();
    (raw / SNAP_MINUTES as f64).round() as i64 * SNAP_MINUTES
}

/// How far an event may move and stay inside its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampBounds {
    pub min_delta: i64,
    pub max_delta: i64,
}

impl ClampBounds {
    /// Bounds for an event starting `start_minutes` after midnight and
    /// lasting `duration_minutes`, on a day that is `day_minutes` long.
    ///
    /// All values are elapsed minutes, so a DST day is 1380 or 1500 long.
    pub fn new(start_minutes: i64, duration_minutes: i64, day_minutes: i64) -> Self {
        let min_delta = -start_minutes;
        let max_delta = (day_minutes - duration_minutes - start_minutes).max(min_delta);
        Self { min_delta, max_delta }
    }

    pub fn clamp(&self, delta: i64) -> i64 {
        delta.clamp(self.min_delta, self.max_delta)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub event_id: String,
    pub origin_y: f64,
    pub bounds: ClampBounds,
    /// Snapped pointer delta before clamping
    pub raw_delta_minutes: i64,
    pub delta_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Why a drag could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRejection {
    AllDay,
    MultiDay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Move the event by `delta_minutes`
    Committed { event_id: String, delta_minutes: i64 },
    /// Released without moving
    Click { event_id: String },
    /// No drag was active
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct DragController {
    hour_height: f64,
    state: DragState,
}

impl DragController {
    pub fn new(hour_height: f64) -> Self {
        Self {
            hour_height,
            state: DragState::Idle,
        }
    }

    /// Controller using the configured grid scale.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.hour_height)
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging `event` from pointer position `origin_y`.
    ///
    /// Only single-day timed events can be dragged. A new drag replaces any
    /// session still in progress.
    pub fn begin(&mut self, event: &CalendarEvent, origin_y: f64, zone: &Tz) -> Result<(), DragRejection> {
        let EventTiming::Timed { start, end } = &event.timing else {
            return Err(DragRejection::AllDay);
        };

        let start = start.with_timezone(zone);
        let end = end.with_timezone(zone);
        let last_instant = end - Duration::milliseconds(1);
        if !is_same_day(&start, &last_instant) {
            return Err(DragRejection::MultiDay);
        }

        let start_minutes = minutes_since_day_start(&start).round() as i64;
        let duration = minutes_between(&start, &end).round() as i64;
        let day_minutes = day_length_minutes(&start).round() as i64;

        self.state = DragState::Dragging(DragSession {
            event_id: event.id.clone(),
            origin_y,
            bounds: ClampBounds::new(start_minutes, duration, day_minutes),
            raw_delta_minutes: 0,
            delta_minutes: 0,
        });
        Ok(())
    }

    /// Track the pointer. Returns the clamped delta for preview rendering.
    pub fn update(&mut self, pointer_y: f64) -> Option<i64> {
        let hour_height = self.hour_height;
        match &mut self.state {
            DragState::Dragging(session) => {
                let delta = minutes_delta_for_offset(pointer_y - session.origin_y, hour_height);
                session.raw_delta_minutes = delta;
                session.delta_minutes = session.bounds.clamp(delta);
                Some(session.delta_minutes)
            }
            DragState::Idle => None,
        }
    }

    /// Finish the gesture at `pointer_y`.
    ///
    /// A release where the pointer did not move a full snap step is a click,
    /// whatever the bounds allow.
    pub fn release(&mut self, pointer_y: f64) -> DragOutcome {
        self.update(pointer_y);
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) if session.raw_delta_minutes != 0 && session.delta_minutes != 0 => {
                DragOutcome::Committed {
                    event_id: session.event_id,
                    delta_minutes: session.delta_minutes,
                }
            }
            DragState::Dragging(session) => DragOutcome::Click {
                event_id: session.event_id,
            },
            DragState::Idle => DragOutcome::Cancelled,
        }
    }

    /// Abandon the gesture without committing anything.
    pub fn cancel(&mut self) -> DragOutcome {
        self.state = DragState::Idle;
        DragOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use chrono_tz::{Europe, UTC};
    use test_case::test_case;

    use crate::utils::date::{day_start, local_instant};

    const HOUR_HEIGHT: f64 = 60.0;

    fn timed(id: &str, (h1, m1): (u32, u32), (h2, m2): (u32, u32), end_day: u32) -> CalendarEvent {
        let start = local_instant(
            NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            NaiveTime::from_hms_opt(h1, m1, 0).unwrap(),
            &UTC,
        );
        let end = local_instant(
            NaiveDate::from_ymd_opt(2024, 7, end_day).unwrap(),
            NaiveTime::from_hms_opt(h2, m2, 0).unwrap(),
            &UTC,
        );
        CalendarEvent::builder()
            .external_id(id)
            .calendar("primary", "Work")
            .timing(EventTiming::Timed { start, end })
            .build()
            .unwrap()
    }

    fn helsinki(id: &str, (y, m, d): (i32, u32, u32), (h1, m1): (u32, u32), (h2, m2): (u32, u32)) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let at = |h, min| local_instant(date, NaiveTime::from_hms_opt(h, min, 0).unwrap(), &Europe::Helsinki);
        CalendarEvent::builder()
            .external_id(id)
            .calendar("primary", "Work")
            .timing(EventTiming::Timed {
                start: at(h1, m1),
                end: at(h2, m2),
            })
            .build()
            .unwrap()
    }

    #[test_case(37.0, 30 ; "raw 37 snaps down to 30")]
    #[test_case(38.0, 45 ; "raw 38 snaps up to 45")]
    #[test_case(7.0, 0 ; "small jitter is zero")]
    #[test_case(-52.0, -45 ; "negative offsets snap too")]
    fn test_minutes_delta_for_offset(delta_y: f64, expected: i64) {
        assert_eq!(minutes_delta_for_offset(delta_y, HOUR_HEIGHT), expected);
    }

    #[test]
    fn test_minutes_delta_scales_with_hour_height() {
        // 48px per hour: 24px is half an hour
        assert_eq!(minutes_delta_for_offset(24.0, 48.0), 30);
        assert_eq!(minutes_delta_for_offset(100.0, 0.0), 0);
    }

    #[test]
    fn test_clamp_bounds_keep_event_inside_day() {
        // 22:30 - 23:30
        let bounds = ClampBounds::new(22 * 60 + 30, 60, 1440);
        assert_eq!(bounds.min_delta, -1350);
        assert_eq!(bounds.max_delta, 30);
        assert_eq!(bounds.clamp(45), 30);
        assert_eq!(bounds.clamp(-2000), -1350);
    }

    #[test]
    fn test_snapped_delta_is_clamped_at_day_end() {
        let event = timed("late", (23, 0), (23, 45), 10);
        let mut drag = DragController::new(HOUR_HEIGHT);
        drag.begin(&event, 100.0, &UTC).unwrap();

        // raw 37 minutes snaps to 30, but only 15 minutes remain before midnight
        assert_eq!(drag.update(137.0), Some(15));
        assert_eq!(
            drag.release(137.0),
            DragOutcome::Committed {
                event_id: event.id.clone(),
                delta_minutes: 15,
            }
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_release_without_movement_is_a_click() {
        let event = timed("standup", (9, 0), (9, 15), 10);
        let mut drag = DragController::new(HOUR_HEIGHT);
        drag.begin(&event, 200.0, &UTC).unwrap();
        drag.update(230.0);

        assert_eq!(drag.release(204.0), DragOutcome::Click { event_id: event.id.clone() });
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_all_day_and_multi_day_events_cannot_be_dragged() {
        let all_day = CalendarEvent::builder()
            .external_id("holiday")
            .calendar("primary", "Work")
            .timing(
                EventTiming::all_day(
                    NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
                )
                .unwrap(),
            )
            .build()
            .unwrap();
        let overnight = timed("overnight", (22, 0), (2, 0), 11);

        let mut drag = DragController::new(HOUR_HEIGHT);
        assert_eq!(drag.begin(&all_day, 0.0, &UTC), Err(DragRejection::AllDay));
        assert_eq!(drag.begin(&overnight, 0.0, &UTC), Err(DragRejection::MultiDay));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_event_ending_at_midnight_can_be_dragged() {
        let event = timed("evening", (23, 0), (0, 0), 11);
        let mut drag = DragController::new(HOUR_HEIGHT);
        assert!(drag.begin(&event, 0.0, &UTC).is_ok());
        assert_eq!(drag.update(-60.0), Some(-60));
        assert_eq!(drag.update(60.0), Some(0));
    }

    // Helsinki: 2024-03-31 is 23 hours long, 2024-10-27 is 25 hours long
    #[test_case((2024, 10, 27), (23, 0), (23, 45), 0.0, None ; "fall back tap in last hour is a click")]
    #[test_case((2024, 10, 27), (23, 0), (23, 45), 60.0, Some(15) ; "fall back drag stops at midnight")]
    #[test_case((2024, 10, 27), (23, 0), (23, 45), -30.0, Some(-30) ; "fall back drag upwards")]
    #[test_case((2024, 3, 31), (22, 0), (23, 0), 0.0, None ; "spring forward tap is a click")]
    #[test_case((2024, 3, 31), (22, 0), (23, 0), 600.0, Some(60) ; "spring forward drag stops at midnight")]
    #[test_case((2024, 3, 31), (5, 0), (6, 0), -600.0, Some(-240) ; "spring forward drag stops at day start")]
    fn test_drag_on_dst_days(
        date: (i32, u32, u32),
        start: (u32, u32),
        end: (u32, u32),
        offset: f64,
        expected_delta: Option<i64>,
    ) {
        let event = helsinki("dst", date, start, end);
        let mut drag = DragController::new(HOUR_HEIGHT);
        drag.begin(&event, 100.0, &Europe::Helsinki).unwrap();

        let outcome = drag.release(100.0 + offset);
        let Some(delta) = expected_delta else {
            assert_eq!(outcome, DragOutcome::Click { event_id: event.id.clone() });
            return;
        };
        assert_eq!(
            outcome,
            DragOutcome::Committed {
                event_id: event.id.clone(),
                delta_minutes: delta,
            }
        );

        let day = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let moved = event.timing.shifted(delta);
        assert!(moved.start_in(&Europe::Helsinki) >= day_start(day, &Europe::Helsinki));
        assert!(moved.end_in(&Europe::Helsinki) <= day_start(day.succ_opt().unwrap(), &Europe::Helsinki));
    }

    #[test]
    fn test_from_settings_uses_hour_height() {
        let mut settings = Settings::default();
        settings.hour_height = 48.0;
        let event = timed("standup", (9, 0), (9, 15), 10);

        let mut drag = DragController::from_settings(&settings);
        drag.begin(&event, 0.0, &UTC).unwrap();
        // 24px is half an hour at 48px per hour
        assert_eq!(drag.update(24.0), Some(30));
    }

    #[test]
    fn test_cancel_discards_the_session() {
        let event = timed("standup", (9, 0), (9, 15), 10);
        let mut drag = DragController::new(HOUR_HEIGHT);
        drag.begin(&event, 0.0, &UTC).unwrap();
        drag.update(120.0);

        assert_eq!(drag.cancel(), DragOutcome::Cancelled);
        assert_eq!(drag.release(120.0), DragOutcome::Cancelled);
    }
}
