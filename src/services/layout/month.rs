// Month grid cells
// Events per day for the 6x7 month matrix, with an overflow count

use chrono::{Datelike, NaiveDate};

use crate::models::event::CalendarEvent;
use crate::services::calendar::MonthMatrix;
use crate::utils::date::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthCell<'a> {
    pub day: Instant,
    /// False for leading/trailing days from adjacent months
    pub is_current_month: bool,
    pub is_today: bool,
    /// At most `visible` events, in input order
    pub events: Vec<&'a CalendarEvent>,
    /// Events on this day that did not fit
    pub overflow: usize,
}

/// Build the 42 cells of a month grid, row by row.
pub fn month_cells<'a>(
    matrix: &MonthMatrix,
    events: &'a [CalendarEvent],
    anchor: &Instant,
    today: NaiveDate,
    visible: usize,
) -> Vec<MonthCell<'a>> {
    matrix
        .iter()
        .flatten()
        .map(|day| {
            let date = day.date_naive();
            let zone = day.timezone();
            let mut day_events: Vec<&CalendarEvent> = events
                .iter()
                .filter(|event| event.occurs_on(date, &zone))
                .collect();
            let overflow = day_events.len().saturating_sub(visible);
            day_events.truncate(visible);

            MonthCell {
                day: *day,
                is_current_month: date.month() == anchor.month() && date.year() == anchor.year(),
                is_today: date == today,
                events: day_events,
                overflow,
            }
        })
        .collect()
}
