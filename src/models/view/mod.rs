// View Types
// Calendar view modes and the date ranges they cover

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::date::{day_start, Instant};

/// Calendar view types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Week,
    Month,
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarView::Week => write!(f, "week"),
            CalendarView::Month => write!(f, "month"),
        }
    }
}

/// Direction for toolbar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Previous,
    Next,
}

/// Range of instants where both ends are inclusive.
///
/// `end` is the next boundary minus one millisecond, so membership tests can
/// use `start <= x && x <= end` without counting a boundary instant twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: Instant,
    pub end: Instant,
}

impl DateRange {
    pub fn new(start: Instant, end: Instant) -> Result<Self, String> {
        if end < start {
            return Err("Range end must not be before its start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: &Instant) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// Every calendar day touched by the range, each as its day start.
    pub fn days(&self) -> Vec<Instant> {
        let zone = self.start.timezone();
        let first: NaiveDate = self.start.date_naive();
        let last: NaiveDate = self.end.with_timezone(&zone).date_naive();

        let mut days = Vec::new();
        let mut cursor = first;
        while cursor <= last {
            days.push(day_start(cursor, &zone));
            match cursor.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }
        days
    }

    /// Identity of the range, used to detect when a refetch is needed.
    pub fn key(&self) -> String {
        format!("{}|{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
