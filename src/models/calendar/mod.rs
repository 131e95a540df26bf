use serde::{Deserialize, Serialize};

/// One calendar the signed-in account can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,
    pub summary: String,
    pub primary: bool,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
}

impl CalendarListEntry {
    /// Calendars selected when nothing was selected before: every primary
    /// calendar, or the first two listed when none is primary.
    pub fn default_selection(calendars: &[CalendarListEntry]) -> Vec<String> {
        let primary: Vec<String> = calendars
            .iter()
            .filter(|calendar| calendar.primary)
            .map(|calendar| calendar.id.clone())
            .collect();

        if !primary.is_empty() {
            return primary;
        }

        calendars
            .iter()
            .take(2)
            .map(|calendar| calendar.id.clone())
            .collect()
    }

    /// Keep `current` ids that still exist in `calendars`; fall back to the
    /// default selection when `current` is empty.
    pub fn reconcile_selection(current: &[String], calendars: &[CalendarListEntry]) -> Vec<String> {
        if current.is_empty() {
            return Self::default_selection(calendars);
        }

        current
            .iter()
            .filter(|id| calendars.iter().any(|calendar| &calendar.id == *id))
            .cloned()
            .collect()
    }
}
