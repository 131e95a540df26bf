// Settings module
// User configuration persisted as TOML

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::daylight::Coordinates;
use crate::models::view::CalendarView;
use crate::utils::date::parse_zone;

pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Manually configured observer location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 0 = Sunday, 1 = Monday, ... 6 = Saturday
    pub first_day_of_week: u8,
    /// IANA zone used for every day boundary
    pub time_zone: String,
    pub default_view: CalendarView,
    /// Pixels per hour in the week grid
    pub hour_height: f64,
    pub visible_events_per_month_cell: usize,
    pub api_base_url: String,
    pub location: Option<LocationSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_day_of_week: 1, // Monday
            time_zone: "UTC".to_string(),
            default_view: CalendarView::Week,
            hour_height: 64.0,
            visible_events_per_month_cell: 3,
            api_base_url: GOOGLE_API_BASE.to_string(),
            location: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_day_of_week > 6 {
            return Err("First day of week must be between 0 (Sunday) and 6 (Saturday)".to_string());
        }

        parse_zone(&self.time_zone)?;

        if self.hour_height.is_nan() || self.hour_height <= 0.0 {
            return Err("Hour height must be greater than 0".to_string());
        }

        if self.visible_events_per_month_cell == 0 {
            return Err("Month cells must show at least one event".to_string());
        }

        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err("API base URL must be an http(s) URL".to_string());
        }

        if let Some(location) = &self.location {
            Coordinates::new(location.lat, location.lon)?;
        }

        Ok(())
    }

    /// Configured display zone.
    pub fn zone(&self) -> Result<Tz, String> {
        parse_zone(&self.time_zone)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location
            .as_ref()
            .and_then(|location| Coordinates::new(location.lat, location.lon).ok())
    }
}
