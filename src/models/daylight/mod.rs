// Daylight module
// Observer coordinates and per-day sunrise/sunset windows

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::date::Instant;

/// Observer position in degrees.
///
/// Deserialising goes through [`Coordinates::new`], so stored values are
/// clamped the same way as typed-in ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = String;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat, raw.lon)
    }
}

impl Coordinates {
    /// Clamp latitude to `[-90, 90]` and longitude to `[-180, 180]`.
    ///
    /// Non-numeric input is rejected rather than clamped.
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if lat.is_nan() || lon.is_nan() {
            return Err("Latitude and longitude must be numbers".to_string());
        }

        Ok(Self {
            lat: lat.clamp(-90.0, 90.0),
            lon: lon.clamp(-180.0, 180.0),
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°, {:.2}°", self.lat, self.lon)
    }
}

/// Whether the sun rises and sets on a given day.
#[derive(Debug, Clone, PartialEq)]
pub enum Daylight {
    Cycle { sunrise: Instant, sunset: Instant },
    PolarDay,
    PolarNight,
}

/// Daylight for one calendar day, keyed by its ISO date.
#[derive(Debug, Clone, PartialEq)]
pub struct DaylightWindow {
    pub iso_date: String,
    pub daylight: Daylight,
}

impl DaylightWindow {
    pub fn sunrise(&self) -> Option<&Instant> {
        match &self.daylight {
            Daylight::Cycle { sunrise, .. } => Some(sunrise),
            _ => None,
        }
    }

    pub fn sunset(&self) -> Option<&Instant> {
        match &self.daylight {
            Daylight::Cycle { sunset, .. } => Some(sunset),
            _ => None,
        }
    }

    pub fn is_polar_day(&self) -> bool {
        matches!(self.daylight, Daylight::PolarDay)
    }

    pub fn is_polar_night(&self) -> bool {
        matches!(self.daylight, Daylight::PolarNight)
    }
}
