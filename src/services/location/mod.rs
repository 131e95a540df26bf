// Location service
// Observer position for daylight shading: geolocation lookup or manual entry

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::daylight::{Coordinates, DaylightWindow};
use crate::models::view::DateRange;
use crate::services::daylight::{build_daylight_map, SolarOracle};

const CURRENT_LOCATION: &str = "Current location";
const CUSTOM_LOCATION: &str = "Custom location";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this system")]
    Unsupported,

    #[error("{0}")]
    Denied(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Source of the device's current position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Geolocation backed by a fixed, configured position (e.g. from settings).
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl GeolocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.coordinates.ok_or(GeolocationError::Unsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Error,
}

pub struct LocationService<G: GeolocationProvider> {
    provider: G,
    coordinates: Option<Coordinates>,
    label: String,
    status: LocationStatus,
    error: Option<String>,
    has_requested: bool,
}

impl<G: GeolocationProvider> LocationService<G> {
    pub fn new(provider: G) -> Self {
        Self {
            provider,
            coordinates: None,
            label: CURRENT_LOCATION.to_string(),
            status: LocationStatus::Idle,
            error: None,
            has_requested: false,
        }
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> LocationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Short text for the location status badge.
    pub fn status_label(&self) -> &str {
        match self.status {
            LocationStatus::Idle => "Location needed",
            LocationStatus::Pending => "Detecting…",
            LocationStatus::Ready => &self.label,
            LocationStatus::Error => "Location unavailable",
        }
    }

    /// Ask the geolocation provider for the current position. On failure the
    /// previous coordinates stay in place.
    pub async fn request_geolocation(&mut self) {
        self.status = LocationStatus::Pending;
        self.has_requested = true;

        match self.provider.current_position().await {
            Ok(coordinates) => {
                self.coordinates = Some(coordinates);
                self.label = CURRENT_LOCATION.to_string();
                self.status = LocationStatus::Ready;
                self.error = None;
            }
            Err(err) => {
                log::warn!("Geolocation failed: {}", err);
                self.error = Some(err.to_string());
                self.status = LocationStatus::Error;
            }
        }
    }

    /// Request the position once, only while no coordinates are known.
    pub async fn ensure_requested(&mut self) {
        if self.coordinates.is_some() || self.has_requested {
            return;
        }
        self.request_geolocation().await;
    }

    /// Use a manually entered position. NaN input is rejected and leaves the
    /// previous coordinates untouched.
    pub fn set_manual_location(&mut self, lat: f64, lon: f64, label: Option<&str>) -> Result<(), String> {
        let coordinates = match Coordinates::new(lat, lon) {
            Ok(coordinates) => coordinates,
            Err(err) => {
                self.error = Some(err.clone());
                self.status = LocationStatus::Error;
                return Err(err);
            }
        };

        self.coordinates = Some(coordinates);
        self.label = label
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(CUSTOM_LOCATION)
            .to_string();
        self.status = LocationStatus::Ready;
        self.error = None;
        Ok(())
    }

    /// Daylight for every day of `range`; empty until a position is known.
    pub fn daylight_map(&self, range: &DateRange, oracle: &dyn SolarOracle) -> BTreeMap<String, DaylightWindow> {
        build_daylight_map(&range.days(), self.coordinates.as_ref(), oracle)
    }
}
