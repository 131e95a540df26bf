// Daylight service
// Sunrise/sunset windows per visible day and the shading bands derived from them

pub mod solar;

use chrono::{NaiveTime, Utc};
use std::collections::BTreeMap;

use crate::models::daylight::{Coordinates, Daylight, DaylightWindow};
use crate::utils::date::{day_length_minutes, iso_date, local_instant, minutes_between, start_of_day, Instant};

pub use solar::{JulianSolarModel, SolarOracle, SolarPosition, SolarTimes};

/// Daylight window for the calendar day of `date`, in `date`'s zone.
///
/// The oracle is queried at local noon so the returned times belong to this
/// calendar day even when the zone is far from UTC.
pub fn compute_daylight_window(
    date: &Instant,
    coords: &Coordinates,
    oracle: &dyn SolarOracle,
) -> DaylightWindow {
    let zone = date.timezone();
    let noon = local_instant(date.date_naive(), NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN), &zone);
    let noon_utc = noon.with_timezone(&Utc);

    let times = oracle.solar_times(noon_utc, coords.lat, coords.lon);
    let sunrise = times.sunrise.map(|at| at.with_timezone(&zone));
    let sunset = times.sunset.map(|at| at.with_timezone(&zone));

    let daylight = match (sunrise, sunset) {
        (Some(sunrise), Some(sunset)) => Daylight::Cycle { sunrise, sunset },
        _ => {
            let position = oracle.solar_position(noon_utc, coords.lat, coords.lon);
            if position.altitude > 0.0 {
                Daylight::PolarDay
            } else {
                Daylight::PolarNight
            }
        }
    };

    DaylightWindow {
        iso_date: iso_date(date),
        daylight,
    }
}

/// Daylight windows keyed by ISO date. Empty when no coordinates are known.
pub fn build_daylight_map(
    days: &[Instant],
    coords: Option<&Coordinates>,
    oracle: &dyn SolarOracle,
) -> BTreeMap<String, DaylightWindow> {
    let Some(coords) = coords else {
        return BTreeMap::new();
    };

    days.iter()
        .map(|day| {
            let window = compute_daylight_window(day, coords, oracle);
            (window.iso_date.clone(), window)
        })
        .collect()
}

/// Background bands for a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DaylightShading {
    AllDay,
    AllNight,
    /// Night above `sunrise_percent`, day until `sunset_percent`, night below
    Gradient { sunrise_percent: f64, sunset_percent: f64 },
}

/// Shading for `day`, or `None` when no daylight window is known.
///
/// Percentages use the same axis as the day layout: elapsed minutes over the
/// day's real length.
pub fn shading_for_day(day: &Instant, window: Option<&DaylightWindow>) -> Option<DaylightShading> {
    let window = window?;
    match &window.daylight {
        Daylight::PolarDay => Some(DaylightShading::AllDay),
        Daylight::PolarNight => Some(DaylightShading::AllNight),
        Daylight::Cycle { sunrise, sunset } => {
            let day_start = start_of_day(day);
            let total = day_length_minutes(day);
            let to_percent = |instant: &Instant| {
                minutes_between(&day_start, instant).clamp(0.0, total) / total * 100.0
            };
            Some(DaylightShading::Gradient {
                sunrise_percent: to_percent(sunrise),
                sunset_percent: to_percent(sunset),
            })
        }
    }
}
