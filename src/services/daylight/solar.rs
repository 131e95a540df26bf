// Solar position oracle
//
// Sun altitude and sunrise/sunset times from the low-precision formulas in
// "Astronomy Answers" (Julian-day based, good to about a minute).

use chrono::{DateTime, TimeZone, Utc};
use std::f64::consts::PI;

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const J0: f64 = 0.0009;
/// Obliquity of the ecliptic
const OBLIQUITY: f64 = RAD * 23.4397;
/// Sun altitude at apparent sunrise/sunset (refraction + solar radius)
const SUNRISE_ALTITUDE: f64 = -0.833;

/// Sunrise and sunset around a given instant. Either is absent when the sun
/// never crosses the horizon that day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolarTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// Sun position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

/// Source of solar data for the daylight calculator.
#[cfg_attr(test, mockall::automock)]
pub trait SolarOracle {
    fn solar_times(&self, at: DateTime<Utc>, lat: f64, lon: f64) -> SolarTimes;
    fn solar_position(&self, at: DateTime<Utc>, lat: f64, lon: f64) -> SolarPosition;
}

/// Built-in oracle based on the Julian-day solar model.
#[derive(Debug, Clone, Copy, Default)]
pub struct JulianSolarModel;

fn to_julian(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970
}

fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    if !julian.is_finite() {
        return None;
    }
    let millis = ((julian + 0.5 - J1970) * DAY_MS).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

fn to_days(at: DateTime<Utc>) -> f64 {
    to_julian(at) - J2000
}

fn right_ascension(longitude: f64, latitude: f64) -> f64 {
    (longitude.sin() * OBLIQUITY.cos() - latitude.tan() * OBLIQUITY.sin()).atan2(longitude.cos())
}

fn declination(longitude: f64, latitude: f64) -> f64 {
    (latitude.sin() * OBLIQUITY.cos() + latitude.cos() * OBLIQUITY.sin() * longitude.sin()).asin()
}

fn sidereal_time(days: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * days) - lw
}

fn solar_mean_anomaly(days: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * days)
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let center = RAD
        * (1.9148 * mean_anomaly.sin()
            + 0.02 * (2.0 * mean_anomaly).sin()
            + 0.0003 * (3.0 * mean_anomaly).sin());
    let perihelion = RAD * 102.9372;
    mean_anomaly + center + perihelion + PI
}

fn julian_cycle(days: f64, lw: f64) -> f64 {
    (days - J0 - lw / (2.0 * PI)).round()
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

fn solar_transit(days: f64, mean_anomaly: f64, longitude: f64) -> f64 {
    J2000 + days + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * longitude).sin()
}

/// Hour angle at which the sun reaches `altitude`, `None` when it never does.
fn hour_angle(altitude: f64, phi: f64, dec: f64) -> Option<f64> {
    let cosine = (altitude.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());
    if !(-1.0..=1.0).contains(&cosine) {
        return None;
    }
    Some(cosine.acos())
}

impl SolarOracle for JulianSolarModel {
    fn solar_times(&self, at: DateTime<Utc>, lat: f64, lon: f64) -> SolarTimes {
        let lw = RAD * -lon;
        let phi = RAD * lat;
        let days = to_days(at);

        let cycle = julian_cycle(days, lw);
        let transit_days = approx_transit(0.0, lw, cycle);
        let mean_anomaly = solar_mean_anomaly(transit_days);
        let longitude = ecliptic_longitude(mean_anomaly);
        let dec = declination(longitude, 0.0);
        let noon = solar_transit(transit_days, mean_anomaly, longitude);

        let Some(angle) = hour_angle(SUNRISE_ALTITUDE * RAD, phi, dec) else {
            return SolarTimes::default();
        };

        let set = solar_transit(approx_transit(angle, lw, cycle), mean_anomaly, longitude);
        let rise = noon - (set - noon);

        SolarTimes {
            sunrise: from_julian(rise),
            sunset: from_julian(set),
        }
    }

    fn solar_position(&self, at: DateTime<Utc>, lat: f64, lon: f64) -> SolarPosition {
        let lw = RAD * -lon;
        let phi = RAD * lat;
        let days = to_days(at);

        let longitude = ecliptic_longitude(solar_mean_anomaly(days));
        let dec = declination(longitude, 0.0);
        let ra = right_ascension(longitude, 0.0);
        let h = sidereal_time(days, lw) - ra;

        let altitude = (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin();
        let azimuth = h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos());

        SolarPosition {
            altitude: altitude / RAD,
            azimuth: azimuth / RAD,
        }
    }
}
