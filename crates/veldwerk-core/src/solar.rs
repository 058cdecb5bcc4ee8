//! Sunrise/sunset estimation.
//!
//! The default backend is a NOAA-style low-precision approximation,
//! usually within a few minutes of a full ephemeris. A precise
//! implementation can be slotted in through [`SunCalculator`] without
//! touching the callers.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::localtime;
use crate::types::SolarEvent;

/// UTC sunrise/sunset pair produced by a backend. A missing half means
/// the event does not occur (polar day/night) or the computation failed;
/// callers treat both as absent data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SunTimesUtc {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

pub trait SunCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    fn sun_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
    ) -> SunTimesUtc;
}

const JULIAN_UNIX_EPOCH: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;
const J2000: f64 = 2_451_545.0;
const DELTA_T_DAYS: f64 = 0.0009;
const LEAP_SECONDS: f64 = 69.184;
const MEAN_ANOMALY_BASE_DEG: f64 = 357.5291;
const MEAN_ANOMALY_RATE_DEG_PER_DAY: f64 = 0.98560028;
const PERIHELION_DEG: f64 = 102.9372;
const OBLIQUITY_DEG: f64 = 23.4397;
const HORIZON_DIP_DEG: f64 = -0.833;

/// NOAA low-precision solar position algorithm.
pub struct NoaaCalculator;

impl SunCalculator for NoaaCalculator {
    fn name(&self) -> &'static str {
        "noaa_approximation"
    }

    fn sun_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
    ) -> SunTimesUtc {
        let Some(midday) = date.and_hms_opt(12, 0, 0) else {
            return SunTimesUtc::default();
        };
        let julian = julian_date(midday.and_utc());

        let west_longitude = -longitude;
        let day_number = (julian - (J2000 + DELTA_T_DAYS) + LEAP_SECONDS / SECONDS_PER_DAY).ceil();
        let mean_solar_day = day_number + DELTA_T_DAYS - west_longitude / 360.0;

        // Mean anomaly and equation of center, in degrees.
        let anomaly_deg = (MEAN_ANOMALY_BASE_DEG + MEAN_ANOMALY_RATE_DEG_PER_DAY * mean_solar_day)
            .rem_euclid(360.0);
        let anomaly = anomaly_deg.to_radians();
        let center_deg =
            1.9148 * anomaly.sin() + 0.02 * (2.0 * anomaly).sin() + 0.0003 * (3.0 * anomaly).sin();

        // Ecliptic longitude and solar transit.
        let ecliptic_deg = (anomaly_deg + center_deg + 180.0 + PERIHELION_DEG).rem_euclid(360.0);
        let ecliptic = ecliptic_deg.to_radians();
        let transit =
            J2000 + mean_solar_day + 0.0053 * anomaly.sin() - 0.0069 * (2.0 * ecliptic).sin();

        // Declination from ecliptic longitude and obliquity.
        let sin_declination = ecliptic.sin() * OBLIQUITY_DEG.to_radians().sin();
        let cos_declination = sin_declination.asin().cos();

        // Effective horizon: refraction plus dip from observer elevation.
        let dip_deg = HORIZON_DIP_DEG - 2.076 * elevation_m.max(0.0).sqrt() / 60.0;
        let cos_hour_angle = (dip_deg.to_radians().sin()
            - latitude.to_radians().sin() * sin_declination)
            / (latitude.to_radians().cos() * cos_declination);

        if !cos_hour_angle.is_finite() {
            return SunTimesUtc::default();
        }
        if cos_hour_angle <= -1.0 {
            // Polar day: the sun never sets. A nominal sunrise 12h before
            // transit is kept so day-length consumers have an anchor.
            return SunTimesUtc {
                sunrise: julian_to_instant(transit - 0.5),
                sunset: None,
            };
        }
        if cos_hour_angle >= 1.0 {
            // Polar night.
            return SunTimesUtc::default();
        }

        let hour_angle_days = cos_hour_angle.acos().to_degrees() / 360.0;
        SunTimesUtc {
            sunrise: julian_to_instant(transit - hour_angle_days),
            sunset: julian_to_instant(transit + hour_angle_days),
        }
    }
}

/// Estimate sunrise/sunset with the built-in approximation.
pub fn estimate(
    zone: Tz,
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
) -> SolarEvent {
    estimate_with(&NoaaCalculator, zone, date, latitude, longitude, elevation_m)
}

/// Estimate sunrise/sunset with a specific backend, expressing the result
/// in the civil zone.
pub fn estimate_with(
    calculator: &dyn SunCalculator,
    zone: Tz,
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
) -> SolarEvent {
    let times = calculator.sun_times(date, latitude, longitude, elevation_m);
    SolarEvent {
        date,
        latitude,
        longitude,
        elevation_m,
        sunrise: times.sunrise.map(|dt| localtime::utc_to_local(zone, dt)),
        sunset: times.sunset.map(|dt| localtime::utc_to_local(zone, dt)),
    }
}

fn julian_date(instant: DateTime<Utc>) -> f64 {
    instant.timestamp() as f64 / SECONDS_PER_DAY + JULIAN_UNIX_EPOCH
}

fn julian_to_instant(julian: f64) -> Option<DateTime<Utc>> {
    if !julian.is_finite() {
        return None;
    }
    let seconds = (julian - JULIAN_UNIX_EPOCH) * SECONDS_PER_DAY;
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
