use chrono::{Datelike, Duration, NaiveDate, Timelike};
use chrono_tz::Europe::Amsterdam;

use veldwerk_core::solar::{estimate, NoaaCalculator, SunCalculator};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn midsummer_amsterdam_has_ordered_sun_times() {
    let event = estimate(Amsterdam, date(2025, 6, 21), 52.37, 4.90, 0.0);
    let sunrise = event.sunrise.expect("sunrise missing");
    let sunset = event.sunset.expect("sunset missing");

    assert!(sunrise < sunset);
    // The approximation lands within the expected early-morning and
    // late-evening hours for a 52°N midsummer day.
    assert!((4..=6).contains(&sunrise.hour()), "sunrise at {sunrise}");
    assert!((21..=23).contains(&sunset.hour()), "sunset at {sunset}");
    assert_eq!(sunrise.date_naive(), date(2025, 6, 21));
    assert_eq!(sunset.date_naive(), date(2025, 6, 21));
}

#[test]
fn midwinter_amsterdam_day_is_short() {
    let event = estimate(Amsterdam, date(2025, 12, 21), 52.37, 4.90, 0.0);
    let sunrise = event.sunrise.expect("sunrise missing");
    let sunset = event.sunset.expect("sunset missing");

    let day_length = sunset - sunrise;
    assert!(day_length < Duration::hours(9), "day length {day_length}");
    assert!(day_length > Duration::hours(6), "day length {day_length}");
}

#[test]
fn temperate_latitudes_always_get_both_events_near_the_date() {
    let samples = [
        (52.0907, 5.1214),
        (-33.86, 151.21),
        (0.0, 0.0),
        (60.0, -135.0),
        (-45.0, 170.0),
    ];
    for (latitude, longitude) in samples {
        for (year, month, day) in [(2025, 3, 20), (2025, 6, 21), (2025, 9, 23), (2025, 12, 21)] {
            let target = date(year, month, day);
            let event = estimate(Amsterdam, target, latitude, longitude, 0.0);
            let sunrise = event.sunrise.unwrap_or_else(|| {
                panic!("no sunrise at ({latitude}, {longitude}) on {target}")
            });
            let sunset = event.sunset.unwrap_or_else(|| {
                panic!("no sunset at ({latitude}, {longitude}) on {target}")
            });
            assert!(sunrise <= sunset);

            // Timezone offsets can push the local calendar day by one.
            for instant in [sunrise, sunset] {
                let drift = (instant.date_naive() - target).num_days().abs();
                assert!(drift <= 1, "{instant} too far from {target}");
            }
        }
    }
}

#[test]
fn polar_day_keeps_a_nominal_sunrise_and_no_sunset() {
    let event = estimate(Amsterdam, date(2025, 6, 21), 89.9, 0.0, 0.0);
    assert!(event.sunrise.is_some());
    assert!(event.sunset.is_none());
}

#[test]
fn polar_night_has_no_events() {
    let north_winter = estimate(Amsterdam, date(2025, 12, 21), 89.9, 0.0, 0.0);
    assert_eq!((north_winter.sunrise, north_winter.sunset), (None, None));

    let south_june = estimate(Amsterdam, date(2025, 6, 21), -89.9, 0.0, 0.0);
    assert_eq!((south_june.sunrise, south_june.sunset), (None, None));
}

#[test]
fn no_sunrise_after_sunset_at_any_extreme() {
    for latitude in [-90.0, -66.5, -23.5, 0.0, 23.5, 66.5, 90.0] {
        for (month, day) in [(6, 21), (12, 21)] {
            let event = estimate(Amsterdam, date(2025, month, day), latitude, 0.0, 0.0);
            if let (Some(sunrise), Some(sunset)) = (event.sunrise, event.sunset) {
                assert!(sunrise <= sunset, "inversion at latitude {latitude}");
            }
        }
    }
}

#[test]
fn elevation_widens_the_day() {
    let sea_level = estimate(Amsterdam, date(2025, 6, 21), 52.37, 4.90, 0.0);
    let mountain = estimate(Amsterdam, date(2025, 6, 21), 52.37, 4.90, 2000.0);

    assert!(mountain.sunrise.unwrap() < sea_level.sunrise.unwrap());
    assert!(mountain.sunset.unwrap() > sea_level.sunset.unwrap());
}

#[test]
fn non_finite_coordinates_degrade_to_no_event() {
    let event = estimate(Amsterdam, date(2025, 6, 21), f64::NAN, 4.90, 0.0);
    assert_eq!((event.sunrise, event.sunset), (None, None));
}

#[test]
fn backend_reports_utc_pair_directly() {
    let times = NoaaCalculator.sun_times(date(2025, 6, 21), 52.37, 4.90, 0.0);
    let sunrise = times.sunrise.expect("sunrise missing");
    let sunset = times.sunset.expect("sunset missing");
    assert!(sunrise < sunset);
    // Oracle values from the reference computation: 03:58 and 20:46 UTC.
    assert_eq!(sunrise.hour(), 3);
    assert_eq!(sunset.hour(), 20);
    assert_eq!(sunrise.day(), 21);
}
