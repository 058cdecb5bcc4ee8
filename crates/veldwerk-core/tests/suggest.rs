use chrono::{DateTime, Duration, TimeZone, Timelike};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;

use veldwerk_core::protocol::extract;
use veldwerk_core::suggest::{suggest_times, SuggestInput, TimeSuggestion};
use veldwerk_core::types::{DayPart, ProtocolCode};

fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    Amsterdam
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

fn code_and_day_part(name: &str) -> (Option<ProtocolCode>, Option<DayPart>) {
    let extraction = extract(Some(name));
    (extraction.code, extraction.day_part)
}

fn run(
    name: &str,
    start: Option<DateTime<Tz>>,
    end: Option<DateTime<Tz>>,
    sunrise: Option<DateTime<Tz>>,
    sunset: Option<DateTime<Tz>>,
) -> TimeSuggestion {
    let (code, day_part) = code_and_day_part(name);
    suggest_times(&SuggestInput {
        code: code.as_ref(),
        day_part: day_part.as_ref(),
        start,
        end,
        sunrise,
        sunset,
    })
}

#[test]
fn vm01_evening_start_inside_window_is_unchanged() {
    let sunset = local(2025, 6, 12, 20, 0);
    let start = local(2025, 6, 12, 19, 50);
    let result = run("VM01 avond", Some(start), None, None, Some(sunset));
    assert_eq!(result.start, Some(start));
}

#[test]
fn vm01_evening_start_outside_window_snaps_to_sunset() {
    let sunset = local(2025, 6, 12, 20, 0);
    let start = local(2025, 6, 12, 18, 0);
    let result = run("VM01 avond", Some(start), None, None, Some(sunset));
    assert_eq!(result.start, Some(sunset));
}

#[test]
fn vm01_evening_fills_missing_times_from_sunset() {
    let sunset = local(2025, 6, 12, 22, 0);
    let result = run("VM01 avond 1", None, None, None, Some(sunset));
    assert_eq!(result.start, Some(sunset));
    assert_eq!(result.end, Some(sunset + Duration::hours(3)));
    assert_eq!(result.duration_hours, Some(3.0));
}

#[test]
fn vm01_evening_end_outside_window_snaps_to_sunset_plus_three() {
    let sunset = local(2025, 6, 12, 22, 0);
    let end = local(2025, 6, 13, 3, 0); // past sunset + 4h
    let result = run(
        "VM01 avond",
        Some(sunset),
        Some(end),
        None,
        Some(sunset),
    );
    assert_eq!(result.end, Some(sunset + Duration::hours(3)));
}

#[test]
fn vm01_morning_clamps_but_does_not_fill() {
    let sunrise = local(2025, 6, 13, 5, 30);
    // End after sunrise + 4h snaps back to sunrise.
    let end = local(2025, 6, 13, 11, 0);
    let result = run("VM01 ochtend", None, Some(end), Some(sunrise), None);
    assert_eq!(result.end, Some(sunrise));
    // Missing start stays missing for morning visits.
    assert_eq!(result.start, None);
    assert_eq!(result.duration_hours, None);

    // Start outside [sunrise-4h, sunrise-3h] snaps to sunrise-3h.
    let start = local(2025, 6, 13, 5, 0);
    let result = run("VM01 ochtend", Some(start), None, Some(sunrise), None);
    assert_eq!(result.start, Some(sunrise - Duration::hours(3)));
}

#[test]
fn vm01_without_anchor_passes_through() {
    let start = local(2025, 6, 12, 18, 0);
    let result = run("VM01 avond", Some(start), None, None, None);
    assert_eq!(result.start, Some(start));
    assert_eq!(result.end, None);
}

#[test]
fn vm02_valid_midnight_crossing_is_not_double_incremented() {
    let start = local(2025, 6, 12, 23, 30);
    let end = local(2025, 6, 13, 2, 30);
    let result = run("VM02 avond", Some(start), Some(end), None, None);
    assert_eq!(result.start, Some(start));
    assert_eq!(result.end, Some(end));
    assert_eq!(result.duration_hours, Some(3.0));
}

#[test]
fn vm02_start_outside_clock_window_snaps_to_2359_same_date() {
    let start = local(2025, 6, 12, 21, 0);
    let end = local(2025, 6, 13, 2, 30);
    let result = run("VM02 avond", Some(start), Some(end), None, None);
    let snapped = result.start.unwrap();
    assert_eq!(snapped.date_naive(), start.date_naive());
    assert_eq!((snapped.hour(), snapped.minute()), (23, 59));
    assert_eq!(result.end, Some(end));
}

#[test]
fn vm02_end_before_start_rolls_over_one_day() {
    let start = local(2025, 6, 12, 23, 30);
    let end = local(2025, 6, 12, 2, 30); // entered on the wrong date
    let result = run("VM02 avond", Some(start), Some(end), None, None);
    assert_eq!(result.end, Some(end + Duration::days(1)));
}

#[test]
fn vm02_end_clock_time_is_clamped_into_window() {
    let start = local(2025, 6, 12, 23, 30);

    let early = local(2025, 6, 13, 1, 15);
    let result = run("VM02 avond", Some(start), Some(early), None, None);
    let end = result.end.unwrap();
    assert_eq!((end.hour(), end.minute()), (2, 0));
    assert_eq!(end.date_naive(), early.date_naive());

    let late = local(2025, 6, 13, 4, 45);
    let result = run("VM02 avond", Some(start), Some(late), None, None);
    let end = result.end.unwrap();
    assert_eq!((end.hour(), end.minute()), (3, 0));
}

#[test]
fn gz_windows_bracket_sunset() {
    let sunset = local(2025, 6, 12, 21, 0);

    // End below sunset + 30m snaps to sunset + 30m.
    let end = local(2025, 6, 12, 21, 10);
    let result = run("GZ", None, Some(end), None, Some(sunset));
    assert_eq!(result.end, Some(sunset + Duration::minutes(30)));

    // Start above sunset - 90m snaps to sunset - 90m.
    let start = local(2025, 6, 12, 20, 30);
    let result = run("GZ", Some(start), None, None, Some(sunset));
    assert_eq!(result.start, Some(sunset - Duration::minutes(90)));

    // Values inside the windows stay put.
    let start = local(2025, 6, 12, 19, 0);
    let end = local(2025, 6, 12, 21, 45);
    let result = run("GZ", Some(start), Some(end), None, Some(sunset));
    assert_eq!(result.start, Some(start));
    assert_eq!(result.end, Some(end));
}

#[test]
fn zr_windows_bracket_sunrise() {
    let sunrise = local(2025, 6, 13, 5, 30);

    let start = local(2025, 6, 13, 2, 0); // before sunrise - 150m
    let end = local(2025, 6, 13, 7, 30); // after sunrise + 90m
    let result = run("ZR ronde", Some(start), Some(end), Some(sunrise), None);
    assert_eq!(result.start, Some(sunrise - Duration::minutes(90)));
    assert_eq!(result.end, Some(sunrise + Duration::minutes(30)));
}

#[test]
fn gz_without_sunset_passes_through() {
    let start = local(2025, 6, 12, 20, 30);
    let result = run("GZ", Some(start), None, None, None);
    assert_eq!(result.start, Some(start));
}

#[test]
fn unmatched_code_passes_everything_through() {
    let start = local(2025, 6, 12, 13, 0);
    let end = local(2025, 6, 12, 14, 30);
    let sunrise = local(2025, 6, 12, 5, 30);
    let sunset = local(2025, 6, 12, 22, 0);

    let result = run("HM controle", Some(start), Some(end), Some(sunrise), Some(sunset));
    assert_eq!(result.start, Some(start));
    assert_eq!(result.end, Some(end));
    assert_eq!(result.duration_hours, Some(1.5));
}

#[test]
fn no_code_at_all_passes_through() {
    let start = local(2025, 6, 12, 13, 0);
    let result = run("losse ronde", Some(start), None, None, None);
    assert_eq!(result.start, Some(start));
    assert_eq!(result.duration_hours, None);
}

#[test]
fn engine_is_idempotent_on_its_own_output() {
    let sunrise = local(2025, 6, 13, 5, 30);
    let sunset = local(2025, 6, 12, 22, 0);

    for name in ["VM01 avond", "VM01 ochtend 1", "VM02 avond", "GZ", "ZR"] {
        let first = run(
            name,
            Some(local(2025, 6, 12, 17, 0)),
            Some(local(2025, 6, 13, 9, 0)),
            Some(sunrise),
            Some(sunset),
        );
        let second = run(name, first.start, first.end, Some(sunrise), Some(sunset));
        assert_eq!(second.start, first.start, "{name} start drifted");
        assert_eq!(second.end, first.end, "{name} end drifted");
    }
}

#[test]
fn composite_codes_still_select_containment_rules() {
    // A name carrying both a VM02 code and the GZ marker: every matching
    // rule applies.
    let (code, _) = code_and_day_part("GZ");
    assert!(code.unwrap().contains("GZ"));

    let sunset = local(2025, 6, 12, 21, 0);
    let start = local(2025, 6, 12, 18, 0);
    let result = run("rondje GZ avond", Some(start), None, None, Some(sunset));
    assert_eq!(result.start, Some(sunset - Duration::minutes(90)));
}
