//! Conversion of the exports' heterogeneous timestamps into the civil
//! timezone.
//!
//! Two interpretations exist for naive values and both are needed:
//! user-entered clock times are wall time in the civil zone
//! ([`parse_local`]), machine-recorded times such as ephemeris output are
//! UTC ([`naive_as_utc`]). Anything unparseable becomes `None` so a
//! corrupt timestamp never aborts a batch.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

static AWARE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"];

static NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Parse a user-entered timestamp. Naive input is taken as wall time in
/// `zone`; offset-carrying input is converted into `zone`.
pub fn parse_local(zone: Tz, raw: &str) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(aware) = parse_aware(trimmed) {
        return Some(aware.with_timezone(&zone));
    }
    parse_naive(trimmed).and_then(|naive| naive_as_local(zone, naive))
}

/// Parse a machine-recorded timestamp. Naive input is taken as UTC.
pub fn parse_utc(zone: Tz, raw: &str) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(aware) = parse_aware(trimmed) {
        return Some(aware.with_timezone(&zone));
    }
    parse_naive(trimmed).map(|naive| naive_as_utc(zone, naive))
}

/// Resolve a naive wall-clock value in `zone`. DST ambiguity picks the
/// earlier instant; the spring-forward gap has no valid instant and
/// yields `None`.
pub fn naive_as_local(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => None,
    }
}

/// Interpret a naive value as UTC and express it in `zone`.
pub fn naive_as_utc(zone: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    naive.and_utc().with_timezone(&zone)
}

pub fn utc_to_local(zone: Tz, instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&zone)
}

fn parse_aware(value: &str) -> Option<DateTime<chrono::FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    for format in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    None
}

pub(crate) fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
