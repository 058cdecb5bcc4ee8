//! Protocol timing-correction rules.
//!
//! Survey protocols define the biologically meaningful window for a visit
//! relative to sunrise or sunset; reported times are hand-logged and
//! routinely off. Each rule clamps values outside its window to a
//! canonical boundary, so downstream sees exactly one corrected value.
//!
//! Rules live in a registry and every applicable rule runs, in fixed
//! order. Supporting a new protocol means adding one rule to the list in
//! [`suggest_times`], not another branch in shared logic.

use chrono::{DateTime, Duration, Timelike};
use chrono_tz::Tz;
use tracing::debug;

use crate::types::{DayPart, DayPartKind, ProtocolCode};

/// Everything a suggestion is a pure function of.
#[derive(Debug, Clone, Copy)]
pub struct SuggestInput<'a> {
    pub code: Option<&'a ProtocolCode>,
    pub day_part: Option<&'a DayPart>,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub sunrise: Option<DateTime<Tz>>,
    pub sunset: Option<DateTime<Tz>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSuggestion {
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub duration_hours: Option<f64>,
}

trait CorrectionRule {
    fn name(&self) -> &'static str;

    /// Whether the code/day-part/anchor combination selects this rule.
    fn applies(&self, input: &SuggestInput<'_>) -> bool;

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        input: &SuggestInput<'_>,
    );
}

/// Run every applicable correction over the reported times and derive the
/// duration. Re-running on its own output is a no-op: corrected values
/// always land inside their acceptance windows.
pub fn suggest_times(input: &SuggestInput<'_>) -> TimeSuggestion {
    let vm01_evening = Vm01Evening;
    let vm01_morning = Vm01Morning;
    let vm02_evening = Vm02Evening;
    let gz_sunset = GzSunsetWindow;
    let zr_sunrise = ZrSunriseWindow;
    let rules: [&dyn CorrectionRule; 5] = [
        &vm01_evening,
        &vm01_morning,
        &vm02_evening,
        &gz_sunset,
        &zr_sunrise,
    ];

    let mut start = input.start;
    let mut end = input.end;

    for rule in rules {
        if rule.applies(input) {
            debug!(rule = rule.name(), "applying timing correction");
            rule.apply(&mut start, &mut end, input);
        }
    }

    let duration_hours = match (start, end) {
        (Some(start), Some(end)) => Some((end - start).num_seconds() as f64 / 3600.0),
        _ => None,
    };

    TimeSuggestion {
        start,
        end,
        duration_hours,
    }
}

fn outside(value: DateTime<Tz>, lower: DateTime<Tz>, upper: DateTime<Tz>) -> bool {
    value < lower || value > upper
}

fn clock_minutes(value: DateTime<Tz>) -> u32 {
    value.hour() * 60 + value.minute()
}

/// Replace only the clock-time components, keeping the date. `None` when
/// the resulting wall time does not exist in the zone.
fn with_clock(value: DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    value
        .with_hour(hour)?
        .with_minute(minute)?
        .with_second(0)?
        .with_nanosecond(0)
}

fn code_is(input: &SuggestInput<'_>, code: &str) -> bool {
    input.code.is_some_and(|c| c.is(code))
}

fn code_contains(input: &SuggestInput<'_>, fragment: &str) -> bool {
    input.code.is_some_and(|c| c.contains(fragment))
}

fn day_part_is(input: &SuggestInput<'_>, kind: DayPartKind) -> bool {
    input.day_part.is_some_and(|dp| dp.kind == kind)
}

/// VM01 evening visits run from sunset to sunset+3h. A missing or
/// out-of-window start snaps to sunset; a missing end, or one outside
/// [sunset+3h, sunset+4h], snaps to sunset+3h.
struct Vm01Evening;

impl CorrectionRule for Vm01Evening {
    fn name(&self) -> &'static str {
        "vm01_evening"
    }

    fn applies(&self, input: &SuggestInput<'_>) -> bool {
        code_is(input, "VM01")
            && day_part_is(input, DayPartKind::Evening)
            && input.sunset.is_some()
    }

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        input: &SuggestInput<'_>,
    ) {
        let Some(sunset) = input.sunset else { return };

        let snap_start = match *start {
            None => true,
            Some(value) => outside(value, sunset - Duration::hours(1), sunset),
        };
        if snap_start {
            *start = Some(sunset);
        }

        let target = sunset + Duration::hours(3);
        let snap_end = match *end {
            None => true,
            Some(value) => outside(value, target, sunset + Duration::hours(4)),
        };
        if snap_end {
            *end = Some(target);
        }
    }
}

/// VM01 morning visits run from sunrise−3h to sunrise. Out-of-window
/// values snap; missing values stay missing.
struct Vm01Morning;

impl CorrectionRule for Vm01Morning {
    fn name(&self) -> &'static str {
        "vm01_morning"
    }

    fn applies(&self, input: &SuggestInput<'_>) -> bool {
        code_is(input, "VM01")
            && day_part_is(input, DayPartKind::Morning)
            && input.sunrise.is_some()
    }

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        input: &SuggestInput<'_>,
    ) {
        let Some(sunrise) = input.sunrise else { return };

        if let Some(value) = *end {
            if outside(value, sunrise, sunrise + Duration::hours(4)) {
                *end = Some(sunrise);
            }
        }
        if let Some(value) = *start {
            if outside(
                value,
                sunrise - Duration::hours(4),
                sunrise - Duration::hours(3),
            ) {
                *start = Some(sunrise - Duration::hours(3));
            }
        }
    }
}

/// VM02 evening visits start between 22:59 and 23:59 and end between
/// 02:00 and 03:00 after midnight. The windows are on the clock time;
/// after a single end<=start midnight rollover, only the end's clock time
/// is clamped and its date is left as the rollover put it.
struct Vm02Evening;

const VM02_START_LOWER_MIN: u32 = 22 * 60 + 59;
const VM02_START_UPPER_MIN: u32 = 23 * 60 + 59;
const VM02_END_LOWER_MIN: u32 = 2 * 60;
const VM02_END_UPPER_MIN: u32 = 3 * 60;

impl CorrectionRule for Vm02Evening {
    fn name(&self) -> &'static str {
        "vm02_evening"
    }

    fn applies(&self, input: &SuggestInput<'_>) -> bool {
        code_is(input, "VM02") && day_part_is(input, DayPartKind::Evening)
    }

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        _input: &SuggestInput<'_>,
    ) {
        if let Some(value) = *start {
            let minutes = clock_minutes(value);
            if !(VM02_START_LOWER_MIN..=VM02_START_UPPER_MIN).contains(&minutes) {
                if let Some(snapped) = with_clock(value, 23, 59) {
                    *start = Some(snapped);
                }
            }
        }

        if let (Some(start_value), Some(end_value)) = (*start, *end) {
            if end_value <= start_value {
                *end = Some(end_value + Duration::days(1));
            }
        }

        if let Some(value) = *end {
            let minutes = clock_minutes(value);
            if minutes < VM02_END_LOWER_MIN {
                if let Some(snapped) = with_clock(value, 2, 0) {
                    *end = Some(snapped);
                }
            } else if minutes > VM02_END_UPPER_MIN {
                if let Some(snapped) = with_clock(value, 3, 0) {
                    *end = Some(snapped);
                }
            }
        }
    }
}

/// GZ visits bracket sunset: start in [sunset−150m, sunset−90m], end in
/// [sunset+30m, sunset+90m]. Matches by containment so composite codes
/// still select the rule.
struct GzSunsetWindow;

impl CorrectionRule for GzSunsetWindow {
    fn name(&self) -> &'static str {
        "gz_sunset_window"
    }

    fn applies(&self, input: &SuggestInput<'_>) -> bool {
        code_contains(input, "GZ") && input.sunset.is_some()
    }

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        input: &SuggestInput<'_>,
    ) {
        let Some(sunset) = input.sunset else { return };
        snap_to_anchor_windows(start, end, sunset);
    }
}

/// ZR visits bracket sunrise with the same offsets as GZ around sunset.
struct ZrSunriseWindow;

impl CorrectionRule for ZrSunriseWindow {
    fn name(&self) -> &'static str {
        "zr_sunrise_window"
    }

    fn applies(&self, input: &SuggestInput<'_>) -> bool {
        code_contains(input, "ZR") && input.sunrise.is_some()
    }

    fn apply(
        &self,
        start: &mut Option<DateTime<Tz>>,
        end: &mut Option<DateTime<Tz>>,
        input: &SuggestInput<'_>,
    ) {
        let Some(sunrise) = input.sunrise else { return };
        snap_to_anchor_windows(start, end, sunrise);
    }
}

/// Shared GZ/ZR geometry: start in [anchor−150m, anchor−90m] snapping to
/// the upper bound, end in [anchor+30m, anchor+90m] snapping to the lower.
fn snap_to_anchor_windows(
    start: &mut Option<DateTime<Tz>>,
    end: &mut Option<DateTime<Tz>>,
    anchor: DateTime<Tz>,
) {
    if let Some(value) = *start {
        let lower = anchor - Duration::minutes(150);
        let upper = anchor - Duration::minutes(90);
        if outside(value, lower, upper) {
            *start = Some(upper);
        }
    }
    if let Some(value) = *end {
        let lower = anchor + Duration::minutes(30);
        let upper = anchor + Duration::minutes(90);
        if outside(value, lower, upper) {
            *end = Some(lower);
        }
    }
}
