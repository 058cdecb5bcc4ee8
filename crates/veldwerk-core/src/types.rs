use std::fmt;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Normalized survey-protocol code extracted from a visit name (`VM01`,
/// `GZ`, `ZR`, `UITVLIEGTELLING`, ...).
///
/// Always uppercase with separators stripped; produced only by
/// [`crate::protocol::extract`]. Kept as a validated string rather than a
/// closed enum: the VM series is open-ended and the GZ/ZR timing rules
/// match by containment so composite codes stay matchable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolCode(String);

impl ProtocolCode {
    pub(crate) fn new(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match, as the VM01/VM02 timing rules require.
    pub fn is(&self, code: &str) -> bool {
        self.0 == code
    }

    /// Containment match, as the GZ/ZR timing rules require.
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }

    /// Prefix match, as the VM03 review rule requires.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ProtocolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Morning/evening session label, in the survey platform's Dutch terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPartKind {
    Morning,
    Evening,
}

impl DayPartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPartKind::Morning => "ochtend",
            DayPartKind::Evening => "avond",
        }
    }
}

impl fmt::Display for DayPartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DayPartKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ochtend" => Ok(DayPartKind::Morning),
            "avond" => Ok(DayPartKind::Evening),
            other => Err(format!("unknown day part '{other}'")),
        }
    }
}

/// Day part plus the optional ordinal disambiguating repeat sessions
/// ("avond 2"). An unparseable ordinal is dropped while the kind stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPart {
    pub kind: DayPartKind,
    pub ordinal: Option<u32>,
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(ordinal) => write!(f, "{} {}", self.kind, ordinal),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Sunrise/sunset for one location-date, in the civil timezone.
///
/// Both `None` means polar day/night or a failed computation; the two are
/// not distinguished here and downstream treats either as missing data.
/// When both are present, sunrise <= sunset.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarEvent {
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub sunrise: Option<DateTime<Tz>>,
    pub sunset: Option<DateTime<Tz>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewFlag {
    Yes,
    No,
}

impl ReviewFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFlag::Yes => "yes",
            ReviewFlag::No => "no",
        }
    }
}

impl fmt::Display for ReviewFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a visit row matched one of the configured removal patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowRemoval {
    Keep,
    Remove,
}

impl RowRemoval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowRemoval::Keep => "keep",
            RowRemoval::Remove => "remove",
        }
    }
}

impl fmt::Display for RowRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
