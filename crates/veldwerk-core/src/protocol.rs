//! Extraction of protocol codes and day parts from raw visit names.
//!
//! Visit names are free text ("WM1 Ochtend II", "GZ - avond"); the code
//! and the day part are found by two independent pattern searches, so
//! either side can come up empty without affecting the other.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DayPart, DayPartKind, ProtocolCode};

static CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([vzwh]m[-\s]?\d+|gz|zr|hm|uitvliegtelling)").expect("code pattern")
});

static DAY_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(avond|ochtend)\s*([0-9]+|i{1,3})?").expect("day-part pattern"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub code: Option<ProtocolCode>,
    pub day_part: Option<DayPart>,
}

pub fn extract(name: Option<&str>) -> Extraction {
    let Some(name) = name else {
        return Extraction::default();
    };
    if name.is_empty() {
        return Extraction::default();
    }
    Extraction {
        code: extract_code(name),
        day_part: extract_day_part(name),
    }
}

fn extract_code(name: &str) -> Option<ProtocolCode> {
    let matched = CODE.find(name)?;
    let mut code: String = matched
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    code.make_ascii_uppercase();

    // WM shows up in the exports as a recurring typo for VM.
    if let Some(rest) = code.strip_prefix("WM") {
        code = format!("VM{rest}");
    }
    Some(ProtocolCode::new(pad_vm_single_digit(code)))
}

/// `VM1` becomes `VM01`; only the VM series is padded.
fn pad_vm_single_digit(code: String) -> String {
    let bytes = code.as_bytes();
    if bytes.len() == 3 && code.starts_with("VM") && bytes[2].is_ascii_digit() {
        format!("VM0{}", &code[2..])
    } else {
        code
    }
}

fn extract_day_part(name: &str) -> Option<DayPart> {
    let captures = DAY_PART.captures(name)?;
    let kind = DayPartKind::try_from(captures.get(1)?.as_str()).ok()?;
    let ordinal = captures.get(2).and_then(|m| parse_ordinal(m.as_str()));
    Some(DayPart { kind, ordinal })
}

fn parse_ordinal(raw: &str) -> Option<u32> {
    match raw.to_ascii_lowercase().as_str() {
        "i" => Some(1),
        "ii" => Some(2),
        "iii" => Some(3),
        other => other.parse().ok(),
    }
}
