//! Field-visit enrichment: one pass per visit row deriving the solar
//! anchors, the normalized protocol code, the suggested times and the
//! review flag.

use std::collections::HashMap;

use chrono::DateTime;
use chrono_tz::Tz;
use regex::RegexBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::flagger::{self, FlagInput};
use crate::localtime;
use crate::protocol;
use crate::solar;
use crate::suggest::{self, SuggestInput, TimeSuggestion};
use crate::types::{DayPart, ProtocolCode, ReviewFlag, RowRemoval, SolarEvent};
use veldwerk_parser::{FieldVisitRow, ObservationRow, ProjectRow};

/// A field visit with every derived attribute attached. Built once from
/// the source tables and not mutated afterwards; each derived field is a
/// function of the raw fields alone.
#[derive(Debug, Clone)]
pub struct VisitRecord {
    pub visit_id: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub city: Option<String>,
    pub raw_name: Option<String>,
    pub coordinates: Option<String>,
    pub reported_start: Option<String>,
    pub reported_end: Option<String>,
    pub reported_duration: Option<String>,

    pub protocol: Option<ProtocolCode>,
    pub day_part: Option<DayPart>,
    pub clean_name: Option<String>,
    pub removal: RowRemoval,
    pub solar: Option<SolarEvent>,
    pub suggested_start: Option<DateTime<Tz>>,
    pub suggested_end: Option<DateTime<Tz>>,
    pub suggested_duration_hours: Option<f64>,
    pub review: ReviewFlag,
}

impl VisitRecord {
    pub fn sunrise(&self) -> Option<DateTime<Tz>> {
        self.solar.as_ref().and_then(|event| event.sunrise)
    }

    pub fn sunset(&self) -> Option<DateTime<Tz>> {
        self.solar.as_ref().and_then(|event| event.sunset)
    }
}

/// Splits a "lat, lon" string into a numeric pair. Extra trailing
/// components are ignored.
pub fn split_coordinates(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.splitn(3, ',');
    let latitude = parts.next()?.trim().parse().ok()?;
    let longitude = parts.next()?.trim().parse().ok()?;
    Some((latitude, longitude))
}

/// Enrich every visit row. `remove_patterns` are regex fragments matched
/// case-insensitively anywhere in the raw visit name.
pub fn enrich_visits(
    zone: Tz,
    remove_patterns: &[String],
    visits: &[FieldVisitRow],
    observations: &[ObservationRow],
    projects: &[ProjectRow],
) -> Result<Vec<VisitRecord>> {
    let removal = removal_matcher(remove_patterns)?;
    let cities = city_map(projects);
    let visit_coordinates = first_coordinate_per_visit(observations);

    // Representative coordinate per visit, with visits lacking one
    // inheriting the first coordinate seen among the project's visits.
    let mut resolved: Vec<Option<String>> = visits
        .iter()
        .map(|row| {
            row.id
                .as_deref()
                .and_then(|id| visit_coordinates.get(id))
                .cloned()
        })
        .collect();
    let mut project_first: HashMap<&str, String> = HashMap::new();
    for (row, coordinate) in visits.iter().zip(resolved.iter()) {
        if let (Some(project), Some(coordinate)) = (row.project_id.as_deref(), coordinate) {
            project_first
                .entry(project)
                .or_insert_with(|| coordinate.clone());
        }
    }
    for (row, coordinate) in visits.iter().zip(resolved.iter_mut()) {
        if coordinate.is_none() {
            if let Some(project) = row.project_id.as_deref() {
                *coordinate = project_first.get(project).cloned();
            }
        }
    }

    let records: Vec<VisitRecord> = visits
        .iter()
        .zip(resolved)
        .map(|(row, coordinates)| enrich_visit(zone, removal.as_ref(), &cities, row, coordinates))
        .collect();

    info!(
        visits = records.len(),
        flagged = records
            .iter()
            .filter(|r| r.review == ReviewFlag::Yes)
            .count(),
        "field-visit enrichment finished"
    );
    Ok(records)
}

fn enrich_visit(
    zone: Tz,
    removal: Option<&regex::Regex>,
    cities: &HashMap<&str, &str>,
    row: &FieldVisitRow,
    coordinates: Option<String>,
) -> VisitRecord {
    let extraction = protocol::extract(row.name.as_deref());
    let clean_name = match (&extraction.code, &extraction.day_part) {
        (Some(code), Some(day_part)) => Some(format!("{code} {day_part}")),
        (Some(code), None) => Some(code.to_string()),
        (None, _) => None,
    };

    let start_local = row
        .start
        .as_deref()
        .and_then(|raw| localtime::parse_local(zone, raw));
    let end_local = row
        .end
        .as_deref()
        .and_then(|raw| localtime::parse_local(zone, raw));

    let solar_event = match (
        coordinates.as_deref().and_then(split_coordinates),
        start_local.map(|dt| dt.date_naive()),
    ) {
        (Some((latitude, longitude)), Some(date)) => {
            Some(solar::estimate(zone, date, latitude, longitude, 0.0))
        }
        _ => None,
    };
    let sunrise = solar_event.as_ref().and_then(|event| event.sunrise);
    let sunset = solar_event.as_ref().and_then(|event| event.sunset);

    let TimeSuggestion {
        start: suggested_start,
        end: suggested_end,
        duration_hours,
    } = suggest::suggest_times(&SuggestInput {
        code: extraction.code.as_ref(),
        day_part: extraction.day_part.as_ref(),
        start: start_local,
        end: end_local,
        sunrise,
        sunset,
    });

    let review = flagger::review_flag(&FlagInput {
        code: extraction.code.as_ref(),
        has_sunrise: sunrise.is_some(),
        has_sunset: sunset.is_some(),
        clean_name: clean_name.as_deref(),
        raw_name: row.name.as_deref(),
    });

    let removal = match (removal, row.name.as_deref()) {
        (Some(pattern), Some(name)) if pattern.is_match(name) => RowRemoval::Remove,
        _ => RowRemoval::Keep,
    };

    debug!(
        visit = row.id.as_deref().unwrap_or(""),
        code = extraction
            .code
            .as_ref()
            .map(|c| c.as_str())
            .unwrap_or(""),
        review = %review,
        "visit enriched"
    );

    VisitRecord {
        visit_id: row.id.clone(),
        project_id: row.project_id.clone(),
        project_name: row.project_name.clone(),
        city: row
            .project_id
            .as_deref()
            .and_then(|id| cities.get(id))
            .map(|city| city.to_string()),
        raw_name: row.name.clone(),
        coordinates,
        reported_start: row.start.clone(),
        reported_end: row.end.clone(),
        reported_duration: row.duration_hours.clone(),
        protocol: extraction.code,
        day_part: extraction.day_part,
        clean_name,
        removal,
        solar: solar_event,
        suggested_start,
        suggested_end,
        suggested_duration_hours: duration_hours,
        review,
    }
}

fn removal_matcher(patterns: &[String]) -> Result<Option<regex::Regex>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&patterns.join("|"))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| PipelineError::Config(format!("invalid remove pattern: {err}")))
}

fn city_map(projects: &[ProjectRow]) -> HashMap<&str, &str> {
    projects
        .iter()
        .filter_map(|project| match (&project.id, &project.city) {
            (Some(id), Some(city)) => Some((id.as_str(), city.as_str())),
            _ => None,
        })
        .collect()
}

/// First observation coordinate per visit, in row order.
fn first_coordinate_per_visit(observations: &[ObservationRow]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for row in observations {
        if let (Some(visit), Some(coordinate)) = (&row.visit_id, &row.coordinates) {
            map.entry(visit.clone()).or_insert_with(|| coordinate.clone());
        }
    }
    map
}

/// One line of the adjustments table written for the surveyors, with the
/// platform's column names.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentRow {
    pub project_id: String,
    #[serde(rename = "veldbezoek_ID")]
    pub veldbezoek_id: String,
    pub check_data: String,
    pub verwijderd: String,
    pub project_naam: String,
    pub veldbezoeknaam_oud: String,
    pub veldbezoeknaam_nieuw: String,
    pub starttijd_oud: String,
    pub starttijd_nieuw: String,
    pub eindtijd_oud: String,
    pub eindtijd_nieuw: String,
    pub duur_oud: String,
    pub duur_nieuw: String,
    pub zonsopkomst: String,
    pub zonsondergang: String,
}

impl AdjustmentRow {
    pub fn from_record(record: &VisitRecord) -> Self {
        Self {
            project_id: record.project_id.clone().unwrap_or_default(),
            veldbezoek_id: record.visit_id.clone().unwrap_or_default(),
            check_data: record.review.as_str().to_string(),
            verwijderd: record.removal.as_str().to_string(),
            project_naam: record.project_name.clone().unwrap_or_default(),
            veldbezoeknaam_oud: record.raw_name.clone().unwrap_or_default(),
            veldbezoeknaam_nieuw: record
                .clean_name
                .clone()
                .or_else(|| record.raw_name.clone())
                .unwrap_or_default(),
            starttijd_oud: record.reported_start.clone().unwrap_or_default(),
            starttijd_nieuw: format_instant(record.suggested_start),
            eindtijd_oud: record.reported_end.clone().unwrap_or_default(),
            eindtijd_nieuw: format_instant(record.suggested_end),
            duur_oud: record.reported_duration.clone().unwrap_or_default(),
            duur_nieuw: record
                .suggested_duration_hours
                .map(|hours| format!("{hours:.2}"))
                .unwrap_or_default(),
            zonsopkomst: format_instant(record.sunrise()),
            zonsondergang: format_instant(record.sunset()),
        }
    }
}

fn format_instant(value: Option<DateTime<Tz>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_default()
}
