//! Output writers: the adjustments table, the per-project cleaned
//! observation tables and the per-group GeoJSON collections.
//!
//! All tabular output follows the exports' dialect: `;`-delimited, empty
//! string for missing values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::fieldvisits::{AdjustmentRow, VisitRecord};
use crate::observations::{safe_name, Observation};

pub fn write_adjustments_csv(path: &Path, records: &[VisitRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    for record in records {
        writer.serialize(AdjustmentRow::from_record(record))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "adjustments table written");
    Ok(())
}

const CLEANED_HEADER: &[&str] = &[
    "Verblijfnummer",
    "Groep",
    "Soort",
    "Datum",
    "Tijd",
    "Aantal",
    "Gedrag",
    "Verblijfplaats",
    "Sekse",
    "Adres",
    "Plaats",
    "Locatie_adres",
    "Functie",
    "Projectnaam",
];

/// One cleaned CSV per project, named after the project.
pub fn write_cleaned_observations(out_dir: &Path, observations: &[Observation]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut by_project: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for observation in observations {
        if let Some(project) = observation.project_name.as_deref() {
            by_project.entry(project).or_default().push(observation);
        }
    }

    let mut written = Vec::with_capacity(by_project.len());
    for (project, group) in by_project {
        let path = out_dir.join(format!("waarnemingen_export_{}.csv", safe_name(project)));
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(&path)?;
        writer.write_record(CLEANED_HEADER)?;
        for observation in group {
            writer.write_record(cleaned_record(observation))?;
        }
        writer.flush()?;
        written.push(path);
    }
    info!(projects = written.len(), "cleaned observation tables written");
    Ok(written)
}

fn cleaned_record(observation: &Observation) -> Vec<String> {
    vec![
        observation
            .roost_number
            .map(|n| n.to_string())
            .unwrap_or_default(),
        observation.group.as_str().to_string(),
        observation.raw.species.clone().unwrap_or_default(),
        observation
            .date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        observation
            .time
            .map(|t| t.to_string())
            .unwrap_or_default(),
        observation.raw.count.clone().unwrap_or_else(|| "1".to_string()),
        observation.raw.behaviour.clone().unwrap_or_default(),
        observation.raw.roost.clone().unwrap_or_default(),
        observation.raw.sex.clone().unwrap_or_default(),
        observation.street.clone().unwrap_or_default(),
        observation.place.clone().unwrap_or_default(),
        observation.location_remark.clone().unwrap_or_default(),
        observation
            .function
            .map(|f| f.as_str().to_string())
            .unwrap_or_default(),
        observation.project_name.clone().unwrap_or_default(),
    ]
}

/// One GeoJSON FeatureCollection per species group, for the observations
/// with usable coordinates.
pub fn write_group_geojson(out_dir: &Path, observations: &[Observation]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut by_group: BTreeMap<&str, Vec<Feature>> = BTreeMap::new();
    for observation in observations {
        let Some((latitude, longitude)) = observation.coordinates() else {
            continue;
        };
        by_group
            .entry(observation.group.as_str())
            .or_default()
            .push(observation_feature(observation, latitude, longitude));
    }

    let mut written = Vec::with_capacity(by_group.len());
    for (group, features) in by_group {
        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        let path = out_dir.join(format!("{}.geojson", safe_name(group)));
        fs::write(&path, GeoJson::from(collection).to_string())?;
        written.push(path);
    }
    info!(groups = written.len(), "geojson collections written");
    Ok(written)
}

fn observation_feature(observation: &Observation, latitude: f64, longitude: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("soort".to_string(), json!(observation.raw.species));
    properties.insert("groep".to_string(), json!(observation.group.as_str()));
    properties.insert(
        "datum".to_string(),
        json!(observation.date.map(|d| d.to_string())),
    );
    properties.insert(
        "tijd".to_string(),
        json!(observation.time.map(|t| t.to_string())),
    );
    properties.insert("aantal".to_string(), json!(observation.count));
    properties.insert("gedrag".to_string(), json!(observation.raw.behaviour));
    properties.insert(
        "functie".to_string(),
        json!(observation.function.map(|f| f.as_str())),
    );
    properties.insert("adres".to_string(), json!(observation.street));
    properties.insert("plaats".to_string(), json!(observation.place));
    properties.insert(
        "projectnaam".to_string(),
        json!(observation.project_name),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
