use std::io::Read;
use std::path::Path;

use crate::errors::ExportError;
use crate::model::ObservationRow;

use super::common::{clean_optional, csv_error, export_reader, open_export, HeaderMap};

const TABLE: &str = "observations";

const VISIT_ID: &[&str] = &["Veldbezoek ID"];
const PROJECT_ID: &[&str] = &["Project ID"];
const COORDINATES: &[&str] = &["Coördinaten", "Coordinaten"];
const SPECIES: &[&str] = &["Soort"];
const COUNT: &[&str] = &["Aantal"];
const BEHAVIOUR: &[&str] = &["Gedrag"];
const SEEN_AT: &[&str] = &["Gezien op"];
const LATITUDE: &[&str] = &["Breedtegraad"];
const LONGITUDE: &[&str] = &["Lengtegraad"];
const REMARK: &[&str] = &["Opmerking"];
const SEX: &[&str] = &["Sekse"];
const ROOST: &[&str] = &["Verblijfplaats"];

pub fn read_observations<R: Read>(input: R) -> Result<Vec<ObservationRow>, ExportError> {
    parse(export_reader(input))
}

pub fn load_observations(path: &Path) -> Result<Vec<ObservationRow>, ExportError> {
    parse(open_export(path)?)
}

fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<ObservationRow>, ExportError> {
    let headers = reader.headers().map_err(csv_error(TABLE))?.clone();
    let map = HeaderMap::new(TABLE, &headers);

    let visit_id = map.required(VISIT_ID)?;
    let project_id = map.required(PROJECT_ID)?;
    let coordinates = map.optional(COORDINATES);
    let species = map.optional(SPECIES);
    let count = map.optional(COUNT);
    let behaviour = map.optional(BEHAVIOUR);
    let seen_at = map.optional(SEEN_AT);
    let latitude = map.optional(LATITUDE);
    let longitude = map.optional(LONGITUDE);
    let remark = map.optional(REMARK);
    let sex = map.optional(SEX);
    let roost = map.optional(ROOST);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error(TABLE))?;
        rows.push(ObservationRow {
            visit_id: clean_optional(&record, Some(visit_id)),
            project_id: clean_optional(&record, Some(project_id)),
            coordinates: clean_optional(&record, coordinates),
            species: clean_optional(&record, species),
            count: clean_optional(&record, count),
            behaviour: clean_optional(&record, behaviour),
            seen_at: clean_optional(&record, seen_at),
            latitude: clean_optional(&record, latitude),
            longitude: clean_optional(&record, longitude),
            remark: clean_optional(&record, remark),
            sex: clean_optional(&record, sex),
            roost: clean_optional(&record, roost),
        });
    }

    if rows.is_empty() {
        return Err(ExportError::EmptyTable { table: TABLE });
    }
    Ok(rows)
}
