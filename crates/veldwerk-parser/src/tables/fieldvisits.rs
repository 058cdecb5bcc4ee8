use std::io::Read;
use std::path::Path;

use crate::errors::ExportError;
use crate::model::FieldVisitRow;

use super::common::{clean_optional, csv_error, export_reader, open_export, HeaderMap};

const TABLE: &str = "fieldvisits";

const ID: &[&str] = &["ID"];
const PROJECT_ID: &[&str] = &["project_id", "Project ID"];
const PROJECT_NAME: &[&str] = &["Project Naam", "Projectnaam"];
const NAME: &[&str] = &["Naam"];
const START: &[&str] = &["Startdatum"];
const END: &[&str] = &["Einddatum"];
const DURATION: &[&str] = &["Duur (uren)"];

pub fn read_fieldvisits<R: Read>(input: R) -> Result<Vec<FieldVisitRow>, ExportError> {
    parse(export_reader(input))
}

pub fn load_fieldvisits(path: &Path) -> Result<Vec<FieldVisitRow>, ExportError> {
    parse(open_export(path)?)
}

fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<FieldVisitRow>, ExportError> {
    let headers = reader.headers().map_err(csv_error(TABLE))?.clone();
    let map = HeaderMap::new(TABLE, &headers);

    let id = map.required(ID)?;
    let project_id = map.required(PROJECT_ID)?;
    let name = map.required(NAME)?;
    let start = map.required(START)?;
    let project_name = map.optional(PROJECT_NAME);
    let end = map.optional(END);
    let duration = map.optional(DURATION);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error(TABLE))?;
        rows.push(FieldVisitRow {
            id: clean_optional(&record, Some(id)),
            project_id: clean_optional(&record, Some(project_id)),
            project_name: clean_optional(&record, project_name),
            name: clean_optional(&record, Some(name)),
            start: clean_optional(&record, Some(start)),
            end: clean_optional(&record, end),
            duration_hours: clean_optional(&record, duration),
        });
    }

    if rows.is_empty() {
        return Err(ExportError::EmptyTable { table: TABLE });
    }
    Ok(rows)
}
