use std::io::Read;
use std::path::Path;

use crate::errors::ExportError;
use crate::model::ProjectRow;

use super::common::{clean_optional, csv_error, export_reader, open_export, HeaderMap};

const TABLE: &str = "projects";

const ID: &[&str] = &["ID"];
const NAME: &[&str] = &["Naam"];
const CITY: &[&str] = &["Stad"];

pub fn read_projects<R: Read>(input: R) -> Result<Vec<ProjectRow>, ExportError> {
    parse(export_reader(input))
}

pub fn load_projects(path: &Path) -> Result<Vec<ProjectRow>, ExportError> {
    parse(open_export(path)?)
}

fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<ProjectRow>, ExportError> {
    let headers = reader.headers().map_err(csv_error(TABLE))?.clone();
    let map = HeaderMap::new(TABLE, &headers);

    let id = map.required(ID)?;
    let name = map.required(NAME)?;
    let city = map.required(CITY)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error(TABLE))?;
        rows.push(ProjectRow {
            id: clean_optional(&record, Some(id)),
            name: clean_optional(&record, Some(name)),
            city: clean_optional(&record, Some(city)),
        });
    }

    if rows.is_empty() {
        return Err(ExportError::EmptyTable { table: TABLE });
    }
    Ok(rows)
}
