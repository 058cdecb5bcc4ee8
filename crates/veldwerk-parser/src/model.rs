//! Raw rows as they come out of the survey platform's CSV exports.
//!
//! Every value is kept as a trimmed string; empty cells become `None`.
//! Typed interpretation (dates, coordinates, counts) happens downstream so
//! a malformed cell never aborts reading the table.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationRow {
    pub visit_id: Option<String>,
    pub project_id: Option<String>,
    pub coordinates: Option<String>,
    pub species: Option<String>,
    pub count: Option<String>,
    pub behaviour: Option<String>,
    pub seen_at: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub remark: Option<String>,
    pub sex: Option<String>,
    pub roost: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldVisitRow {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration_hours: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
}
