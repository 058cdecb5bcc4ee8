use crate::errors::ExportError;
use crate::tables::{read_fieldvisits, read_observations, read_projects};

#[test]
fn reads_observations_with_suffixed_id_columns() {
    let content = "\
Soort;Aantal;Gedrag;Gezien op;Coördinaten;Veldbezoek ID...23;Project ID...24
Gewone dwergvleermuis;2;foeragerend;2025-06-12 22:15:00;52.0907, 5.1214;101;7
Huismus; ;ter plaatse;2025-06-13 06:40:00;;102;7
";
    let rows = read_observations(content.as_bytes()).expect("observations parse failed");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].visit_id.as_deref(), Some("101"));
    assert_eq!(rows[0].project_id.as_deref(), Some("7"));
    assert_eq!(rows[0].coordinates.as_deref(), Some("52.0907, 5.1214"));
    assert_eq!(rows[0].species.as_deref(), Some("Gewone dwergvleermuis"));

    // blank cells become None
    assert_eq!(rows[1].count, None);
    assert_eq!(rows[1].coordinates, None);
}

#[test]
fn reads_observations_with_plain_id_columns() {
    let content = "\
Veldbezoek ID;Project ID;Soort
101;7;Laatvlieger
";
    let rows = read_observations(content.as_bytes()).expect("observations parse failed");
    assert_eq!(rows[0].visit_id.as_deref(), Some("101"));
    assert_eq!(rows[0].species.as_deref(), Some("Laatvlieger"));
}

#[test]
fn missing_visit_id_column_is_an_error() {
    let content = "Soort;Project ID\nHuismus;7\n";
    let err = read_observations(content.as_bytes()).unwrap_err();
    match err {
        ExportError::MissingColumn { table, candidates } => {
            assert_eq!(table, "observations");
            assert!(candidates.contains(&"Veldbezoek ID"));
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn empty_observations_table_is_an_error() {
    let content = "Veldbezoek ID;Project ID\n";
    let err = read_observations(content.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::EmptyTable {
            table: "observations"
        }
    ));
}

#[test]
fn reads_fieldvisits() {
    let content = "\
ID;project_id;Project Naam;Naam;Startdatum;Einddatum;Duur (uren)
101;7;Kerkstraat 12;VM01 avond 1;2025-06-12 21:45:00;2025-06-13 01:00:00;3.25
102;7;Kerkstraat 12;GZ ochtend;2025-06-13 04:30:00;;
";
    let rows = read_fieldvisits(content.as_bytes()).expect("fieldvisits parse failed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id.as_deref(), Some("101"));
    assert_eq!(rows[0].name.as_deref(), Some("VM01 avond 1"));
    assert_eq!(rows[0].duration_hours.as_deref(), Some("3.25"));
    assert_eq!(rows[1].end, None);
}

#[test]
fn fieldvisit_id_column_does_not_match_project_id() {
    // "ID" must resolve to the bare column even when "Project ID" is present
    let content = "\
Project ID;ID;project_id;Naam;Startdatum
99;101;7;ZR;2025-06-12
";
    let rows = read_fieldvisits(content.as_bytes()).expect("fieldvisits parse failed");
    assert_eq!(rows[0].id.as_deref(), Some("101"));
    assert_eq!(rows[0].project_id.as_deref(), Some("7"));
}

#[test]
fn reads_projects() {
    let content = "ID;Naam;Stad\n7;Kerkstraat 12;Utrecht\n";
    let rows = read_projects(content.as_bytes()).expect("projects parse failed");
    assert_eq!(rows[0].id.as_deref(), Some("7"));
    assert_eq!(rows[0].name.as_deref(), Some("Kerkstraat 12"));
    assert_eq!(rows[0].city.as_deref(), Some("Utrecht"));
}

#[test]
fn values_are_trimmed() {
    let content = "ID;Naam;Stad\n 7 ;  Kerkstraat 12 ; Utrecht \n";
    let rows = read_projects(content.as_bytes()).expect("projects parse failed");
    assert_eq!(rows[0].id.as_deref(), Some("7"));
    assert_eq!(rows[0].city.as_deref(), Some("Utrecht"));
}
