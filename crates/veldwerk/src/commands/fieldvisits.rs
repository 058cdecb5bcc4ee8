use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Table;
use tracing::info;

use veldwerk_core::config::PipelineConfig;
use veldwerk_core::fieldvisits::{enrich_visits, VisitRecord};
use veldwerk_core::outputs::write_adjustments_csv;
use veldwerk_core::types::{ReviewFlag, RowRemoval};
use veldwerk_parser::{load_fieldvisits, load_observations, load_projects};

use super::resolve_export;

#[derive(Args, Debug)]
pub struct FieldvisitsArgs {
    /// Observations export, or a directory to search for the newest one.
    #[arg(long)]
    observations: PathBuf,
    /// Field-visit export, or a directory to search.
    #[arg(long)]
    fieldvisits: PathBuf,
    /// Projects export, or a directory to search.
    #[arg(long)]
    projects: PathBuf,
    /// Overrides the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

pub fn handle_fieldvisits(args: FieldvisitsArgs, config: &PipelineConfig) -> Result<()> {
    let observations_path = resolve_export(&args.observations, "waarnemingen_export_*.csv")?;
    let fieldvisits_path = resolve_export(&args.fieldvisits, "veldbezoeken_export_*.csv")?;
    let projects_path = resolve_export(&args.projects, "projecten_export_*.csv")?;

    info!(
        observations = %observations_path.display(),
        fieldvisits = %fieldvisits_path.display(),
        projects = %projects_path.display(),
        "loading exports"
    );

    let observations =
        load_observations(&observations_path).context("loading observations export")?;
    let visits = load_fieldvisits(&fieldvisits_path).context("loading field-visit export")?;
    let projects = load_projects(&projects_path).context("loading projects export")?;

    let records = enrich_visits(
        config.timezone,
        &config.remove_patterns,
        &visits,
        &observations,
        &projects,
    )?;

    let out_dir = args.out_dir.as_deref().unwrap_or(&config.output_dir);
    let out_path = out_dir.join("veldbezoeken_export_aanpassingenMETA.csv");
    write_adjustments_csv(&out_path, &records)?;

    print_summary(&records);
    println!("Adjustments written to {}", out_path.display());
    Ok(())
}

fn print_summary(records: &[VisitRecord]) {
    let with_code = records.iter().filter(|r| r.protocol.is_some()).count();
    let with_sun = records
        .iter()
        .filter(|r| r.sunrise().is_some() && r.sunset().is_some())
        .count();
    let flagged = records
        .iter()
        .filter(|r| r.review == ReviewFlag::Yes)
        .count();
    let removed = records
        .iter()
        .filter(|r| r.removal == RowRemoval::Remove)
        .count();

    let mut table = Table::new();
    table.set_header(vec!["", "count"]);
    table.add_row(vec!["visits".to_string(), records.len().to_string()]);
    table.add_row(vec!["protocol recognized".to_string(), with_code.to_string()]);
    table.add_row(vec!["sun times derived".to_string(), with_sun.to_string()]);
    table.add_row(vec!["flagged for review".to_string(), flagged.to_string()]);
    table.add_row(vec!["marked for removal".to_string(), removed.to_string()]);
    println!("{table}");
}
