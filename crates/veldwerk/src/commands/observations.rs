use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Table;
use tracing::info;

use veldwerk_core::config::PipelineConfig;
use veldwerk_core::geocode::GeocodeCache;
use veldwerk_core::observations::{
    assign_roost_numbers, attach_addresses, enrich, project_name_map, Observation,
    ROOST_BEHAVIOURS,
};
use veldwerk_core::outputs::{write_cleaned_observations, write_group_geojson};
use veldwerk_parser::{load_fieldvisits, load_observations};

use super::resolve_export;
use crate::geocoder::NominatimGeocoder;

#[derive(Args, Debug)]
pub struct ObservationsArgs {
    /// Observations export, or a directory to search for the newest one.
    #[arg(long)]
    observations: PathBuf,
    /// Field-visit export used to resolve project names.
    #[arg(long)]
    fieldvisits: Option<PathBuf>,
    /// Reverse geocode roost-indicating observations (slow, rate limited).
    #[arg(long)]
    geocode: bool,
    /// Overrides the configured output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

pub async fn handle_observations(args: ObservationsArgs, config: &PipelineConfig) -> Result<()> {
    let observations_path = resolve_export(&args.observations, "waarnemingen_export_*.csv")?;
    let rows = load_observations(&observations_path).context("loading observations export")?;

    let project_names = match &args.fieldvisits {
        Some(path) => {
            let path = resolve_export(path, "veldbezoeken_export_*.csv")?;
            let visits = load_fieldvisits(&path).context("loading field-visit export")?;
            project_name_map(&visits)
        }
        None => HashMap::new(),
    };

    let mut observations = enrich(&rows, &project_names);

    if args.geocode {
        let geocoder = NominatimGeocoder::new(config.geocode.clone());
        let mut cache = GeocodeCache::load(&config.geocode.cache_file);
        info!(cached = cache.len(), "reverse geocoding roost observations");
        attach_addresses(&mut observations, &geocoder, &mut cache, ROOST_BEHAVIOURS).await;
        cache.save().context("saving geocode cache")?;
    }
    assign_roost_numbers(&mut observations);

    let out_dir = args.out_dir.as_deref().unwrap_or(&config.output_dir);
    let tables = write_cleaned_observations(out_dir, &observations)?;
    let collections = write_group_geojson(out_dir, &observations)?;

    print_summary(&observations, tables.len(), collections.len());
    Ok(())
}

fn print_summary(observations: &[Observation], tables: usize, collections: usize) {
    let geocoded = observations.iter().filter(|o| o.address.is_some()).count();
    let with_function = observations.iter().filter(|o| o.function.is_some()).count();

    let mut table = Table::new();
    table.set_header(vec!["", "count"]);
    table.add_row(vec!["observations".to_string(), observations.len().to_string()]);
    table.add_row(vec!["site function derived".to_string(), with_function.to_string()]);
    table.add_row(vec!["geocoded".to_string(), geocoded.to_string()]);
    table.add_row(vec!["project tables written".to_string(), tables.to_string()]);
    table.add_row(vec!["geojson collections written".to_string(), collections.to_string()]);
    println!("{table}");
}
