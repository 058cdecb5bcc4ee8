use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod geocoder;

use commands::fieldvisits::{handle_fieldvisits, FieldvisitsArgs};
use commands::observations::{handle_observations, ObservationsArgs};
use veldwerk_core::config::PipelineConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Veldwerk survey-export processing", long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive suggested visit times and review flags from the exports.
    Fieldvisits(FieldvisitsArgs),
    /// Clean and enrich the observations export.
    Observations(ObservationsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Fieldvisits(args) => handle_fieldvisits(args, &config),
        Command::Observations(args) => handle_observations(args, &config).await,
    }
}
