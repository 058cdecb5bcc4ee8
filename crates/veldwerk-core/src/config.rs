//! Run configuration.
//!
//! The civil timezone lives here and is passed explicitly into every
//! computation; nothing in the pipeline reads it from a global.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Civil timezone all wall-clock comparisons happen in.
    pub timezone: Tz,
    /// Visit-name fragments that mark a row for removal.
    pub remove_patterns: Vec<String>,
    pub output_dir: PathBuf,
    pub geocode: GeocodeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Amsterdam,
            remove_patterns: vec!["test".into(), "ongeldig".into(), "tim".into()],
            output_dir: PathBuf::from("Data_Output"),
            geocode: GeocodeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodeConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Minimum delay between uncached requests, per the service's usage
    /// policy.
    pub min_delay_ms: u64,
    pub cache_file: PathBuf,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "veldwerk_geocoder".to_string(),
            min_delay_ms: 1_100,
            cache_file: PathBuf::from("geocode_cache.json"),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| PipelineError::Config(format!("{}: {err}", path.display())))
    }

    /// The config file is optional; absent means defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
