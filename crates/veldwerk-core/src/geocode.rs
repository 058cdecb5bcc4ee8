//! Reverse-geocoding support: the backend trait, the on-disk address
//! cache and address-string parsing.
//!
//! The HTTP client itself lives in the binary; the core only sees
//! [`ReverseGeocoder`], keeping network I/O out of the computation path.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve a coordinate to an address string, `None` when the service
    /// has no result for it.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError>;
}

/// File-backed address cache keyed by `"lat,lon"`, so repeat runs skip
/// the slow requests.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    path: Option<PathBuf>,
    entries: HashMap<String, String>,
}

impl GeocodeCache {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A missing or unreadable cache file starts an empty cache rather
    /// than failing the run.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "ignoring unreadable geocode cache");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn key(latitude: f64, longitude: f64) -> String {
        format!("{latitude},{longitude}")
    }

    pub fn get(&self, latitude: f64, longitude: f64) -> Option<&str> {
        self.entries
            .get(&Self::key(latitude, longitude))
            .map(String::as_str)
    }

    pub fn insert(&mut self, latitude: f64, longitude: f64, address: String) {
        self.entries.insert(Self::key(latitude, longitude), address);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<(), GeocodeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Cache-first lookup. A failed request is logged and degrades to no
/// address so one bad coordinate never aborts the batch.
pub async fn resolve(
    geocoder: &dyn ReverseGeocoder,
    cache: &mut GeocodeCache,
    latitude: f64,
    longitude: f64,
) -> Option<String> {
    if let Some(cached) = cache.get(latitude, longitude) {
        return Some(cached.to_string());
    }
    match geocoder.reverse(latitude, longitude).await {
        Ok(Some(address)) => {
            cache.insert(latitude, longitude, address.clone());
            Some(address)
        }
        Ok(None) => None,
        Err(err) => {
            warn!(latitude, longitude, error = %err, "reverse geocoding failed");
            None
        }
    }
}

/// Split a geocoded address into `(street with house number, place)`.
///
/// Geocoders return comma-separated components, house number first. The
/// place sits five components from the end in full results (ahead of
/// municipality, province, postcode, country) and falls back to the last
/// component in short ones.
pub fn parse_address(address: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(address) = address else {
        return (None, None);
    };
    let parts: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return (None, None);
    }

    let number = parts.first().copied();
    let street = parts.get(1).copied();
    let place = if parts.len() >= 5 {
        parts.get(parts.len() - 5).copied()
    } else {
        parts.last().copied()
    };

    let combined = match (street, number) {
        (Some(street), Some(number)) => Some(format!("{street} {number}")),
        _ => None,
    };
    (combined, place.map(|p| p.to_string()))
}
