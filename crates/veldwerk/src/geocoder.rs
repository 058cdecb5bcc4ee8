//! Nominatim-style reverse geocoding client with a minimum delay between
//! requests, per the public service's usage policy.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

use veldwerk_core::config::GeocodeConfig;
use veldwerk_core::geocode::{GeocodeError, ReverseGeocoder};

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocodeConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(config: GeocodeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            last_request: Mutex::new(None),
        }
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let min_delay = Duration::from_millis(self.config.min_delay_ms);
            let elapsed = previous.elapsed();
            if elapsed < min_delay {
                sleep(min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError> {
        self.throttle().await;

        let url = format!("{}/reverse", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Request(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;
        debug!(found = body.display_name.is_some(), "reverse geocode response");
        Ok(body.display_name)
    }
}
