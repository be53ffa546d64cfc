//! Free-text geocoding
//!
//! Turns a place name into coordinate candidates using a Nominatim-compatible
//! search API (`/search?format=json&q=...`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::Coordinates;
use crate::{FireFightError, Result};

/// One search hit, in provider order
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeocodingCandidate {
    /// Latitude as sent by the provider (a decimal string)
    pub lat: String,
    /// Longitude as sent by the provider (a decimal string)
    pub lon: String,
    /// Human-readable name, when the provider sends one
    #[serde(default)]
    pub display_name: Option<String>,
}

impl GeocodingCandidate {
    pub fn coordinates(&self) -> Result<Coordinates> {
        let lat = self.lat.trim().parse::<f64>().map_err(|_| {
            FireFightError::transport(format!("Invalid latitude in geocoding result: {}", self.lat))
        })?;
        let lng = self.lon.trim().parse::<f64>().map_err(|_| {
            FireFightError::transport(format!("Invalid longitude in geocoding result: {}", self.lon))
        })?;
        Ok(Coordinates::new(lat, lng))
    }
}

/// Place-name search capability
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return every candidate for `query`, in provider order
    async fn search(&self, query: &str) -> Result<Vec<GeocodingCandidate>>;
}

/// Nominatim (OpenStreetMap) search client
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FireFightError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?format=json&q={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self), fields(location = query))]
    async fn search(&self, query: &str) -> Result<Vec<GeocodingCandidate>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = self.search_url(query);
        debug!("Geocoding request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Geocoding request failed: {}", e);
            FireFightError::transport(format!("Geocoding request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding provider answered HTTP {}", status);
            return Err(FireFightError::backend(
                status.as_u16(),
                format!(
                    "Geocoding request failed: {}",
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        let candidates: Vec<GeocodingCandidate> = response.json().await.map_err(|e| {
            warn!("Failed to parse geocoding response for '{}': {}", query, e);
            FireFightError::backend(status.as_u16(), format!("Invalid geocoding response: {e}"))
        })?;

        if candidates.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                candidates.len(),
                query,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(candidates)
    }
}
