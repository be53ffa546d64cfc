//! Risk backend client
//!
//! Posts coordinates to the risk backend and turns its answer into a
//! [`RiskAssessment`] with the overall level filled in, plus the weather
//! figures the backend graded.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::config::FireFightConfig;
use crate::models::Coordinates;
use crate::risk::RiskAssessment;
use crate::{FireFightError, Result};

#[derive(Debug, Deserialize)]
struct RiskResponse {
    fire_risk: String,
    wind_risk: String,
    temperature_risk: String,
    #[serde(flatten)]
    weather: WeatherData,
}

/// Weather figures reported next to the risk levels
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherData {
    /// km/h
    pub wind_speed: Option<f64>,
    /// Celsius
    pub temperature: Option<f64>,
    /// Daily rain sums in mm, oldest first
    #[serde(default)]
    pub rainfall_data: Vec<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Everything the backend said about one location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRisk {
    pub assessment: RiskAssessment,
    pub weather: WeatherData,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// HTTP client for `POST /api/coordinates`
#[derive(Clone)]
pub struct RiskClient {
    client: Client,
    endpoint: String,
}

impl RiskClient {
    pub fn new(config: &FireFightConfig) -> Result<Self> {
        Self::with_endpoint(config.backend_url())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("FireFight/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FireFightError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_risk(&self, coordinates: &Coordinates) -> Result<RiskAssessment> {
        self.fetch(coordinates).await.map(|risk| risk.assessment)
    }

    /// Risk levels and weather figures for `coordinates`
    #[instrument(skip(self), fields(lat = coordinates.lat, lng = coordinates.lng))]
    pub async fn fetch(&self, coordinates: &Coordinates) -> Result<LocationRisk> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(coordinates)
            .send()
            .await
            .map_err(|e| {
                error!("Error sending coordinates to backend: {}", e);
                FireFightError::transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Error reading backend response: {}", e);
            FireFightError::transport(e.to_string())
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("Backend answered HTTP {}: {}", status, message);
            return Err(FireFightError::backend(status.as_u16(), message));
        }

        let parsed: RiskResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Malformed backend response: {}", e);
            FireFightError::backend(status.as_u16(), format!("Malformed response: {e}"))
        })?;
        debug!("Backend risk response: {:?}", parsed);

        Ok(LocationRisk {
            assessment: RiskAssessment::new(
                parsed.fire_risk,
                parsed.wind_risk,
                parsed.temperature_risk,
            ),
            weather: parsed.weather,
        })
    }
}
