use chrono::NaiveDate;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::Coordinates;
use crate::{FireFightError, Result};

pub mod open_meteo;

/// Conditions at the time of the request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrentConditions {
    /// Wind speed in km/h
    pub wind_speed_kmh: Option<f64>,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
}

/// Open-Meteo client for historical rainfall and current conditions
pub struct OpenMeteoClient {
    client: Client,
    archive_base_url: String,
    forecast_base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("FireFight/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FireFightError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            archive_base_url: config.archive_base_url.trim_end_matches('/').to_string(),
            forecast_base_url: config.forecast_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Daily rainfall sums in mm between `start` and `end` inclusive.
    /// Days without a value count as dry (0.0).
    #[instrument(skip(self), fields(lat = location.lat, lng = location.lng))]
    pub async fn daily_rainfall(
        &self,
        location: &Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<f64>> {
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily=rain_sum",
            self.archive_base_url,
            location.lat,
            location.lng,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        debug!("Open-Meteo archive request URL: {}", url);

        let start_time = Instant::now();
        let response: open_meteo::ArchiveResponse = self.get_json(&url).await?;
        let rainfall = response.rain_sum();

        info!(
            "Retrieved {} days of rainfall in {:.3}s",
            rainfall.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(rainfall)
    }

    /// Current wind speed and temperature
    #[instrument(skip(self), fields(lat = location.lat, lng = location.lng))]
    pub async fn current_conditions(&self, location: &Coordinates) -> Result<CurrentConditions> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true",
            self.forecast_base_url, location.lat, location.lng,
        );
        debug!("Open-Meteo forecast request URL: {}", url);

        let response: open_meteo::ForecastResponse = self.get_json(&url).await?;
        let current = response.current_weather.unwrap_or_default();

        if current.windspeed.is_none() {
            warn!("No current wind speed for {}", location.format_coordinates());
        }

        Ok(CurrentConditions {
            wind_speed_kmh: current.windspeed,
            temperature: current.temperature,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Open-Meteo request failed: {}", e);
            FireFightError::transport(format!("Weather request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Open-Meteo answered HTTP {}", status);
            return Err(FireFightError::backend(
                status.as_u16(),
                format!("Weather API request failed with status: {status}"),
            ));
        }

        response.json().await.map_err(|e| {
            FireFightError::backend(
                status.as_u16(),
                format!("Failed to parse Open-Meteo response: {e}"),
            )
        })
    }
}
