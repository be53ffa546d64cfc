//! `OpenMeteo` API response structures

use serde::Deserialize;

/// Response of the archive endpoint with `daily=rain_sum`
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub rain_sum: Option<Vec<Option<f64>>>,
}

impl ArchiveResponse {
    /// Daily rain sums with missing days as 0.0
    #[must_use]
    pub fn rain_sum(self) -> Vec<f64> {
        self.daily
            .and_then(|daily| daily.rain_sum)
            .unwrap_or_default()
            .into_iter()
            .map(|rain| rain.unwrap_or(0.0))
            .collect()
    }
}

/// Response of the forecast endpoint with `current_weather=true`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Wind speed in km/h
    pub windspeed: Option<f64>,
}
