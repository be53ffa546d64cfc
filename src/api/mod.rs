use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::{FireFightError, hazard, models::Coordinates, weather::OpenMeteoClient};

/// Days of rainfall history considered for the dry-day streak
pub const HISTORY_DAYS: i64 = 60;

#[derive(Clone)]
pub struct ApiState {
    weather: Arc<OpenMeteoClient>,
}

impl ApiState {
    pub fn new(weather: OpenMeteoClient) -> Self {
        Self {
            weather: Arc::new(weather),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl CoordinatesRequest {
    /// Validate a decoded JSON body. An empty body (`null`, `{}`, `[]`, `""`,
    /// `0` or `false`) carries no data; anything else must hold both coordinates.
    pub fn from_payload(payload: &Value) -> Result<Coordinates, ApiError> {
        if is_blank(payload) {
            return Err(ApiError::bad_request("No data provided"));
        }

        let request = CoordinatesRequest::deserialize(payload).map_err(|e| {
            debug!("Unusable coordinates payload: {}", e);
            ApiError::bad_request("Invalid coordinates")
        })?;
        request.coordinates()
    }

    fn coordinates(&self) -> Result<Coordinates, ApiError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Coordinates::validated(lat, lng)
                .map_err(|_| ApiError::bad_request("Invalid coordinates")),
            _ => Err(ApiError::bad_request("Invalid coordinates")),
        }
    }
}

fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RiskReport {
    pub fire_risk: String,
    pub wind_risk: String,
    pub temperature_risk: String,
    pub rainfall_data: Vec<f64>,
    pub wind_speed: Option<f64>,
    pub temperature: Option<f64>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<FireFightError> for ApiError {
    fn from(err: FireFightError) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/coordinates", post(handle_coordinates))
        .with_state(state)
}

async fn handle_coordinates(
    State(state): State<ApiState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RiskReport>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!("Rejected coordinates body: {}", rejection);
        ApiError::bad_request("No data provided")
    })?;

    let coordinates = CoordinatesRequest::from_payload(&payload)?;
    let report = assess(&state.weather, &coordinates, Utc::now().date_naive()).await?;
    Ok(Json(report))
}

/// Grade fire, wind and temperature risk for a location as of `today`
#[instrument(skip(weather))]
pub async fn assess(
    weather: &OpenMeteoClient,
    coordinates: &Coordinates,
    today: NaiveDate,
) -> Result<RiskReport, ApiError> {
    let start = today - Duration::days(HISTORY_DAYS);

    let rainfall = weather.daily_rainfall(coordinates, start, today).await?;
    if rainfall.is_empty() {
        warn!("No rainfall data for {}", coordinates.format_coordinates());
        return Err(ApiError::internal("No rainfall data available"));
    }

    let current = weather.current_conditions(coordinates).await?;

    let report = RiskReport {
        fire_risk: hazard::classify_fire_risk(&rainfall).label().to_string(),
        wind_risk: hazard::wind_label(current.wind_speed_kmh),
        temperature_risk: hazard::temperature_label(current.temperature),
        rainfall_data: rainfall,
        wind_speed: current.wind_speed_kmh,
        temperature: current.temperature,
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: today.format("%Y-%m-%d").to_string(),
    };

    info!(
        fire = %report.fire_risk,
        wind = %report.wind_risk,
        temperature = %report.temperature_risk,
        "Assessed {}",
        coordinates.format_coordinates()
    );
    Ok(report)
}
