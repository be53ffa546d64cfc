//! Location lookup page
//!
//! The user either types a place name or asks for the device position. Once
//! coordinates are known they are sent to the risk backend and the resulting
//! assessment and weather figures are shown next to them.

use tracing::debug;

use super::{Route, escape_html, layout};
use crate::FireFightError;
use crate::location_resolver::LocationResolver;
use crate::models::Coordinates;
use crate::risk::{RiskAssessment, display_level};
use crate::risk_client::{RiskClient, WeatherData};

/// Per-request page state, filled in by the handlers below
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPageState {
    pub query: String,
    pub coordinates: Option<Coordinates>,
    pub assessment: Option<RiskAssessment>,
    pub weather: Option<WeatherData>,
    pub error: Option<String>,
}

/// Geocode the typed query, then fetch the risk for the first match.
pub async fn submit_query(
    state: &mut LocationPageState,
    resolver: &LocationResolver,
    risk: &RiskClient,
) {
    match resolver.resolve_by_name(&state.query).await {
        Ok(coordinates) => {
            state.coordinates = Some(coordinates);
            state.error = None;
            send_coordinates(state, risk, coordinates).await;
        }
        Err(err) => {
            debug!("Location lookup failed: {}", err);
            state.error = Some(geocoding_message(&err));
        }
    }
}

/// Use the device position, then fetch the risk for it.
pub async fn use_current_location(
    state: &mut LocationPageState,
    resolver: &LocationResolver,
    risk: &RiskClient,
) {
    if !resolver.supports_device() {
        state.error = Some(FireFightError::Unsupported.user_message());
        return;
    }

    match resolver.resolve_by_device().await {
        Ok(coordinates) => {
            state.coordinates = Some(coordinates);
            state.error = None;
            send_coordinates(state, risk, coordinates).await;
        }
        Err(err) => {
            debug!("Device location failed: {}", err);
            state.error = Some(err.user_message());
        }
    }
}

async fn send_coordinates(state: &mut LocationPageState, risk: &RiskClient, coordinates: Coordinates) {
    match risk.fetch(&coordinates).await {
        Ok(found) => {
            state.assessment = Some(found.assessment);
            state.weather = Some(found.weather);
            state.error = None;
        }
        Err(err) => state.error = Some(backend_message(&err)),
    }
}

fn geocoding_message(err: &FireFightError) -> String {
    match err {
        FireFightError::Transport { .. } | FireFightError::Backend { .. } => {
            "Failed to fetch location data.".to_string()
        }
        other => other.user_message(),
    }
}

fn backend_message(err: &FireFightError) -> String {
    match err {
        FireFightError::Transport { .. } => "Failed to connect to the backend.".to_string(),
        other => other.user_message(),
    }
}

#[must_use]
pub fn render(state: &LocationPageState) -> String {
    let mut body = String::new();

    body.push_str("<h1>Input Location</h1>\n");
    body.push_str(&format!(
        "<form method=\"get\" action=\"{path}\">\n\
         <label for=\"q\">Enter Location:</label>\n\
         <input type=\"text\" id=\"q\" name=\"q\" value=\"{query}\" placeholder=\"e.g., New York, NY\">\n\
         <button type=\"submit\">Convert to Coordinates</button>\n\
         </form>\n\
         <p>OR</p>\n\
         <form method=\"get\" action=\"{path}\">\n\
         <input type=\"hidden\" name=\"device\" value=\"1\">\n\
         <button type=\"submit\">Find Current Location</button>\n\
         </form>\n",
        path = Route::Location.path(),
        query = escape_html(&state.query),
    ));

    if let Some(coordinates) = &state.coordinates {
        body.push_str(&format!(
            "<section id=\"coordinates\">\n<h2>Coordinates:</h2>\n\
             <p>Latitude: {}</p>\n<p>Longitude: {}</p>\n</section>\n",
            coordinates.lat, coordinates.lng
        ));
    }

    if let Some(assessment) = &state.assessment {
        body.push_str(&format!(
            "<section id=\"risk\">\n<h2>Fire Risk:</h2>\n<ul>\n\
             <li>Rainfall: {}</li>\n<li>Wind: {}</li>\n<li>Temperature: {}</li>\n\
             <li><strong>Overall: {}</strong></li>\n</ul>\n</section>\n",
            escape_html(&display_level(assessment.rainfall_risk())),
            escape_html(&display_level(assessment.wind_risk())),
            escape_html(&display_level(assessment.temperature_risk())),
            assessment.overall_risk(),
        ));
    }

    if let Some(weather) = &state.weather {
        render_weather(&mut body, weather);
    }

    if let Some(error) = &state.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    layout(Route::Location, None, &body)
}

fn render_weather(body: &mut String, weather: &WeatherData) {
    body.push_str("<section id=\"weather\">\n<h2>Weather Data:</h2>\n<ul>\n");

    if let (Some(start), Some(end)) = (&weather.start_date, &weather.end_date) {
        body.push_str(&format!(
            "<li>Period: {} to {}</li>\n",
            escape_html(start),
            escape_html(end)
        ));
    }
    match weather.wind_speed {
        Some(speed) => body.push_str(&format!("<li>Wind Speed: {speed} km/h</li>\n")),
        None => body.push_str("<li>Wind Speed: not available</li>\n"),
    }
    match weather.temperature {
        Some(temperature) => body.push_str(&format!("<li>Temperature: {temperature}°C</li>\n")),
        None => body.push_str("<li>Temperature: not available</li>\n"),
    }
    if !weather.rainfall_data.is_empty() {
        let days: Vec<String> = weather.rainfall_data.iter().map(f64::to_string).collect();
        body.push_str(&format!("<li>Rainfall (mm/day): {}</li>\n", days.join(", ")));
    }

    body.push_str("</ul>\n</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::FixedLocator;
    use crate::location_resolver::tests::{FailingGeocoder, RefusingLocator, StaticGeocoder};
    use crate::risk::RiskLevel;
    use httpmock::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    async fn risk_backend(server: &MockServer) -> RiskClient {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/coordinates");
                then.status(200).json_body(json!({
                    "fire_risk": "Extreme Risk",
                    "wind_risk": "Extreme Risk",
                    "temperature_risk": "Low Risk"
                }));
            })
            .await;
        RiskClient::with_endpoint(server.url("/api/coordinates")).unwrap()
    }

    #[tokio::test]
    async fn test_submit_query_resolves_then_fetches_risk() {
        let server = MockServer::start_async().await;
        let risk = risk_backend(&server).await;
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::with(&[("34.05", "-118.24")])),
            None,
        );

        let mut state = LocationPageState {
            query: "Los Angeles".to_string(),
            ..Default::default()
        };
        submit_query(&mut state, &resolver, &risk).await;

        assert_eq!(state.coordinates, Some(Coordinates::new(34.05, -118.24)));
        let assessment = state.assessment.as_ref().unwrap();
        assert_eq!(assessment.overall_risk(), RiskLevel::High);
        assert!(state.error.is_none());

        let page = render(&state);
        assert!(page.contains("Latitude: 34.05"));
        assert!(page.contains("Overall: high risk"));
    }

    #[tokio::test]
    async fn test_empty_query_shows_prompt_without_lookup() {
        let geocoder = Arc::new(StaticGeocoder::with(&[("1", "1")]));
        let resolver = LocationResolver::new(geocoder.clone(), None);
        let risk = RiskClient::with_endpoint("http://127.0.0.1:1/api/coordinates").unwrap();

        let mut state = LocationPageState::default();
        submit_query(&mut state, &resolver, &risk).await;

        assert_eq!(state.error.as_deref(), Some("Please enter a location."));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert!(state.coordinates.is_none());
    }

    #[tokio::test]
    async fn test_unknown_place() {
        let resolver = LocationResolver::new(Arc::new(StaticGeocoder::default()), None);
        let risk = RiskClient::with_endpoint("http://127.0.0.1:1/api/coordinates").unwrap();

        let mut state = LocationPageState {
            query: "Atlantis".to_string(),
            ..Default::default()
        };
        submit_query(&mut state, &resolver, &risk).await;

        assert_eq!(state.error.as_deref(), Some("Location not found."));
    }

    #[rstest]
    #[case(FailingGeocoder::Unreachable)]
    #[case(FailingGeocoder::Unavailable)]
    #[tokio::test]
    async fn test_geocoding_failure_message(#[case] geocoder: FailingGeocoder) {
        let resolver = LocationResolver::new(Arc::new(geocoder), None);
        let risk = RiskClient::with_endpoint("http://127.0.0.1:1/api/coordinates").unwrap();

        let mut state = LocationPageState {
            query: "Canberra".to_string(),
            ..Default::default()
        };
        submit_query(&mut state, &resolver, &risk).await;

        assert_eq!(state.error.as_deref(), Some("Failed to fetch location data."));
        assert!(state.coordinates.is_none());
        assert!(render(&state).contains("Failed to fetch location data."));
    }

    #[tokio::test]
    async fn test_weather_data_is_shown() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/coordinates");
                then.status(200).json_body(json!({
                    "fire_risk": "High Risk",
                    "wind_risk": "Extreme Risk",
                    "temperature_risk": "Moderate Risk",
                    "rainfall_data": [0.0, 1.5, 0.2],
                    "wind_speed": 42.5,
                    "temperature": 33.3,
                    "start_date": "2024-11-11",
                    "end_date": "2025-01-10"
                }));
            })
            .await;
        let risk = RiskClient::with_endpoint(server.url("/api/coordinates")).unwrap();
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::with(&[("-35.28", "149.13")])),
            None,
        );

        let mut state = LocationPageState {
            query: "Canberra".to_string(),
            ..Default::default()
        };
        submit_query(&mut state, &resolver, &risk).await;
        let page = render(&state);

        assert!(page.contains("Weather Data:"));
        assert!(page.contains("Wind Speed: 42.5 km/h"));
        assert!(page.contains("Temperature: 33.3°C"));
        assert!(page.contains("Period: 2024-11-11 to 2025-01-10"));
        assert!(page.contains("Rainfall (mm/day): 0, 1.5, 0.2"));
    }

    #[test]
    fn test_weather_section_without_figures() {
        let state = LocationPageState {
            weather: Some(WeatherData::default()),
            ..Default::default()
        };
        let page = render(&state);
        assert!(page.contains("Wind Speed: not available"));
        assert!(page.contains("Temperature: not available"));
        assert!(!page.contains("Period:"));
        assert!(!page.contains("Rainfall"));
    }

    #[tokio::test]
    async fn test_backend_unreachable_keeps_coordinates() {
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::with(&[("10.0", "20.0")])),
            None,
        );
        let risk = RiskClient::with_endpoint("http://127.0.0.1:1/api/coordinates").unwrap();

        let mut state = LocationPageState {
            query: "Somewhere".to_string(),
            ..Default::default()
        };
        submit_query(&mut state, &resolver, &risk).await;

        assert_eq!(state.coordinates, Some(Coordinates::new(10.0, 20.0)));
        assert!(state.assessment.is_none());
        assert_eq!(state.error.as_deref(), Some("Failed to connect to the backend."));
    }

    #[tokio::test]
    async fn test_backend_error_message_is_shown() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/coordinates");
                then.status(500).json_body(json!({"error": "No rainfall data available"}));
            })
            .await;
        let risk = RiskClient::with_endpoint(server.url("/api/coordinates")).unwrap();
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::default()),
            Some(Arc::new(FixedLocator::new(1.0, 2.0))),
        );

        let mut state = LocationPageState::default();
        use_current_location(&mut state, &resolver, &risk).await;

        assert_eq!(
            state.error.as_deref(),
            Some("Backend error: No rainfall data available")
        );
    }

    #[tokio::test]
    async fn test_device_paths() {
        let server = MockServer::start_async().await;
        let risk = risk_backend(&server).await;

        let unsupported = LocationResolver::new(Arc::new(StaticGeocoder::default()), None);
        let mut state = LocationPageState::default();
        use_current_location(&mut state, &unsupported, &risk).await;
        assert_eq!(
            state.error.as_deref(),
            Some("Geolocation is not supported by your browser.")
        );

        let refusing = LocationResolver::new(
            Arc::new(StaticGeocoder::default()),
            Some(Arc::new(RefusingLocator)),
        );
        let mut state = LocationPageState::default();
        use_current_location(&mut state, &refusing, &risk).await;
        assert_eq!(state.error.as_deref(), Some("Unable to retrieve your location."));

        let fixed = LocationResolver::new(
            Arc::new(StaticGeocoder::default()),
            Some(Arc::new(FixedLocator::new(-33.87, 151.21))),
        );
        let mut state = LocationPageState::default();
        use_current_location(&mut state, &fixed, &risk).await;
        assert_eq!(state.coordinates, Some(Coordinates::new(-33.87, 151.21)));
        assert!(state.assessment.is_some());
    }

    #[test]
    fn test_render_escapes_query_and_error() {
        let state = LocationPageState {
            query: "<b>x</b>".to_string(),
            error: Some("Backend error: <oops>".to_string()),
            ..Default::default()
        };
        let page = render(&state);
        assert!(page.contains("value=\"&lt;b&gt;x&lt;/b&gt;\""));
        assert!(page.contains("Backend error: &lt;oops&gt;"));
        assert!(!page.contains("<oops>"));
    }
}
