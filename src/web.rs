use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, ApiState};
use crate::config::FireFightConfig;
use crate::geocoding::NominatimGeocoder;
use crate::geolocation::{DeviceLocator, FixedLocator};
use crate::location_resolver::LocationResolver;
use crate::pages::{self, Route, location::LocationPageState};
use crate::risk_client::RiskClient;
use crate::sensor::{HttpSensorSource, SensorFeed, SensorPoller};
use crate::weather::OpenMeteoClient;

/// Shared state of the page handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LocationResolver>,
    pub risk: Arc<RiskClient>,
    pub sensor: SensorFeed,
    pub refresh_seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub q: Option<String>,
    pub device: Option<String>,
}

pub fn router(state: AppState, api: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(Route::Home.path(), get(home))
        .route(Route::Location.path(), get(location))
        .route(Route::FireVulner.path(), get(fire_vulner))
        .route("/health", get(health))
        .with_state(state)
        .nest("/api", api::router(api))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn home() -> Html<String> {
    Html(pages::home::render())
}

async fn location(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Html<String> {
    let mut page = LocationPageState::default();

    if params.device.is_some() {
        pages::location::use_current_location(&mut page, &state.resolver, &state.risk).await;
    } else if let Some(query) = params.q {
        page.query = query;
        pages::location::submit_query(&mut page, &state.resolver, &state.risk).await;
    }

    Html(pages::location::render(&page))
}

async fn fire_vulner(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.sensor.latest().await;
    Html(pages::fire_vulner::render(&snapshot, state.refresh_seconds))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "firefight",
        "version": crate::VERSION
    }))
}

/// Build all collaborators from configuration and serve until ctrl-c
pub async fn run(config: FireFightConfig) -> Result<()> {
    let geocoder = NominatimGeocoder::new(&config.geocoding)?;
    let device = config
        .device
        .as_ref()
        .map(|d| Arc::new(FixedLocator::from(d)) as Arc<dyn DeviceLocator>);
    let resolver = LocationResolver::new(Arc::new(geocoder), device);
    let risk = RiskClient::new(&config)?;
    tracing::info!("Risk backend at {}", risk.endpoint());
    let weather = OpenMeteoClient::new(&config.weather)?;

    let source = HttpSensorSource::new(&config.sensor)?;
    let mut poller = SensorPoller::start(Arc::new(source), config.sensor.poll_interval());
    tracing::info!(
        "Polling sensor at {} every {}s",
        config.sensor.url,
        config.sensor.poll_interval_seconds
    );

    let state = AppState {
        resolver: Arc::new(resolver),
        risk: Arc::new(risk),
        sensor: poller.feed(),
        refresh_seconds: config.sensor.poll_interval_seconds,
    };
    let app = router(state, ApiState::new(weather));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    poller.stop().await;
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
