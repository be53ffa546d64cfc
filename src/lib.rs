//! `FireFight` - fire vulnerability checker
//!
//! This library resolves a place name or device position into coordinates,
//! asks a risk backend for the fire, wind and temperature risk there, combines
//! them into one overall level, and polls a field sensor for live readings.
//! It also contains the risk backend itself and the pages that tie it together.

pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod geolocation;
pub mod hazard;
pub mod location_resolver;
pub mod models;
pub mod pages;
pub mod risk;
pub mod risk_client;
pub mod sensor;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::FireFightConfig;
pub use error::FireFightError;
pub use geocoding::{Geocoder, GeocodingCandidate, NominatimGeocoder};
pub use geolocation::{DeviceLocator, FixedLocator, Position};
pub use location_resolver::{LocationInput, LocationResolver};
pub use models::Coordinates;
pub use risk::{RiskAssessment, RiskLevel, aggregate};
pub use risk_client::{LocationRisk, RiskClient, WeatherData};
pub use sensor::{HttpSensorSource, PollerState, SensorFeed, SensorPoller, SensorReading, SensorSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FireFightError>;
