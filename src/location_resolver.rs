//! Location Resolution Module
//!
//! Resolves what the user asked for (a place name or "where am I") into
//! coordinates that can be sent to the risk backend.

use std::sync::Arc;

use tracing::debug;

use crate::geocoding::Geocoder;
use crate::geolocation::DeviceLocator;
use crate::models::Coordinates;
use crate::{FireFightError, Result};

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Free-text place name
    Name(String),
    /// Position of the current device
    Device,
}

/// Service for resolving location inputs
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    device: Option<Arc<dyn DeviceLocator>>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, device: Option<Arc<dyn DeviceLocator>>) -> Self {
        Self { geocoder, device }
    }

    /// Whether a device position capability is present
    #[must_use]
    pub fn supports_device(&self) -> bool {
        self.device.is_some()
    }

    /// Resolve a location input into coordinates
    pub async fn resolve(&self, input: LocationInput) -> Result<Coordinates> {
        debug!("Resolving location input: {:?}", input);

        let coordinates = match input {
            LocationInput::Name(name) => self.resolve_by_name(&name).await?,
            LocationInput::Device => self.resolve_by_device().await?,
        };

        debug!("Resolved location: {}", coordinates.format_coordinates());
        Ok(coordinates)
    }

    /// Geocode a place name. The first candidate wins; candidates are not
    /// re-ranked by relevance or distance.
    pub async fn resolve_by_name(&self, query: &str) -> Result<Coordinates> {
        if query.trim().is_empty() {
            return Err(FireFightError::validation("Please enter a location."));
        }

        debug!("Geocoding location name: {}", query);
        let candidates = self.geocoder.search(query).await?;

        let Some(first) = candidates.first() else {
            return Err(FireFightError::not_found(query));
        };

        let coordinates = first.coordinates()?;
        debug!(
            "Using first of {} candidates: {}",
            candidates.len(),
            coordinates.format_coordinates()
        );
        Ok(coordinates)
    }

    /// Ask the device for its current position
    pub async fn resolve_by_device(&self) -> Result<Coordinates> {
        let device = self.device.as_ref().ok_or(FireFightError::Unsupported)?;
        let position = device.current_position().await?;
        Ok(position.into())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geocoding::GeocodingCandidate;
    use crate::geolocation::{FixedLocator, Position};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder answering from a fixed list and counting calls
    #[derive(Default)]
    pub(crate) struct StaticGeocoder {
        pub candidates: Vec<GeocodingCandidate>,
        pub calls: AtomicUsize,
    }

    impl StaticGeocoder {
        pub(crate) fn with(points: &[(&str, &str)]) -> Self {
            Self {
                candidates: points
                    .iter()
                    .map(|(lat, lon)| GeocodingCandidate {
                        lat: (*lat).to_string(),
                        lon: (*lon).to_string(),
                        display_name: None,
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<GeocodingCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }
    }

    /// Geocoder whose provider cannot be reached or answers with a failure status
    pub(crate) enum FailingGeocoder {
        Unreachable,
        Unavailable,
    }

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<GeocodingCandidate>> {
            Err(match self {
                FailingGeocoder::Unreachable => FireFightError::transport("connection refused"),
                FailingGeocoder::Unavailable => {
                    FireFightError::backend(503, "Geocoding API request failed")
                }
            })
        }
    }

    pub(crate) struct RefusingLocator;

    #[async_trait]
    impl DeviceLocator for RefusingLocator {
        async fn current_position(&self) -> Result<Position> {
            Err(FireFightError::permission_denied("User denied Geolocation"))
        }
    }

    #[tokio::test]
    async fn test_empty_query_fails_before_network_call() {
        let geocoder = Arc::new(StaticGeocoder::with(&[("1", "2")]));
        let resolver = LocationResolver::new(geocoder.clone(), None);

        for query in ["", "   "] {
            let result = resolver.resolve_by_name(query).await;
            assert!(matches!(result, Err(FireFightError::Validation { .. })));
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let geocoder = Arc::new(StaticGeocoder::with(&[
            ("34.1476452", "-118.1444779"),
            ("29.6910625", "-95.2091006"),
        ]));
        let resolver = LocationResolver::new(geocoder, None);

        let coordinates = resolver
            .resolve(LocationInput::Name("Pasadena".into()))
            .await
            .unwrap();
        assert_eq!(coordinates, Coordinates::new(34.1476452, -118.1444779));
    }

    #[tokio::test]
    async fn test_no_candidates_is_not_found() {
        let resolver = LocationResolver::new(Arc::new(StaticGeocoder::default()), None);
        let result = resolver.resolve_by_name("Atlantis").await;
        assert!(matches!(result, Err(FireFightError::NotFound { query }) if query == "Atlantis"));
    }

    #[tokio::test]
    async fn test_device_without_capability_is_unsupported() {
        let resolver = LocationResolver::new(Arc::new(StaticGeocoder::default()), None);
        assert!(!resolver.supports_device());
        let result = resolver.resolve(LocationInput::Device).await;
        assert!(matches!(result, Err(FireFightError::Unsupported)));
    }

    #[tokio::test]
    async fn test_device_refusal_is_propagated() {
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::default()),
            Some(Arc::new(RefusingLocator)),
        );
        let result = resolver.resolve_by_device().await;
        assert!(matches!(result, Err(FireFightError::PermissionDenied { .. })));
    }

    #[tokio::test]
    async fn test_device_position_is_used() {
        let resolver = LocationResolver::new(
            Arc::new(StaticGeocoder::default()),
            Some(Arc::new(FixedLocator::new(-33.87, 151.21))),
        );
        let coordinates = resolver.resolve_by_device().await.unwrap();
        assert_eq!(coordinates, Coordinates::new(-33.87, 151.21));
    }
}
