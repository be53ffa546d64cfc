//! Coordinates model for geographic positions

use serde::{Deserialize, Serialize};

use crate::FireFightError;

/// Latitude/longitude pair as exchanged with the risk backend
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create coordinates after checking they lie on the globe
    pub fn validated(lat: f64, lng: f64) -> crate::Result<Self> {
        let coordinates = Self::new(lat, lng);
        coordinates.validate()?;
        Ok(coordinates)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(FireFightError::validation(format!(
                "Latitude must be between -90 and 90, got: {}",
                self.lat
            )));
        }

        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(FireFightError::validation(format!(
                "Longitude must be between -180 and 180, got: {}",
                self.lng
            )));
        }

        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_accepts_bounds() {
        assert!(Coordinates::validated(90.0, -180.0).is_ok());
        assert!(Coordinates::validated(-90.0, 180.0).is_ok());
        assert!(Coordinates::validated(34.0522, -118.2437).is_ok());
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert!(matches!(
            Coordinates::validated(91.0, 0.0),
            Err(FireFightError::Validation { .. })
        ));
        assert!(Coordinates::validated(0.0, -180.5).is_err());
        assert!(Coordinates::validated(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_format_coordinates() {
        let coordinates = Coordinates::new(34.052_235, -118.243_683);
        assert_eq!(coordinates.format_coordinates(), "34.0522, -118.2437");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(Coordinates::new(1.5, -2.25)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 1.5, "lng": -2.25}));
    }
}
