//! Hazard classification used by the risk backend
//!
//! Each hazard is graded independently into the shared risk vocabulary:
//! fire risk from the current dry-day streak, wind risk from the current wind
//! speed and temperature risk from the current air temperature.

use std::ops::Range;

use crate::risk::RiskLevel;

/// Daily rainfall below this many mm does not break a dry streak
pub const SIGNIFICANT_RAINFALL_MM: f64 = 2.5;

/// Dry-day streak thresholds, in days
pub mod dry_days {
    use std::ops::{Range, RangeFrom};

    pub const LOW: Range<usize> = 0..7;
    pub const MODERATE: Range<usize> = 7..14;
    pub const HIGH: Range<usize> = 14..60;
    pub const EXTREME: RangeFrom<usize> = 60..;
}

/// Wind speed bands, km/h
pub const WIND_LOW_BELOW_KMH: f64 = 10.0;
pub const WIND_HIGH_UP_TO_KMH: f64 = 30.0;

/// Temperature bands in °C
pub const TEMPERATURE_LOW: Range<f64> = f64::NEG_INFINITY..30.0;
pub const TEMPERATURE_MODERATE: Range<f64> = 30.0..35.0;
pub const TEMPERATURE_HIGH: Range<f64> = 35.0..40.0;

pub const WIND_UNAVAILABLE: &str = "Wind speed data not available";
pub const TEMPERATURE_UNAVAILABLE: &str = "Temperature data not available";

/// Number of trailing consecutive days with rainfall below the significance threshold
#[must_use]
pub fn dry_day_streak(rainfall: &[f64]) -> usize {
    rainfall.iter().fold(0, |streak, &rain| {
        if rain < SIGNIFICANT_RAINFALL_MM {
            streak + 1
        } else {
            0
        }
    })
}

#[must_use]
pub fn classify_fire_risk(rainfall: &[f64]) -> RiskLevel {
    let streak = dry_day_streak(rainfall);

    if dry_days::LOW.contains(&streak) {
        RiskLevel::Low
    } else if dry_days::MODERATE.contains(&streak) {
        RiskLevel::Moderate
    } else if dry_days::HIGH.contains(&streak) {
        RiskLevel::High
    } else {
        RiskLevel::Extreme
    }
}

#[must_use]
pub fn classify_wind_speed(wind_speed_kmh: f64) -> RiskLevel {
    if wind_speed_kmh < WIND_LOW_BELOW_KMH {
        RiskLevel::Low
    } else if wind_speed_kmh <= WIND_HIGH_UP_TO_KMH {
        RiskLevel::High
    } else {
        RiskLevel::Extreme
    }
}

#[must_use]
pub fn classify_temperature(temperature: f64) -> RiskLevel {
    if TEMPERATURE_LOW.contains(&temperature) {
        RiskLevel::Low
    } else if TEMPERATURE_MODERATE.contains(&temperature) {
        RiskLevel::Moderate
    } else if TEMPERATURE_HIGH.contains(&temperature) {
        RiskLevel::High
    } else {
        RiskLevel::Extreme
    }
}

/// Wire label for a wind reading that may be missing
#[must_use]
pub fn wind_label(wind_speed_kmh: Option<f64>) -> String {
    wind_speed_kmh.map_or_else(
        || WIND_UNAVAILABLE.to_string(),
        |speed| classify_wind_speed(speed).label().to_string(),
    )
}

/// Wire label for a temperature reading that may be missing
#[must_use]
pub fn temperature_label(temperature: Option<f64>) -> String {
    temperature.map_or_else(
        || TEMPERATURE_UNAVAILABLE.to_string(),
        |t| classify_temperature(t).label().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dry_streak_resets_on_significant_rain() {
        assert_eq!(dry_day_streak(&[]), 0);
        assert_eq!(dry_day_streak(&[0.0, 0.0, 0.0]), 3);
        assert_eq!(dry_day_streak(&[0.0, 5.0, 1.0, 2.4]), 2);
        assert_eq!(dry_day_streak(&[0.0, 0.0, 2.5]), 0);
    }

    #[rstest]
    #[case(0, RiskLevel::Low)]
    #[case(6, RiskLevel::Low)]
    #[case(7, RiskLevel::Moderate)]
    #[case(13, RiskLevel::Moderate)]
    #[case(14, RiskLevel::High)]
    #[case(59, RiskLevel::High)]
    #[case(60, RiskLevel::Extreme)]
    #[case(61, RiskLevel::Extreme)]
    fn test_fire_risk_by_dry_days(#[case] dry_days: usize, #[case] expected: RiskLevel) {
        let mut rainfall = vec![10.0];
        rainfall.extend(std::iter::repeat_n(0.0, dry_days));
        assert_eq!(classify_fire_risk(&rainfall), expected);
    }

    #[rstest]
    #[case(0.0, RiskLevel::Low)]
    #[case(9.9, RiskLevel::Low)]
    #[case(10.0, RiskLevel::High)]
    #[case(30.0, RiskLevel::High)]
    #[case(30.1, RiskLevel::Extreme)]
    fn test_wind_classification(#[case] speed: f64, #[case] expected: RiskLevel) {
        assert_eq!(classify_wind_speed(speed), expected);
    }

    #[rstest]
    #[case(-5.0, RiskLevel::Low)]
    #[case(29.9, RiskLevel::Low)]
    #[case(30.0, RiskLevel::Moderate)]
    #[case(35.0, RiskLevel::High)]
    #[case(40.0, RiskLevel::Extreme)]
    fn test_temperature_classification(#[case] temperature: f64, #[case] expected: RiskLevel) {
        assert_eq!(classify_temperature(temperature), expected);
    }

    #[test]
    fn test_missing_readings_have_explicit_labels() {
        assert_eq!(wind_label(None), WIND_UNAVAILABLE);
        assert_eq!(wind_label(Some(45.0)), "Extreme Risk");
        assert_eq!(temperature_label(None), TEMPERATURE_UNAVAILABLE);
        assert_eq!(temperature_label(Some(20.0)), "Low Risk");
    }

    #[test]
    fn test_labels_round_trip_through_vocabulary() {
        for level in [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High, RiskLevel::Extreme] {
            assert_eq!(RiskLevel::parse(level.label()), Some(level));
        }
    }
}
