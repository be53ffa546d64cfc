//! Risk vocabulary and aggregation
//!
//! The backend reports three independent risk levels (rainfall, wind and
//! temperature). They are folded into one overall level by averaging their
//! scores, with a single "no risk" signal overriding everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FireFightError;

/// Closed vocabulary of risk levels shared by the backend and the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "no risk")]
    NoRisk,
    #[serde(rename = "zero risk")]
    ZeroRisk,
    #[serde(rename = "low risk")]
    Low,
    #[serde(rename = "moderate risk")]
    Moderate,
    #[serde(rename = "high risk")]
    High,
    #[serde(rename = "extreme risk")]
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::NoRisk,
        RiskLevel::ZeroRisk,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    /// Canonical display form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "no risk",
            RiskLevel::ZeroRisk => "zero risk",
            RiskLevel::Low => "low risk",
            RiskLevel::Moderate => "moderate risk",
            RiskLevel::High => "high risk",
            RiskLevel::Extreme => "extreme risk",
        }
    }

    /// Label form used on the backend wire ("High Risk")
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "No Risk",
            RiskLevel::ZeroRisk => "Zero Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Extreme => "Extreme Risk",
        }
    }

    /// Case-insensitive lookup ignoring surrounding whitespace; anything outside the vocabulary is `None`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let folded = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|level| level.as_str() == folded)
    }

    /// Aggregation score. Only the four graded levels carry weight.
    #[must_use]
    pub fn score(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::High => 3,
            RiskLevel::Extreme => 4,
            RiskLevel::NoRisk | RiskLevel::ZeroRisk => 0,
        }
    }

    fn from_mean(mean: f64) -> Self {
        if mean < 1.5 {
            RiskLevel::Low
        } else if mean < 2.5 {
            RiskLevel::Moderate
        } else if mean < 3.5 {
            RiskLevel::High
        } else {
            RiskLevel::Extreme
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = FireFightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FireFightError::validation(format!("Unknown risk level: {s}")))
    }
}

/// Combine three risk levels into one overall level.
///
/// Inputs are compared case-insensitively, ignoring surrounding whitespace.
/// Any "no risk" input yields "zero risk". Otherwise the scores are averaged, unrecognized inputs
/// counting as 0, and the mean is bucketed back into a level.
#[must_use]
pub fn aggregate(rainfall: &str, wind: &str, temperature: &str) -> RiskLevel {
    let levels = [rainfall, wind, temperature].map(RiskLevel::parse);

    if levels.contains(&Some(RiskLevel::NoRisk)) {
        return RiskLevel::ZeroRisk;
    }

    let total: u32 = levels
        .iter()
        .map(|level| level.map_or(0, |l| u32::from(l.score())))
        .sum();

    RiskLevel::from_mean(f64::from(total) / 3.0)
}

/// Risk levels reported for one location plus their aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    rainfall_risk: String,
    wind_risk: String,
    temperature_risk: String,
    overall_risk: RiskLevel,
}

impl RiskAssessment {
    /// Build an assessment; the overall level is always derived here.
    pub fn new(
        rainfall_risk: impl Into<String>,
        wind_risk: impl Into<String>,
        temperature_risk: impl Into<String>,
    ) -> Self {
        let rainfall_risk = rainfall_risk.into();
        let wind_risk = wind_risk.into();
        let temperature_risk = temperature_risk.into();
        let overall_risk = aggregate(&rainfall_risk, &wind_risk, &temperature_risk);

        Self {
            rainfall_risk,
            wind_risk,
            temperature_risk,
            overall_risk,
        }
    }

    #[must_use]
    pub fn rainfall_risk(&self) -> &str {
        &self.rainfall_risk
    }

    #[must_use]
    pub fn wind_risk(&self) -> &str {
        &self.wind_risk
    }

    #[must_use]
    pub fn temperature_risk(&self) -> &str {
        &self.temperature_risk
    }

    #[must_use]
    pub fn overall_risk(&self) -> RiskLevel {
        self.overall_risk
    }
}

/// Canonical form of a reported level, or the raw text when it is outside the vocabulary
#[must_use]
pub fn display_level(raw: &str) -> String {
    RiskLevel::parse(raw).map_or_else(|| raw.to_string(), |level| level.as_str().to_string())
}
