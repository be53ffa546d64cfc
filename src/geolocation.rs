//! Device position capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::config::DeviceConfig;
use crate::models::Coordinates;

/// Position as reported by a device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Position> for Coordinates {
    fn from(position: Position) -> Self {
        Coordinates::new(position.latitude, position.longitude)
    }
}

/// One-shot position request.
///
/// Implementations fail with `PermissionDenied` or `Timeout` when the device
/// declines to answer.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Result<Position>;
}

/// Device pinned to a configured position, e.g. a sensor mounted on a roof
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    position: Position,
}

impl FixedLocator {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position {
                latitude,
                longitude,
            },
        }
    }
}

impl From<&DeviceConfig> for FixedLocator {
    fn from(config: &DeviceConfig) -> Self {
        Self::new(config.latitude, config.longitude)
    }
}

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn current_position(&self) -> Result<Position> {
        Ok(self.position)
    }
}
