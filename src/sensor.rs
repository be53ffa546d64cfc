//! Live sensor polling
//!
//! A field sensor exposes its latest temperature/humidity reading over HTTP.
//! [`SensorPoller`] fetches it immediately and then on a fixed cadence, keeping
//! only the most recent reading. Stopping (or dropping) the poller cancels the
//! background task so no fetch happens afterwards.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::select;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::SensorConfig;
use crate::{FireFightError, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
}

/// Source of sensor readings
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn fetch(&self) -> Result<SensorReading>;
}

/// Sensor reachable with `GET <url>` returning `{temperature, humidity}`
pub struct HttpSensorSource {
    client: Client,
    url: String,
}

impl HttpSensorSource {
    pub fn new(config: &SensorConfig) -> Result<Self> {
        Self::with_url(config.url.clone())
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| FireFightError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SensorSource for HttpSensorSource {
    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<SensorReading> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let reading = response.json::<SensorReading>().await?;
        Ok(reading)
    }
}

/// What the sensor page shows: the last reading and the last error
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    pub reading: Option<SensorReading>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

/// Read side of a poller, cheap to clone into request handlers
#[derive(Clone, Default)]
pub struct SensorFeed {
    snapshot: Arc<RwLock<SensorSnapshot>>,
}

impl SensorFeed {
    pub async fn latest(&self) -> SensorSnapshot {
        self.snapshot.read().await.clone()
    }
}

pub struct SensorPoller {
    feed: SensorFeed,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SensorPoller {
    /// Start polling `source` every `period`. Must be called inside a Tokio runtime.
    pub fn start(source: Arc<dyn SensorSource>, period: Duration) -> Self {
        let feed = SensorFeed::default();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(
            source,
            period,
            feed.snapshot.clone(),
            cancel.clone(),
        ));

        Self {
            feed,
            cancel,
            task: Some(task),
        }
    }

    #[must_use]
    pub fn feed(&self) -> SensorFeed {
        self.feed.clone()
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        if self.cancel.is_cancelled() {
            PollerState::Idle
        } else {
            PollerState::Polling
        }
    }

    /// Cancel polling and wait for the background task to finish.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("sensor poller task ended abnormally: {}", e);
            }
            debug!("sensor poller stopped");
        }
    }
}

impl Drop for SensorPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    source: Arc<dyn SensorSource>,
    period: Duration,
    snapshot: Arc<RwLock<SensorSnapshot>>,
    cancel: CancellationToken,
) {
    // first tick fires immediately
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let result = select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    result = source.fetch() => result,
                };

                let mut guard = snapshot.write().await;
                match result {
                    Ok(reading) => {
                        debug!(?reading, "sensor reading");
                        guard.reading = Some(reading);
                        guard.error = None;
                    }
                    Err(e) => {
                        warn!("sensor fetch failed: {}", e);
                        guard.error = Some("Error fetching data".to_string());
                    }
                }
            }
        }
    }
}
