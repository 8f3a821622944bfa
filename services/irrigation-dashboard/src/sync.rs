//! Read paths: pulling backend data into the application state
//!
//! Failures here are logged and swallowed. The previous snapshot stays in
//! place and the operator is not alerted.

use std::sync::Arc;

use crate::backend::{BackendClient, SensorId};
use crate::config::LocationConfig;
use crate::state::{StateHandle, StateUpdate};

/// Keeps the application state in step with the backend
#[derive(Debug)]
pub struct Synchronizer {
    backend: Arc<BackendClient>,
    state: StateHandle,
    location: Option<LocationConfig>,
}

impl Synchronizer {
    pub fn new(
        backend: Arc<BackendClient>,
        state: StateHandle,
        location: Option<LocationConfig>,
    ) -> Self {
        Self {
            backend,
            state,
            location,
        }
    }

    pub fn backend(&self) -> &Arc<BackendClient> {
        &self.backend
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    async fn apply(&self, update: StateUpdate) {
        self.state.write().await.apply(update);
    }

    /// Post-login sequence: weather, crop catalogue, sensors, auto-mode flag
    pub async fn load(&self) {
        self.fetch_weather().await;
        self.fetch_crops().await;
        self.fetch_sensors().await;
        self.fetch_auto_mode().await;
    }

    pub async fn fetch_crops(&self) {
        match self.backend.crops().await {
            Ok(crops) => {
                tracing::debug!("Fetched {} crops", crops.len());
                self.apply(StateUpdate::Crops(crops)).await;
            }
            Err(e) => tracing::warn!("Failed to fetch crops: {}", e),
        }
    }

    /// Replace the sensor snapshot, then reconcile the summary figures
    pub async fn fetch_sensors(&self) {
        match self.backend.sensors().await {
            Ok(sensors) => {
                tracing::debug!("Fetched {} sensors", sensors.len());
                self.apply(StateUpdate::Sensors(sensors)).await;
                self.update_dashboard().await;
            }
            Err(e) => tracing::warn!("Failed to fetch sensors: {}", e),
        }
    }

    /// The local average was already recomputed when the snapshot landed;
    /// the backend figures replace it when they arrive.
    pub async fn update_dashboard(&self) {
        self.fetch_stats().await;
    }

    pub async fn fetch_stats(&self) {
        match self.backend.stats().await {
            Ok(stats) => self.apply(StateUpdate::Stats(stats)).await,
            Err(e) => tracing::warn!("Failed to fetch stats: {}", e),
        }
    }

    pub async fn fetch_weather(&self) {
        let Some(location) = self.location else {
            tracing::debug!("No location configured, skipping weather");
            return;
        };
        match self
            .backend
            .weather(location.latitude, location.longitude)
            .await
        {
            Ok(weather) => self.apply(StateUpdate::Weather(weather)).await,
            Err(e) => tracing::warn!("Failed to fetch weather: {}", e),
        }
    }

    pub async fn fetch_auto_mode(&self) {
        match self.backend.auto_mode().await {
            Ok(enabled) => self.apply(StateUpdate::AutoMode(enabled)).await,
            Err(e) => tracing::warn!("Failed to fetch auto mode: {}", e),
        }
    }

    /// Trigger a fresh reading for one sensor. The reply is discarded; the
    /// next sensor-list fetch carries the new value.
    pub async fn refresh_moisture(&self, sensor_id: SensorId) {
        if let Err(e) = self.backend.sensor_moisture(sensor_id).await {
            tracing::warn!("Failed to refresh moisture for sensor {}: {}", sensor_id, e);
        }
    }

    /// One live-update pass: every sensor in the current snapshot is refreshed
    /// in turn, then the whole list is fetched once.
    pub async fn refresh_all(&self) {
        let ids: Vec<SensorId> = self.state.read().await.sensors.iter().map(|s| s.id).collect();
        tracing::debug!("Refreshing moisture for {} sensors", ids.len());
        for id in ids {
            self.refresh_moisture(id).await;
        }
        self.fetch_sensors().await;
    }
}
