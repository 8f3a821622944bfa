//! Dashboard controller: session gate and operator actions
//!
//! Write paths report failures to the operator through a [`Notice`]; read
//! paths are delegated to the [`Synchronizer`] and fail silently.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendClient, CropId, Credentials, NewSchedule, ScheduleId, SensorId};
use crate::error::DashboardError;
use crate::live_update::{LiveUpdate, LiveUpdateHandle};
use crate::state::{AppState, HistoryModal, Notice, StateHandle, StateUpdate};
use crate::sync::Synchronizer;

/// Whether the login overlay has to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    LoginRequired,
    Open,
}

/// Proof that a session is open; logout waits until every one is dropped
pub type SessionGuard<'a> = RwLockReadGuard<'a, ()>;

/// The dashboard controller
pub struct Dashboard {
    sync: Arc<Synchronizer>,
    polling_interval: Duration,
    cancel: CancellationToken,
    live_update: Mutex<Option<LiveUpdateHandle>>,
    session: RwLock<()>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("polling_interval", &self.polling_interval)
            .finish()
    }
}

impl Dashboard {
    /// `cancel` is the service-wide token; each session's live-update loop
    /// runs on a child of it.
    pub fn new(sync: Arc<Synchronizer>, polling_interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            sync,
            polling_interval,
            cancel,
            live_update: Mutex::new(None),
            session: RwLock::new(()),
        }
    }

    fn backend(&self) -> &BackendClient {
        self.sync.backend()
    }

    pub fn state(&self) -> &StateHandle {
        self.sync.state()
    }

    pub fn synchronizer(&self) -> &Arc<Synchronizer> {
        &self.sync
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    async fn apply(&self, update: StateUpdate) {
        self.state().write().await.apply(update);
    }

    pub(crate) async fn notify(&self, notice: Notice) {
        tracing::info!("Operator notice: {}", notice.message);
        self.apply(StateUpdate::Notice(notice)).await;
    }

    /// Copy of the current state with queued notices handed over
    pub async fn snapshot(&self) -> AppState {
        let mut state = self.state().write().await;
        let notices = state.take_notices();
        let mut snapshot = state.clone();
        snapshot.notices = notices;
        snapshot
    }

    pub async fn check_login(&self) -> Gate {
        if self.state().read().await.logged_in {
            Gate::Open
        } else {
            Gate::LoginRequired
        }
    }

    /// Hold the session open for the duration of an operator action.
    ///
    /// `None` when nobody is logged in. While a guard is alive, logout and
    /// login wait, so an action never writes into a reset state.
    pub async fn open_session(&self) -> Option<SessionGuard<'_>> {
        let guard = self.session.read().await;
        if self.state().read().await.logged_in {
            Some(guard)
        } else {
            None
        }
    }

    pub async fn is_live_updating(&self) -> bool {
        self.live_update
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| h.is_running())
    }

    /// Validate, authenticate, then load data and start the live-update loop.
    ///
    /// Empty fields are rejected without contacting the backend. Any other
    /// failure leaves the session closed.
    pub async fn login(&self, username: &str, password: &str) -> crate::Result<()> {
        if username.is_empty() || password.is_empty() {
            self.notify(Notice::error("Please enter username and password"))
                .await;
            return Err(DashboardError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let _exclusive = self.session.write().await;
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let reply = match self.backend().login(&credentials).await {
            Ok(reply) if reply.success => reply,
            Ok(_) => {
                tracing::info!("Login rejected for '{}'", username);
                self.notify(Notice::error("Invalid credentials")).await;
                return Err(DashboardError::Backend("login rejected".to_string()));
            }
            Err(e) => {
                tracing::warn!("Login request failed: {}", e);
                self.notify(Notice::error("Invalid credentials")).await;
                return Err(e);
            }
        };

        let username = reply.username.unwrap_or_else(|| username.to_string());
        tracing::info!("Logged in as '{}'", username);
        self.apply(StateUpdate::LoggedIn { username }).await;

        self.sync.load().await;
        self.start_live_update().await;
        Ok(())
    }

    async fn start_live_update(&self) {
        let handle = LiveUpdate::spawn(
            Arc::clone(&self.sync),
            self.polling_interval,
            self.cancel.child_token(),
        );
        let previous = self.live_update.lock().await.replace(handle);
        if let Some(previous) = previous {
            previous.stop().await;
        }
    }

    async fn stop_live_update(&self) {
        let handle = self.live_update.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Tell the backend, stop the live-update loop, and reset all local state
    pub async fn logout(&self) {
        let _exclusive = self.session.write().await;
        if let Err(e) = self.backend().logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.stop_live_update().await;
        self.apply(StateUpdate::LoggedOut).await;
        tracing::info!("Logged out");
    }

    /// Release the live-update loop when the service stops
    pub async fn shutdown(&self) {
        self.stop_live_update().await;
    }

    /// Manual refresh, the same pass the live-update loop makes
    pub async fn refresh(&self) {
        self.sync.refresh_all().await;
    }

    pub async fn water_plant(&self, sensor_id: SensorId) -> crate::Result<()> {
        match self.backend().water(sensor_id).await {
            Ok(reply) if reply.success => {
                self.notify(Notice::info(format!(
                    "Watered! {}% \u{2192} {}%",
                    reply.moisture_before, reply.moisture_after
                )))
                .await;
                self.sync.fetch_sensors().await;
                Ok(())
            }
            Ok(_) => {
                self.notify(Notice::error("Watering failed")).await;
                Err(DashboardError::Backend(format!(
                    "watering sensor {} reported failure",
                    sensor_id
                )))
            }
            Err(e) => {
                tracing::warn!("Watering sensor {} failed: {}", sensor_id, e);
                self.notify(Notice::error("Watering failed")).await;
                Err(e)
            }
        }
    }

    /// Reassign a crop. The sensor list is re-fetched whatever the outcome.
    pub async fn change_crop(&self, sensor_id: SensorId, crop_id: CropId) -> crate::Result<()> {
        let result = self.backend().set_crop(sensor_id, crop_id).await;
        if let Err(e) = &result {
            tracing::warn!("Changing crop of sensor {} failed: {}", sensor_id, e);
            self.notify(Notice::error("Failed to change crop")).await;
        }
        self.sync.fetch_sensors().await;
        result
    }

    /// Flip the backend auto-mode flag; the label follows what the backend
    /// acknowledges.
    pub async fn toggle_auto_mode(&self) -> crate::Result<bool> {
        let requested = !self.state().read().await.auto_mode;
        match self.backend().set_auto_mode(requested).await {
            Ok(enabled) => {
                tracing::info!("Auto mode {}", if enabled { "enabled" } else { "disabled" });
                self.apply(StateUpdate::AutoMode(enabled)).await;
                Ok(enabled)
            }
            Err(e) => {
                tracing::warn!("Setting auto mode failed: {}", e);
                self.notify(Notice::error("Failed to change auto mode")).await;
                Err(e)
            }
        }
    }

    /// Open the schedule modal with the backend's current list
    pub async fn show_schedules(&self) {
        match self.backend().schedules().await {
            Ok(schedules) => self.apply(StateUpdate::SchedulesLoaded(schedules)).await,
            Err(e) => tracing::warn!("Failed to fetch schedules: {}", e),
        }
    }

    pub async fn add_schedule(
        &self,
        sensor_id: SensorId,
        time: &str,
        days: &str,
    ) -> crate::Result<()> {
        if time.trim().is_empty() || days.trim().is_empty() {
            self.notify(Notice::error("Please enter a time and days"))
                .await;
            return Err(DashboardError::Validation(
                "schedule time and days are required".to_string(),
            ));
        }

        let schedule = NewSchedule {
            sensor_id,
            time: time.trim().to_string(),
            days: days.trim().to_string(),
        };
        let result = self.backend().add_schedule(&schedule).await;
        if let Err(e) = &result {
            tracing::warn!("Adding schedule for sensor {} failed: {}", sensor_id, e);
            self.notify(Notice::error("Failed to add schedule")).await;
        }
        self.show_schedules().await;
        result
    }

    /// Delete a schedule; the list is reloaded exactly once afterwards
    pub async fn delete_schedule(&self, schedule_id: ScheduleId) -> crate::Result<()> {
        let result = self.backend().delete_schedule(schedule_id).await;
        if let Err(e) = &result {
            tracing::warn!("Deleting schedule {} failed: {}", schedule_id, e);
            self.notify(Notice::error("Failed to delete schedule")).await;
        }
        self.show_schedules().await;
        result
    }

    /// Open a sensor's watering log and remember it as the export target
    pub async fn show_history(&self, sensor_id: SensorId) {
        self.apply(StateUpdate::ExportTarget(sensor_id)).await;
        match self.backend().history(sensor_id).await {
            Ok(entries) => {
                self.apply(StateUpdate::HistoryLoaded(HistoryModal { sensor_id, entries }))
                    .await
            }
            Err(e) => tracing::warn!("Failed to fetch history for sensor {}: {}", sensor_id, e),
        }
    }

    /// Download location for the last sensor whose history was opened
    pub async fn export_url(&self) -> Option<String> {
        let target = self.state().read().await.current_sensor_for_export;
        target.map(|id| self.backend().export_url(id))
    }

    pub async fn close_modal(&self) {
        self.apply(StateUpdate::CloseModal).await;
    }
}
