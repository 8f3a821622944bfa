//! Application state shared by the controller, the live-update loop and the
//! dashboard server
//!
//! All mutation goes through [`AppState::apply`]. Snapshots (crops, sensors,
//! schedules, history) are replaced wholesale; nothing is patched in place.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::{Crop, HistoryLogEntry, Schedule, Sensor, SensorId, Stats, Weather};
use crate::moisture::average_moisture;

/// Severity of a message shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-shot message for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Figures shown in the summary widgets
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub avg_moisture: Option<f64>,
    pub active_sensors: u32,
    pub today_watering: Option<u32>,
}

/// Contents of the open history modal
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryModal {
    pub sensor_id: SensorId,
    pub entries: Vec<HistoryLogEntry>,
}

/// Which modal, if any, is open
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal {
    #[default]
    None,
    History(HistoryModal),
    Schedules(Vec<Schedule>),
}

/// Every change the dashboard can make to its own state
#[derive(Debug, Clone)]
pub enum StateUpdate {
    LoggedIn { username: String },
    LoggedOut,
    Crops(Vec<Crop>),
    Sensors(Vec<Sensor>),
    Stats(Stats),
    Weather(Weather),
    AutoMode(bool),
    ExportTarget(SensorId),
    HistoryLoaded(HistoryModal),
    SchedulesLoaded(Vec<Schedule>),
    CloseModal,
    Notice(Notice),
}

/// The dashboard's in-memory view of the backend plus session/UI state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub logged_in: bool,
    pub username: Option<String>,
    pub crops: Vec<Crop>,
    pub sensors: Vec<Sensor>,
    pub summary: Summary,
    pub weather: Option<Weather>,
    pub auto_mode: bool,
    pub current_sensor_for_export: Option<SensorId>,
    pub modal: Modal,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single mutation entry point
    pub fn apply(&mut self, update: StateUpdate) {
        match update {
            StateUpdate::LoggedIn { username } => {
                self.logged_in = true;
                self.username = Some(username);
            }
            StateUpdate::LoggedOut => {
                *self = AppState::default();
            }
            StateUpdate::Crops(crops) => {
                self.crops = crops;
            }
            StateUpdate::Sensors(sensors) => {
                // Local approximation until the backend figures arrive
                self.summary.avg_moisture = average_moisture(&sensors);
                self.summary.active_sensors = sensors.len() as u32;
                self.sensors = sensors;
            }
            StateUpdate::Stats(stats) => {
                self.summary.avg_moisture = Some(stats.avg_moisture);
                self.summary.active_sensors = stats.total_sensors;
                self.summary.today_watering = Some(stats.today_watering);
            }
            StateUpdate::Weather(weather) => {
                self.weather = Some(weather);
            }
            StateUpdate::AutoMode(enabled) => {
                self.auto_mode = enabled;
            }
            StateUpdate::ExportTarget(sensor_id) => {
                self.current_sensor_for_export = Some(sensor_id);
            }
            StateUpdate::HistoryLoaded(history) => {
                self.modal = Modal::History(history);
            }
            StateUpdate::SchedulesLoaded(schedules) => {
                self.modal = Modal::Schedules(schedules);
            }
            StateUpdate::CloseModal => {
                self.modal = Modal::None;
            }
            StateUpdate::Notice(notice) => {
                self.notices.push(notice);
            }
        }
    }

    /// Hand over queued notices; each is shown once
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<AppState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(AppState::new()))
}
