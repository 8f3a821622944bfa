//! View-models: what the operator sees, derived from [`AppState`]
//!
//! Everything here is a pure function of the state so it can be rendered as
//! HTML or served as JSON without touching the backend.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::backend::{Crop, HistoryLogEntry, Schedule, Sensor, SensorId, Weather};
use crate::moisture::{format_average, FillLevel, MoistureStatus};
use crate::state::{AppState, Modal, Notice, Summary};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the login overlay needs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoginView {
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropOptionView {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

/// One sensor card in the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorCardView {
    pub id: SensorId,
    pub crop_name: String,
    pub description: Option<String>,
    pub moisture: String,
    pub fill_percent: f64,
    pub fill_label: String,
    pub fill_class: &'static str,
    pub status: MoistureStatus,
    pub status_label: &'static str,
    pub range: String,
    pub water_amount: String,
    pub last_reading: String,
    pub crop_options: Vec<CropOptionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub avg_moisture: String,
    pub active_sensors: u32,
    pub today_watering: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub temperature: String,
    pub precipitation: String,
    pub windspeed: String,
    pub rain_expected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRowView {
    pub timestamp: String,
    pub moisture_before: String,
    pub moisture_after: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryModalView {
    pub sensor_id: SensorId,
    pub rows: Vec<HistoryRowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRowView {
    pub id: i64,
    pub sensor_id: SensorId,
    pub time: String,
    pub days: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorChoiceView {
    pub id: SensorId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleModalView {
    pub schedules: Vec<ScheduleRowView>,
    pub sensor_choices: Vec<SensorChoiceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalView {
    History(HistoryModalView),
    Schedules(ScheduleModalView),
}

/// The full dashboard page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub username: String,
    pub summary: SummaryView,
    pub weather: Option<WeatherView>,
    pub auto_mode: bool,
    pub auto_mode_label: &'static str,
    pub sensors: Vec<SensorCardView>,
    pub modal: Option<ModalView>,
    pub notices: Vec<Notice>,
    pub export_available: bool,
}

/// Backend timestamps are shown in a fixed layout; anything unparseable is
/// shown as received.
pub fn format_timestamp(raw: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"));
    match parsed {
        Ok(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn auto_mode_label(enabled: bool) -> &'static str {
    if enabled {
        "Auto Mode: ON"
    } else {
        "Auto Mode: OFF"
    }
}

fn crop_label(sensor: &Sensor) -> String {
    sensor
        .crop_name
        .clone()
        .unwrap_or_else(|| "Unassigned".to_string())
}

pub fn sensor_card(sensor: &Sensor, crops: &[Crop]) -> SensorCardView {
    let current = sensor.current_moisture;
    let status = MoistureStatus::for_sensor(sensor);
    let fill = FillLevel::for_sensor(sensor);

    SensorCardView {
        id: sensor.id,
        crop_name: crop_label(sensor),
        description: sensor.description.clone().filter(|d| !d.is_empty()),
        moisture: format!("{:.1}%", current),
        fill_percent: current,
        fill_label: format!("{:.0}%", current),
        fill_class: fill.css_class(),
        status,
        status_label: status.label(),
        range: sensor
            .moisture_range()
            .map(|(min, max)| format!("{}-{}%", min, max))
            .unwrap_or_else(|| "\u{2014}".to_string()),
        water_amount: sensor
            .water_amount
            .map(|ml| format!("{}ml", ml))
            .unwrap_or_else(|| "\u{2014}".to_string()),
        last_reading: sensor
            .last_reading
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "Never".to_string()),
        crop_options: crops
            .iter()
            .map(|crop| CropOptionView {
                id: crop.id,
                name: crop.name.clone(),
                selected: sensor.crop_id == Some(crop.id),
            })
            .collect(),
    }
}

pub fn summary(summary: &Summary) -> SummaryView {
    SummaryView {
        avg_moisture: format_average(summary.avg_moisture),
        active_sensors: summary.active_sensors,
        today_watering: summary
            .today_watering
            .map(|n| n.to_string())
            .unwrap_or_else(|| "\u{2014}".to_string()),
    }
}

pub fn weather(weather: &Weather) -> WeatherView {
    WeatherView {
        temperature: format!("{:.1}\u{b0}C", weather.temperature),
        precipitation: format!("{:.1} mm", weather.precipitation),
        windspeed: format!("{:.1} km/h", weather.windspeed),
        rain_expected: weather.precipitation > 0.0,
    }
}

fn history_row(entry: &HistoryLogEntry) -> HistoryRowView {
    HistoryRowView {
        timestamp: format_timestamp(&entry.timestamp),
        moisture_before: format!("{:.1}%", entry.moisture_before),
        moisture_after: format!("{:.1}%", entry.moisture_after),
        amount: format!("{}ml", entry.amount),
    }
}

fn schedule_modal(schedules: &[Schedule], sensors: &[Sensor]) -> ScheduleModalView {
    ScheduleModalView {
        schedules: schedules
            .iter()
            .map(|s| ScheduleRowView {
                id: s.id,
                sensor_id: s.sensor_id,
                time: s.time.clone(),
                days: s.days.clone(),
            })
            .collect(),
        sensor_choices: sensors
            .iter()
            .map(|s| SensorChoiceView {
                id: s.id,
                label: format!("Sensor {} - {}", s.id, crop_label(s)),
            })
            .collect(),
    }
}

fn modal(state: &AppState) -> Option<ModalView> {
    match &state.modal {
        Modal::None => None,
        Modal::History(history) => Some(ModalView::History(HistoryModalView {
            sensor_id: history.sensor_id,
            rows: history.entries.iter().map(history_row).collect(),
        })),
        Modal::Schedules(schedules) => Some(ModalView::Schedules(schedule_modal(
            schedules,
            &state.sensors,
        ))),
    }
}

pub fn login(state: &AppState) -> LoginView {
    LoginView {
        notices: state.notices.clone(),
    }
}

pub fn dashboard(state: &AppState) -> DashboardView {
    DashboardView {
        username: state.username.clone().unwrap_or_default(),
        summary: summary(&state.summary),
        weather: state.weather.as_ref().map(weather),
        auto_mode: state.auto_mode,
        auto_mode_label: auto_mode_label(state.auto_mode),
        sensors: state
            .sensors
            .iter()
            .map(|s| sensor_card(s, &state.crops))
            .collect(),
        modal: modal(state),
        notices: state.notices.clone(),
        export_available: state.current_sensor_for_export.is_some(),
    }
}
