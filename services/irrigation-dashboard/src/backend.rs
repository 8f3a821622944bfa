//! Typed client for the irrigation backend REST API

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::io::{HttpClient, HttpResponse};

pub type SensorId = i64;
pub type CropId = i64;
pub type ScheduleId = i64;

/// Crop catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: CropId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Soil-moisture sensor as reported by `GET /sensors`
///
/// The crop columns (`crop_id`, `crop_name`, the moisture range and
/// `water_amount`) are null for a sensor with no crop assigned; `last_reading`
/// is null until the first reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    #[serde(default)]
    pub crop_id: Option<CropId>,
    #[serde(default)]
    pub crop_name: Option<String>,
    pub current_moisture: f64,
    #[serde(default)]
    pub min_moisture: Option<f64>,
    #[serde(default)]
    pub max_moisture: Option<f64>,
    #[serde(default)]
    pub water_amount: Option<u32>,
    #[serde(default)]
    pub last_reading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Sensor {
    /// Optimal `(min, max)` range of the assigned crop
    pub fn moisture_range(&self) -> Option<(f64, f64)> {
        self.min_moisture.zip(self.max_moisture)
    }
}

/// One entry of a sensor's watering log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLogEntry {
    pub timestamp: String,
    pub moisture_before: f64,
    pub moisture_after: f64,
    pub amount: u32,
}

/// A recurring watering instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub sensor_id: SensorId,
    pub time: String,
    pub days: String,
}

/// Body of `POST /schedules`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub sensor_id: SensorId,
    pub time: String,
    pub days: String,
}

/// Backend aggregate figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub avg_moisture: f64,
    pub total_sensors: u32,
    pub today_watering: u32,
}

/// Current weather at the configured location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: f64,
    pub precipitation: f64,
    pub windspeed: f64,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Reply to `POST /login`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Reply to `POST /sensor/{id}/water`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub moisture_before: f64,
    #[serde(default)]
    pub moisture_after: f64,
}

/// Reply to `GET /sensor/{id}/moisture`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoistureReading {
    pub moisture: f64,
}

#[derive(Debug, Deserialize)]
struct AutoModeResponse {
    auto_mode: bool,
}

/// Client for the irrigation backend
pub struct BackendClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created BackendClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit credentials. Rejections come back as `success: false`, usually
    /// with a 401, so the body is decoded whatever the status.
    pub async fn login(&self, credentials: &Credentials) -> crate::Result<LoginResponse> {
        let body = serde_json::to_value(credentials)?;
        let response = self.http.post_json(&self.url("/login"), &body).await?;
        let parsed = serde_json::from_str::<LoginResponse>(&response.body);
        match parsed {
            Ok(parsed) => Ok(parsed),
            Err(_) if !response.is_success() => Err(status_error(response)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn logout(&self) -> crate::Result<()> {
        let response = self.http.post(&self.url("/logout")).await?;
        ensure_success(response).map(|_| ())
    }

    pub async fn crops(&self) -> crate::Result<Vec<Crop>> {
        decode(self.http.get(&self.url("/crops")).await?)
    }

    pub async fn sensors(&self) -> crate::Result<Vec<Sensor>> {
        decode(self.http.get(&self.url("/sensors")).await?)
    }

    /// Ask the backend to take a fresh reading for one sensor
    pub async fn sensor_moisture(&self, sensor_id: SensorId) -> crate::Result<MoistureReading> {
        let url = self.url(&format!("/sensor/{}/moisture", sensor_id));
        decode(self.http.get(&url).await?)
    }

    pub async fn water(&self, sensor_id: SensorId) -> crate::Result<WaterResponse> {
        let url = self.url(&format!("/sensor/{}/water", sensor_id));
        decode(self.http.post(&url).await?)
    }

    pub async fn set_crop(&self, sensor_id: SensorId, crop_id: CropId) -> crate::Result<()> {
        let url = self.url(&format!("/sensor/{}/crop", sensor_id));
        let body = serde_json::json!({ "crop_id": crop_id });
        ensure_success(self.http.put_json(&url, &body).await?).map(|_| ())
    }

    pub async fn auto_mode(&self) -> crate::Result<bool> {
        let parsed: AutoModeResponse = decode(self.http.get(&self.url("/auto-mode")).await?)?;
        Ok(parsed.auto_mode)
    }

    /// Set the backend auto-mode flag. Returns the flag the backend reports,
    /// or the requested value when the reply carries none.
    pub async fn set_auto_mode(&self, enabled: bool) -> crate::Result<bool> {
        let body = serde_json::json!({ "enabled": enabled });
        let response = ensure_success(self.http.post_json(&self.url("/auto-mode"), &body).await?)?;
        Ok(serde_json::from_str::<AutoModeResponse>(&response.body)
            .map(|r| r.auto_mode)
            .unwrap_or(enabled))
    }

    pub async fn history(&self, sensor_id: SensorId) -> crate::Result<Vec<HistoryLogEntry>> {
        decode(self.http.get(&self.url(&format!("/history/{}", sensor_id))).await?)
    }

    /// Download location of a sensor's CSV export. Never fetched by the
    /// dashboard itself; the operator's browser is sent there.
    pub fn export_url(&self, sensor_id: SensorId) -> String {
        self.url(&format!("/export/{}", sensor_id))
    }

    pub async fn schedules(&self) -> crate::Result<Vec<Schedule>> {
        decode(self.http.get(&self.url("/schedules")).await?)
    }

    pub async fn add_schedule(&self, schedule: &NewSchedule) -> crate::Result<()> {
        let body = serde_json::to_value(schedule)?;
        ensure_success(self.http.post_json(&self.url("/schedules"), &body).await?).map(|_| ())
    }

    pub async fn delete_schedule(&self, schedule_id: ScheduleId) -> crate::Result<()> {
        let url = self.url(&format!("/schedules/{}", schedule_id));
        ensure_success(self.http.delete(&url).await?).map(|_| ())
    }

    pub async fn stats(&self) -> crate::Result<Stats> {
        decode(self.http.get(&self.url("/stats")).await?)
    }

    pub async fn weather(&self, latitude: f64, longitude: f64) -> crate::Result<Weather> {
        let url = self.url(&format!("/weather?lat={}&lon={}", latitude, longitude));
        decode(self.http.get(&url).await?)
    }
}

fn status_error(response: HttpResponse) -> DashboardError {
    DashboardError::Status {
        status: response.status,
        body: response.body,
    }
}

fn ensure_success(response: HttpResponse) -> crate::Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(status_error(response))
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> crate::Result<T> {
    let response = ensure_success(response)?;
    Ok(serde_json::from_str(&response.body)?)
}
