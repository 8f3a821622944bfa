//! BDD test world for the irrigation dashboard

use std::sync::Arc;

use cucumber::World;
use irrigation_dashboard::moisture::MoistureStatus;
use irrigation_dashboard::Dashboard;

use crate::common::{dashboard_with, RecordingHttpClient};

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    pub http: Option<Arc<RecordingHttpClient>>,
    pub dashboard: Option<Arc<Dashboard>>,
    pub last_result: Option<irrigation_dashboard::Result<()>>,

    // Export testing
    pub export_url: Option<Option<String>>,

    // Classification and summary testing
    pub status: Option<MoistureStatus>,
    pub sensor_readings: Vec<f64>,
    pub average_text: Option<String>,
}

impl DashboardWorld {
    pub fn http(&mut self) -> Arc<RecordingHttpClient> {
        self.http.get_or_insert_with(RecordingHttpClient::new).clone()
    }

    pub fn dashboard(&mut self) -> Arc<Dashboard> {
        let http = self.http();
        self.dashboard
            .get_or_insert_with(|| dashboard_with(http))
            .clone()
    }
}
