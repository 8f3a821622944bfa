//! Test doubles shared by the integration and BDD suites

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use irrigation_dashboard::backend::BackendClient;
use irrigation_dashboard::io::{HttpClient, HttpResponse};
use irrigation_dashboard::state::new_state_handle;
use irrigation_dashboard::sync::Synchronizer;
use irrigation_dashboard::Dashboard;
use tokio_util::sync::CancellationToken;

pub const BASE_URL: &str = "http://backend.test/api";

/// A recorded HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    response: HttpResponse,
}

/// An HTTP client that records every request and answers from a route table.
///
/// Unrouted GETs of `/stats` and `/auto-mode` get a neutral object; everything
/// else unrouted gets `200 []`.
#[derive(Debug, Default)]
pub struct RecordingHttpClient {
    requests: Mutex<Vec<RecordedRequest>>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            response: HttpResponse {
                status,
                body: body.to_string(),
            },
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// `METHOD /path` for each request, in order
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn handle(&self, method: &str, url: &str, body: Option<&serde_json::Value>) -> HttpResponse {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            body: body.cloned(),
        });

        let routed = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .map(|r| r.response.clone());
        routed.unwrap_or_else(|| {
            let body = match path.as_str() {
                "/stats" => r#"{"avg_moisture": 0, "total_sensors": 0, "today_watering": 0}"#,
                "/auto-mode" => r#"{"auto_mode": false}"#,
                _ => "[]",
            };
            HttpResponse {
                status: 200,
                body: body.to_string(),
            }
        })
    }
}

#[async_trait::async_trait]
impl HttpClient for RecordingHttpClient {
    async fn get(&self, url: &str) -> irrigation_dashboard::Result<HttpResponse> {
        Ok(self.handle("GET", url, None))
    }

    async fn post(&self, url: &str) -> irrigation_dashboard::Result<HttpResponse> {
        Ok(self.handle("POST", url, None))
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> irrigation_dashboard::Result<HttpResponse> {
        Ok(self.handle("POST", url, Some(body)))
    }

    async fn put_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> irrigation_dashboard::Result<HttpResponse> {
        Ok(self.handle("PUT", url, Some(body)))
    }

    async fn delete(&self, url: &str) -> irrigation_dashboard::Result<HttpResponse> {
        Ok(self.handle("DELETE", url, None))
    }
}

pub fn sensors_json(moistures: &[f64]) -> String {
    let sensors: Vec<serde_json::Value> = moistures
        .iter()
        .enumerate()
        .map(|(i, m)| {
            serde_json::json!({
                "id": i as i64 + 1,
                "crop_id": 1,
                "crop_name": "Tomato",
                "current_moisture": m,
                "min_moisture": 60.0,
                "max_moisture": 80.0,
                "water_amount": 500,
            })
        })
        .collect();
    serde_json::Value::Array(sensors).to_string()
}

pub fn dashboard_with(http: Arc<RecordingHttpClient>) -> Arc<Dashboard> {
    let backend = Arc::new(BackendClient::new(BASE_URL, http));
    let sync = Arc::new(Synchronizer::new(backend, new_state_handle(), None));
    Arc::new(Dashboard::new(
        sync,
        Duration::from_secs(30),
        CancellationToken::new(),
    ))
}

pub fn accept_login(http: &RecordingHttpClient) {
    http.route(
        "POST",
        "/login",
        200,
        r#"{"success": true, "username": "admin"}"#,
    );
}

pub fn reject_login(http: &RecordingHttpClient) {
    http.route(
        "POST",
        "/login",
        401,
        r#"{"success": false, "error": "Invalid credentials"}"#,
    );
}
