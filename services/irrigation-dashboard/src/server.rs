//! Operator-facing web surface
//!
//! Pages are rendered on the server; every action is a form post that
//! redirects back to `/`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::backend::{CropId, ScheduleId, SensorId};
use crate::controller::{Dashboard, Gate};
use crate::render;
use crate::state::Notice;
use crate::view;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CropForm {
    #[serde(default)]
    pub crop_id: Option<CropId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub sensor_id: Option<SensorId>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: String,
}

/// Build the dashboard axum router
pub fn build_router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/refresh", post(refresh_handler))
        .route("/auto-mode", post(auto_mode_handler))
        .route("/sensors/{id}/water", post(water_handler))
        .route("/sensors/{id}/crop", post(crop_handler))
        .route("/sensors/{id}/history", get(history_handler))
        .route("/export", get(export_handler))
        .route("/schedules", get(schedules_handler).post(add_schedule_handler))
        .route("/schedules/{id}/delete", post(delete_schedule_handler))
        .route("/modal/close", post(close_modal_handler))
        .route("/api/state", get(state_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

fn back_to_index() -> Redirect {
    Redirect::to("/")
}

async fn session_open(dashboard: &Dashboard) -> bool {
    dashboard.check_login().await == Gate::Open
}

async fn index_handler(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    let snapshot = dashboard.snapshot().await;
    let html = if snapshot.logged_in {
        render::dashboard_page(&view::dashboard(&snapshot), dashboard.polling_interval())
    } else {
        render::login_page(&view::login(&snapshot))
    };
    Html(html)
}

async fn login_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Form(form): Form<LoginForm>,
) -> Redirect {
    // Failures are queued as notices for the login page
    let _ = dashboard.login(&form.username, &form.password).await;
    back_to_index()
}

async fn logout_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    if session_open(&dashboard).await {
        dashboard.logout().await;
    }
    back_to_index()
}

async fn refresh_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        dashboard.refresh().await;
    }
    back_to_index()
}

async fn auto_mode_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        let _ = dashboard.toggle_auto_mode().await;
    }
    back_to_index()
}

async fn water_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Path(id): Path<SensorId>,
) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        let _ = dashboard.water_plant(id).await;
    }
    back_to_index()
}

async fn crop_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Path(id): Path<SensorId>,
    Form(form): Form<CropForm>,
) -> Redirect {
    let Some(_session) = dashboard.open_session().await else {
        return back_to_index();
    };
    // An empty crop catalogue renders a select that submits nothing
    match form.crop_id {
        Some(crop_id) => {
            let _ = dashboard.change_crop(id, crop_id).await;
        }
        None => dashboard.notify(Notice::error("Please select a crop")).await,
    }
    back_to_index()
}

async fn history_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Path(id): Path<SensorId>,
) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        dashboard.show_history(id).await;
    }
    back_to_index()
}

async fn export_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    let Some(_session) = dashboard.open_session().await else {
        return back_to_index();
    };
    match dashboard.export_url().await {
        Some(url) => {
            tracing::debug!("Redirecting export to {}", url);
            Redirect::to(&url)
        }
        None => back_to_index(),
    }
}

async fn schedules_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        dashboard.show_schedules().await;
    }
    back_to_index()
}

async fn add_schedule_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Form(form): Form<ScheduleForm>,
) -> Redirect {
    let Some(_session) = dashboard.open_session().await else {
        return back_to_index();
    };
    match form.sensor_id {
        Some(sensor_id) => {
            let _ = dashboard
                .add_schedule(sensor_id, &form.time, &form.days)
                .await;
        }
        None => dashboard.notify(Notice::error("Please select a sensor")).await,
    }
    back_to_index()
}

async fn delete_schedule_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Path(id): Path<ScheduleId>,
) -> Redirect {
    if let Some(_session) = dashboard.open_session().await {
        let _ = dashboard.delete_schedule(id).await;
    }
    back_to_index()
}

async fn close_modal_handler(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    dashboard.close_modal().await;
    back_to_index()
}

async fn state_handler(State(dashboard): State<Arc<Dashboard>>) -> Response {
    let state = dashboard.state().read().await;
    if !state.logged_in {
        return (
            axum::http::StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "logged_in": false })),
        )
            .into_response();
    }
    Json(view::dashboard(&state)).into_response()
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
