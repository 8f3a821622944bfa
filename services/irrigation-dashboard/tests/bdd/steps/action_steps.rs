//! BDD step definitions for operator actions

use cucumber::{given, then, when};

use crate::world::DashboardWorld;

#[given(expr = "the backend waters sensor {int} from {float} to {float}")]
fn backend_waters(world: &mut DashboardWorld, sensor_id: i64, before: f64, after: f64) {
    let body = serde_json::json!({
        "success": true,
        "moisture_before": before,
        "moisture_after": after,
        "amount": 500,
    });
    world.http().route(
        "POST",
        &format!("/sensor/{}/water", sensor_id),
        200,
        &body.to_string(),
    );
}

#[given(expr = "the backend fails to water sensor {int}")]
fn backend_fails_water(world: &mut DashboardWorld, sensor_id: i64) {
    world.http().route(
        "POST",
        &format!("/sensor/{}/water", sensor_id),
        404,
        r#"{"error": "Sensor not found"}"#,
    );
}

#[given(expr = "the backend answers deleting schedule {int} with {string}")]
fn backend_answers_delete(world: &mut DashboardWorld, schedule_id: i64, body: String) {
    world.http().route(
        "DELETE",
        &format!("/schedules/{}", schedule_id),
        200,
        &body,
    );
}

#[when(expr = "the operator waters sensor {int}")]
async fn operator_waters(world: &mut DashboardWorld, sensor_id: i64) {
    let dashboard = world.dashboard();
    world.last_result = Some(dashboard.water_plant(sensor_id).await);
}

#[when(expr = "the operator deletes schedule {int}")]
async fn operator_deletes_schedule(world: &mut DashboardWorld, schedule_id: i64) {
    let dashboard = world.dashboard();
    world.last_result = Some(dashboard.delete_schedule(schedule_id).await);
}

#[when(expr = "the operator views the history of sensor {int}")]
async fn operator_views_history(world: &mut DashboardWorld, sensor_id: i64) {
    world.dashboard().show_history(sensor_id).await;
}

#[when("the operator exports")]
async fn operator_exports(world: &mut DashboardWorld) {
    let url = world.dashboard().export_url().await;
    world.export_url = Some(url);
}

#[then("no download is offered")]
fn no_download(world: &mut DashboardWorld) {
    let url = world.export_url.clone().expect("export was not attempted");
    assert_eq!(url, None);
}

#[then(expr = "the download points at {string}")]
fn download_points_at(world: &mut DashboardWorld, expected: String) {
    let url = world.export_url.clone().expect("export was not attempted");
    assert_eq!(url.as_deref(), Some(expected.as_str()));
}

#[then("the schedule list is reloaded exactly once")]
fn schedules_reloaded_once(world: &mut DashboardWorld) {
    let http = world.http();
    assert_eq!(http.count("GET", "/schedules"), 1, "calls: {:?}", http.calls());
    assert_eq!(http.calls().last().map(String::as_str), Some("GET /schedules"));
}

#[then("the sensor list is fetched again")]
fn sensor_list_refetched(world: &mut DashboardWorld) {
    assert_eq!(world.http().count("GET", "/sensors"), 1);
}

#[then("the sensor list is not fetched")]
fn sensor_list_not_refetched(world: &mut DashboardWorld) {
    assert_eq!(world.http().count("GET", "/sensors"), 0);
}
