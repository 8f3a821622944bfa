//! BDD step definitions for the live-update tick

use cucumber::{given, then, when};

use crate::common::sensors_json;
use crate::world::DashboardWorld;

#[given(expr = "the dashboard shows {int} sensors")]
async fn dashboard_shows_sensors(world: &mut DashboardWorld, count: usize) {
    let readings: Vec<f64> = (0..count).map(|i| 40.0 + i as f64).collect();
    let http = world.http();
    http.route("GET", "/sensors", 200, &sensors_json(&readings));
    world.dashboard().synchronizer().fetch_sensors().await;
    http.clear();
}

#[when("one live update tick runs")]
async fn one_tick(world: &mut DashboardWorld) {
    world.dashboard().synchronizer().refresh_all().await;
}

#[then(expr = "{int} per-sensor refreshes are issued in order before one sensor-list fetch")]
fn refreshes_then_fetch(world: &mut DashboardWorld, count: usize) {
    let calls = world.http().calls();
    let mut expected: Vec<String> = (1..=count)
        .map(|id| format!("GET /sensor/{}/moisture", id))
        .collect();
    expected.push("GET /sensors".to_string());
    expected.push("GET /stats".to_string());
    assert_eq!(calls, expected);
}
