//! BDD step definitions for moisture classification and summary figures

use cucumber::{given, then, when};

use irrigation_dashboard::backend::Sensor;
use irrigation_dashboard::moisture::MoistureStatus;
use irrigation_dashboard::state::{AppState, StateUpdate};
use irrigation_dashboard::view;

use crate::world::DashboardWorld;

#[when(expr = "a sensor reads {float} against a range of {float} to {float}")]
fn sensor_reads(world: &mut DashboardWorld, current: f64, min: f64, max: f64) {
    world.status = Some(MoistureStatus::classify(current, min, max));
}

#[when(expr = "a sensor with no crop reads {float}")]
fn sensor_without_crop_reads(world: &mut DashboardWorld, current: f64) {
    let sensor = Sensor {
        id: 1,
        crop_id: None,
        crop_name: None,
        current_moisture: current,
        min_moisture: None,
        max_moisture: None,
        water_amount: None,
        last_reading: None,
        description: None,
    };
    world.status = Some(MoistureStatus::for_sensor(&sensor));
}

#[then(expr = "its status is {string}")]
fn status_is(world: &mut DashboardWorld, expected: String) {
    let status = world.status.expect("no status classified");
    assert_eq!(status.as_str(), expected);
}

#[given(expr = "sensors reading {string}")]
fn sensors_reading(world: &mut DashboardWorld, readings: String) {
    world.sensor_readings = readings
        .split(',')
        .map(|r| r.trim().parse().expect("reading is not a number"))
        .collect();
}

#[given("no sensors")]
fn no_sensors(world: &mut DashboardWorld) {
    world.sensor_readings.clear();
}

#[when("the summary is computed")]
fn summary_computed(world: &mut DashboardWorld) {
    let sensors = world
        .sensor_readings
        .iter()
        .enumerate()
        .map(|(i, &m)| Sensor {
            id: i as i64 + 1,
            crop_id: None,
            crop_name: None,
            current_moisture: m,
            min_moisture: Some(60.0),
            max_moisture: Some(80.0),
            water_amount: Some(500),
            last_reading: None,
            description: None,
        })
        .collect();
    let mut state = AppState::new();
    state.apply(StateUpdate::Sensors(sensors));
    world.average_text = Some(view::dashboard(&state).summary.avg_moisture);
}

#[then(expr = "the average moisture shows {string}")]
fn average_shows(world: &mut DashboardWorld, expected: String) {
    assert_eq!(world.average_text.as_deref(), Some(expected.as_str()));
}
