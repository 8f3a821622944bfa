//! BDD step definitions for the session gate

use cucumber::{given, then, when};

use irrigation_dashboard::Gate;

use crate::common::{accept_login, reject_login};
use crate::world::DashboardWorld;

#[given("the backend accepts the credentials")]
fn backend_accepts(world: &mut DashboardWorld) {
    accept_login(&world.http());
}

#[given("the backend rejects the credentials")]
fn backend_rejects(world: &mut DashboardWorld) {
    reject_login(&world.http());
}

#[given("the operator is logged in")]
async fn operator_logged_in(world: &mut DashboardWorld) {
    let http = world.http();
    accept_login(&http);
    let dashboard = world.dashboard();
    dashboard
        .login("admin", "admin123")
        .await
        .expect("login failed");
    // Drop notices and requests from the login itself
    dashboard.snapshot().await;
    http.clear();
}

#[when(expr = "the operator logs in as {string} with password {string}")]
async fn operator_logs_in(world: &mut DashboardWorld, username: String, password: String) {
    let dashboard = world.dashboard();
    world.last_result = Some(dashboard.login(&username, &password).await);
}

#[when("the operator logs out")]
async fn operator_logs_out(world: &mut DashboardWorld) {
    world.dashboard().logout().await;
}

#[then("no request reaches the backend")]
fn no_request(world: &mut DashboardWorld) {
    let requests = world.http().requests();
    assert!(
        requests.is_empty(),
        "Expected no backend requests, got {:?}",
        requests
    );
}

#[then(expr = "exactly {int} request reaches the backend")]
fn exact_requests(world: &mut DashboardWorld, count: usize) {
    let calls = world.http().calls();
    assert_eq!(calls.len(), count, "Backend calls: {:?}", calls);
}

#[then("the login overlay is shown")]
async fn login_overlay_shown(world: &mut DashboardWorld) {
    assert_eq!(world.dashboard().check_login().await, Gate::LoginRequired);
}

#[then("the dashboard is shown")]
async fn dashboard_shown(world: &mut DashboardWorld) {
    assert_eq!(world.dashboard().check_login().await, Gate::Open);
}

#[then("the live update is running")]
async fn live_update_running(world: &mut DashboardWorld) {
    assert!(world.dashboard().is_live_updating().await);
}

#[then("the live update is stopped")]
async fn live_update_stopped(world: &mut DashboardWorld) {
    assert!(!world.dashboard().is_live_updating().await);
}

#[then(expr = "the operator sees the notice {string}")]
async fn operator_sees_notice(world: &mut DashboardWorld, message: String) {
    let notices = world.dashboard().snapshot().await.notices;
    assert!(
        notices.iter().any(|n| n.message == message),
        "Expected notice '{}', got {:?}",
        message,
        notices
    );
}
