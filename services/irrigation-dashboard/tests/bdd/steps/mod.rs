//! BDD step definitions for the irrigation dashboard

pub mod action_steps;
pub mod live_update_steps;
pub mod moisture_steps;
pub mod session_steps;
