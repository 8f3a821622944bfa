//! Moisture classification and summary figures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::Sensor;

/// Below this fraction of the minimum a dry sensor counts as critical
pub const CRITICAL_FRACTION: f64 = 0.7;

/// Health of a sensor's soil moisture relative to its crop's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoistureStatus {
    Optimal,
    Low,
    Critical,
    /// No crop assigned, so there is no range to judge against
    Unassigned,
}

impl MoistureStatus {
    /// Classify a reading against a `[min, max]` range.
    ///
    /// Readings above `max` are reported as optimal; there is no "high"
    /// status.
    pub fn classify(current: f64, min: f64, max: f64) -> Self {
        if current >= min && current <= max {
            return MoistureStatus::Optimal;
        }
        if current < min {
            if current < min * CRITICAL_FRACTION {
                return MoistureStatus::Critical;
            }
            return MoistureStatus::Low;
        }
        MoistureStatus::Optimal
    }

    pub fn for_sensor(sensor: &Sensor) -> Self {
        match sensor.moisture_range() {
            Some((min, max)) => Self::classify(sensor.current_moisture, min, max),
            None => MoistureStatus::Unassigned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoistureStatus::Optimal => "optimal",
            MoistureStatus::Low => "low",
            MoistureStatus::Critical => "critical",
            MoistureStatus::Unassigned => "unassigned",
        }
    }

    /// Upper-case badge text
    pub fn label(&self) -> &'static str {
        match self {
            MoistureStatus::Optimal => "OPTIMAL",
            MoistureStatus::Low => "LOW",
            MoistureStatus::Critical => "CRITICAL",
            MoistureStatus::Unassigned => "NO CROP",
        }
    }
}

impl fmt::Display for MoistureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour band of the moisture fill bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillLevel {
    Low,
    Medium,
    Full,
    Unknown,
}

impl FillLevel {
    pub fn of(current: f64, min: f64, max: f64) -> Self {
        if current < min {
            FillLevel::Low
        } else if current < max {
            FillLevel::Medium
        } else {
            FillLevel::Full
        }
    }

    pub fn for_sensor(sensor: &Sensor) -> Self {
        match sensor.moisture_range() {
            Some((min, max)) => Self::of(sensor.current_moisture, min, max),
            None => FillLevel::Unknown,
        }
    }

    /// CSS modifier class; the full band uses the base style
    pub fn css_class(&self) -> &'static str {
        match self {
            FillLevel::Low => "low",
            FillLevel::Medium => "medium",
            FillLevel::Full => "",
            FillLevel::Unknown => "unknown",
        }
    }
}

/// Arithmetic mean of `current_moisture`, `None` for an empty snapshot
pub fn average_moisture(sensors: &[Sensor]) -> Option<f64> {
    if sensors.is_empty() {
        return None;
    }
    let total: f64 = sensors.iter().map(|s| s.current_moisture).sum();
    Some(total / sensors.len() as f64)
}

/// One-decimal percentage, `—` when there is nothing to show
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) if value.is_finite() => format!("{:.1}", value),
        _ => "\u{2014}".to_string(),
    }
}
