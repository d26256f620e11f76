//! Text fields shown by a status display next to the overlay prompts

use serde::Serialize;

use crate::solver::NoSolution;

/// Placeholder shown for values that have not been measured yet
pub const EMPTY_FIELD: &str = "--";

pub const NO_SOLUTION_TEXT: &str = "No solution";

/// Outcome of the last completed measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementResult {
    /// Range-dial setting in meters
    Range(f64),
    NoSolution(NoSolution),
}

impl MeasurementResult {
    pub fn range_m(&self) -> Option<f64> {
        match self {
            MeasurementResult::Range(r) => Some(*r),
            MeasurementResult::NoSolution(_) => None,
        }
    }
}

impl From<Result<f64, NoSolution>> for MeasurementResult {
    fn from(result: Result<f64, NoSolution>) -> Self {
        match result {
            Ok(range) => MeasurementResult::Range(range),
            Err(no_solution) => MeasurementResult::NoSolution(no_solution),
        }
    }
}

/// Snapshot of everything a status panel displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReadout {
    pub status_text: String,
    pub horizontal_distance_text: String,
    pub elevation_angle_text: String,
    pub result_text: String,
    pub listening: bool,
}

pub fn format_distance(distance_m: Option<f64>) -> String {
    distance_m.map_or_else(|| EMPTY_FIELD.to_string(), |d| format!("{:.1} m", d))
}

pub fn format_elevation(elevation_deg: Option<f64>) -> String {
    elevation_deg.map_or_else(|| EMPTY_FIELD.to_string(), |e| format!("{:.2}°", e))
}

pub fn format_result(result: Option<&MeasurementResult>) -> String {
    match result {
        Some(MeasurementResult::Range(r)) => format!("{:.0} m", r),
        Some(MeasurementResult::NoSolution(_)) => NO_SOLUTION_TEXT.to_string(),
        None => EMPTY_FIELD.to_string(),
    }
}
