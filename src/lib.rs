//! # Mortar Sight
//!
//! Turns a handful of screen clicks into a mortar range-dial setting: a 100 m
//! map segment gives the pixel scale, two map clicks give the ground distance,
//! one click on the target in the world view gives the elevation, and a
//! closed-form solver maps (elevation, distance) to the dial value.

// Re-export the main types and functions
pub use calibration::{compute_default_scale, compute_scale, Calibration};
pub use config::MortarConfig;
pub use elevation::estimate as estimate_elevation;
pub use error::MortarError;
pub use geometry::{Point2D, ScreenGeometry};
pub use readout::{MeasurementResult, StatusReadout};
pub use runner::{dispatch, run_session, DisplaySink};
pub use session::{DisplayCommand, MeasurementSession, MeasurementState, SessionEvent};
pub use solver::{solve_range_setting, BallisticSolver, NoSolution};

// Module declarations
pub mod calibration;
pub mod config;
pub mod constants;
pub mod elevation;
mod error;
pub mod geometry;
pub mod readout;
pub mod runner;
pub mod session;
pub mod solver;
