use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RANGE_M, LEVEL_ELEVATION_THRESHOLD_DEG};

/// Target lies outside the weapon envelope
///
/// This is an ordinary outcome of `solve`, not a failure of the solver; it is
/// kept as a distinct type so callers cannot mistake it for a range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoSolution {
    pub elevation_deg: f64,
    pub horizontal_distance_m: f64,
    /// Discriminant of the range equation: negative, or NaN for non-finite input
    pub delta: f64,
}

impl fmt::Display for NoSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "no range setting reaches {:.1} m at {:.2}° elevation",
            self.horizontal_distance_m, self.elevation_deg
        )
    }
}

impl Error for NoSolution {}

/// Closed-form range-dial solver for a weapon with a fixed maximum range
///
/// The dial value `R` is the range whose maximum-range arc passes through a
/// target seen at elevation `β` and ground distance `L`:
///
/// ```text
/// R = (L + tan β · (M − √(M² − 2·L·M·tan β − L²))) / (tan² β + 1)
/// ```
///
/// with `M` the maximum range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticSolver {
    pub max_range_m: f64,
}

impl Default for BallisticSolver {
    fn default() -> Self {
        BallisticSolver {
            max_range_m: DEFAULT_MAX_RANGE_M,
        }
    }
}

impl BallisticSolver {
    pub fn new(max_range_m: f64) -> Self {
        BallisticSolver { max_range_m }
    }

    /// Range-dial setting for a target, see `solve_range_setting`
    pub fn solve(&self, elevation_deg: f64, horizontal_distance_m: f64) -> Result<f64, NoSolution> {
        solve_range_setting(elevation_deg, horizontal_distance_m, self.max_range_m)
    }

    /// Largest ground distance still inside the envelope at this elevation
    ///
    /// This is the positive root of `delta = 0`. On level ground it is simply
    /// the maximum range.
    pub fn envelope_limit(&self, elevation_deg: f64) -> f64 {
        let m = self.max_range_m;
        if elevation_deg.abs() < LEVEL_ELEVATION_THRESHOLD_DEG {
            return m;
        }
        let tan_beta = elevation_deg.to_radians().tan();
        m * ((tan_beta * tan_beta + 1.0).sqrt() - tan_beta)
    }
}

/// Solve the range equation for one target
///
/// # Arguments
/// * `elevation_deg` - Elevation of the target seen from the firing point, degrees (negative below)
/// * `horizontal_distance_m` - Ground distance to the target in meters
/// * `max_range_m` - Maximum range of the weapon in meters
///
/// # Returns
/// * The dial setting in meters, or `NoSolution` when the discriminant is
///   negative or any input is NaN or infinite
pub fn solve_range_setting(
    elevation_deg: f64,
    horizontal_distance_m: f64,
    max_range_m: f64,
) -> Result<f64, NoSolution> {
    if !elevation_deg.is_finite() || !horizontal_distance_m.is_finite() || !max_range_m.is_finite() {
        return Err(NoSolution {
            elevation_deg,
            horizontal_distance_m,
            delta: f64::NAN,
        });
    }

    // Same height as the firing point: dial the ground distance
    if elevation_deg.abs() < LEVEL_ELEVATION_THRESHOLD_DEG {
        return Ok(horizontal_distance_m);
    }

    let tan_beta = elevation_deg.to_radians().tan();
    let m = max_range_m;
    let l = horizontal_distance_m;

    let delta = m * m - 2.0 * l * m * tan_beta - l * l;
    if delta < 0.0 {
        return Err(NoSolution {
            elevation_deg,
            horizontal_distance_m,
            delta,
        });
    }

    let intermediate = m - delta.sqrt();
    Ok((l + tan_beta * intermediate) / (tan_beta * tan_beta + 1.0))
}
