use log::debug;
use serde::Serialize;

use crate::constants::{DEFAULT_REFERENCE_METERS, MIN_CALIBRATION_PIXELS};
use crate::error::MortarError;
use crate::geometry::Point2D;

/// Meters-per-pixel scale of the map currently on screen
///
/// The factor is only handed out while the calibration is valid, so a stale or
/// zeroed factor can never be used for a distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Calibration {
    scale_factor: f64,
    valid: bool,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Meters per pixel, `None` until a calibration succeeded
    pub fn scale_factor(&self) -> Option<f64> {
        self.valid.then_some(self.scale_factor)
    }

    /// Calibrate from a reference segment of `reference_meters`
    ///
    /// On failure the previous calibration (valid or not) is left untouched.
    pub fn calibrate(&mut self, p1: Point2D, p2: Point2D, reference_meters: f64) -> Result<f64, MortarError> {
        let scale = compute_scale(p1, p2, reference_meters)?;
        self.scale_factor = scale;
        self.valid = true;
        debug!("calibrated: {:.6} m/px", scale);
        Ok(scale)
    }

    /// Drop the scale; the flag and the factor are cleared together
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Ground distance in meters between two clicks on the calibrated map
    pub fn measure(&self, p1: Point2D, p2: Point2D) -> Result<f64, MortarError> {
        let scale = self.scale_factor().ok_or(MortarError::Uncalibrated)?;
        Ok(p1.distance_to(p2) * scale)
    }
}

/// Meters per pixel for a segment of known length
///
/// # Errors
/// `DegenerateCalibration` when the clicks are less than
/// `MIN_CALIBRATION_PIXELS` apart or the reference length is not positive.
pub fn compute_scale(p1: Point2D, p2: Point2D, reference_meters: f64) -> Result<f64, MortarError> {
    let pixel_distance = p1.distance_to(p2);
    if !pixel_distance.is_finite() || pixel_distance < MIN_CALIBRATION_PIXELS {
        return Err(MortarError::DegenerateCalibration { pixel_distance });
    }
    if !reference_meters.is_finite() || reference_meters <= 0.0 {
        return Err(MortarError::DegenerateCalibration { pixel_distance });
    }

    Ok(reference_meters / pixel_distance)
}

/// `compute_scale` against the standard 100 m map grid square
pub fn compute_default_scale(p1: Point2D, p2: Point2D) -> Result<f64, MortarError> {
    compute_scale(p1, p2, DEFAULT_REFERENCE_METERS)
}
