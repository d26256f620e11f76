//! Error type shared by the geometry, calibration and configuration code

use std::error::Error;
use std::fmt;
use std::io;

/// Recoverable failures of the range-finder core
///
/// None of these are fatal: the session reports them to the display and keeps
/// its previous geometry or calibration. An out-of-envelope target is not an
/// error at all, see `NoSolution`.
#[derive(Debug)]
pub enum MortarError {
    /// Non-positive resolution, bad field of view or a degenerate screen center
    InvalidGeometry { width_px: f64, height_px: f64, reason: String },
    /// The two calibration clicks (nearly) coincide
    DegenerateCalibration { pixel_distance: f64 },
    /// A pixel distance was requested before any valid calibration
    Uncalibrated,
    /// Configuration file could not be interpreted
    Config(String),
    /// Reading a configuration or script file failed
    Io(io::Error),
}

impl MortarError {
    pub(crate) fn invalid_geometry(width_px: f64, height_px: f64, reason: impl Into<String>) -> Self {
        MortarError::InvalidGeometry {
            width_px,
            height_px,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MortarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MortarError::InvalidGeometry { width_px, height_px, reason } => {
                write!(f, "invalid screen geometry {}x{}: {}", width_px, height_px, reason)
            }
            MortarError::DegenerateCalibration { pixel_distance } => {
                write!(f, "calibration points coincide ({:.3} px apart)", pixel_distance)
            }
            MortarError::Uncalibrated => write!(f, "no valid 100 m scale has been set"),
            MortarError::Config(msg) => write!(f, "configuration error: {}", msg),
            MortarError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for MortarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MortarError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MortarError {
    fn from(err: io::Error) -> Self {
        MortarError::Io(err)
    }
}

impl From<serde_json::Error> for MortarError {
    fn from(err: serde_json::Error) -> Self {
        MortarError::Config(err.to_string())
    }
}

impl From<String> for MortarError {
    fn from(msg: String) -> Self {
        MortarError::Config(msg)
    }
}

impl From<&str> for MortarError {
    fn from(msg: &str) -> Self {
        MortarError::Config(msg.to_string())
    }
}
