use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZONTAL_FOV_DEG, DEFAULT_SCREEN_HEIGHT_PX, DEFAULT_SCREEN_WIDTH_PX};
use crate::error::MortarError;

/// A click position in screen pixels (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to another point, in pixels
    pub fn distance_to(self, other: Point2D) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Point shifted by `(dx, dy)` pixels
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        let v = self.to_vector() + Vector2::new(dx, dy);
        Point2D { x: v.x, y: v.y }
    }
}

/// Angular reference values derived from the screen resolution
///
/// The game uses Hor+ FOV scaling, so the vertical field of view follows from
/// the fixed horizontal FOV and the aspect ratio:
/// `tan(vfov / 2) = tan(hfov / 2) * height / width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenGeometry {
    pub width_px: f64,
    pub height_px: f64,
    pub horizontal_fov_deg: f64,
    /// Half of the vertical FOV: elevation of the top screen edge
    pub max_elevation_deg: f64,
    /// Pixel row of the crosshair
    pub center_y: f64,
}

impl ScreenGeometry {
    /// Derive the geometry for a resolution and horizontal field of view
    ///
    /// # Errors
    /// `InvalidGeometry` for non-positive or non-finite dimensions, or a
    /// field of view outside (0°, 180°).
    pub fn from_resolution(width_px: f64, height_px: f64, horizontal_fov_deg: f64) -> Result<Self, MortarError> {
        if !width_px.is_finite() || width_px <= 0.0 {
            return Err(MortarError::invalid_geometry(width_px, height_px, "width must be positive"));
        }
        if !height_px.is_finite() || height_px <= 0.0 {
            return Err(MortarError::invalid_geometry(width_px, height_px, "height must be positive"));
        }
        if !horizontal_fov_deg.is_finite() || horizontal_fov_deg <= 0.0 || horizontal_fov_deg >= 180.0 {
            return Err(MortarError::invalid_geometry(
                width_px,
                height_px,
                format!("horizontal FOV {}° outside (0, 180)", horizontal_fov_deg),
            ));
        }

        Ok(Self::derive(width_px, height_px, horizontal_fov_deg))
    }

    /// Unchecked derivation; inputs must already be validated
    fn derive(width_px: f64, height_px: f64, horizontal_fov_deg: f64) -> Self {
        let half_hfov_rad = horizontal_fov_deg.to_radians() / 2.0;
        let vertical_fov_rad = 2.0 * (half_hfov_rad.tan() * height_px / width_px).atan();

        ScreenGeometry {
            width_px,
            height_px,
            horizontal_fov_deg,
            max_elevation_deg: vertical_fov_rad.to_degrees() / 2.0,
            center_y: height_px / 2.0 - 1.0,
        }
    }

    /// Same resolution, default 80° horizontal FOV
    pub fn with_default_fov(width_px: f64, height_px: f64) -> Result<Self, MortarError> {
        Self::from_resolution(width_px, height_px, DEFAULT_HORIZONTAL_FOV_DEG)
    }

    /// Recompute for a new resolution, keeping the field of view
    pub fn resized(&self, width_px: f64, height_px: f64) -> Result<Self, MortarError> {
        Self::from_resolution(width_px, height_px, self.horizontal_fov_deg)
    }

    pub fn vertical_fov_deg(&self) -> f64 {
        self.max_elevation_deg * 2.0
    }
}

/// 2560x1440 at the stock 80° horizontal FOV
impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::derive(DEFAULT_SCREEN_WIDTH_PX, DEFAULT_SCREEN_HEIGHT_PX, DEFAULT_HORIZONTAL_FOV_DEG)
    }
}
