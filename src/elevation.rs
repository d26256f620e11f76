use crate::error::MortarError;
use crate::geometry::{Point2D, ScreenGeometry};

/// Elevation angle (degrees) of the line of sight through a clicked pixel row
///
/// Screen-space offsets are tangent-projected, so the row offset is scaled
/// against `tan(max_elevation)` and mapped back through `atan`. A linear
/// pixel-to-degree mapping drifts further off the closer the click is to the
/// screen edge.
///
/// Positive above the crosshair, negative below.
///
/// # Errors
/// `InvalidGeometry` when the screen center row is not positive.
pub fn estimate(geometry: &ScreenGeometry, point: Point2D) -> Result<f64, MortarError> {
    if geometry.center_y <= 0.0 {
        return Err(MortarError::invalid_geometry(
            geometry.width_px,
            geometry.height_px,
            "screen center row must be positive",
        ));
    }

    let delta_y = geometry.center_y - point.y;
    let tan_per_pixel = geometry.max_elevation_deg.to_radians().tan() / geometry.center_y;

    Ok((delta_y * tan_per_pixel).atan().to_degrees())
}
