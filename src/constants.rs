//! Fixed defaults used by the range-finder calculations

/// Horizontal field of view of the game camera, in degrees
///
/// The game uses Hor+ scaling: the horizontal FOV is fixed and the vertical
/// FOV follows from the aspect ratio.
pub const DEFAULT_HORIZONTAL_FOV_DEG: f64 = 80.0;

/// Maximum range of the mortar in meters
///
/// The range dial is expressed relative to the arc the weapon flies at this
/// range; see `BallisticSolver`.
pub const DEFAULT_MAX_RANGE_M: f64 = 700.0;

/// Length of the map grid segment clicked during calibration, in meters
pub const DEFAULT_REFERENCE_METERS: f64 = 100.0;

/// Elevations smaller than this (degrees) are treated as level ground
pub const LEVEL_ELEVATION_THRESHOLD_DEG: f64 = 0.001;

/// Shortest calibration segment accepted, in pixels
///
/// Two clicks closer than this are considered the same point. Anything below
/// one pixel cannot come from a real click pair anyway.
pub const MIN_CALIBRATION_PIXELS: f64 = 1e-6;

/// Auto-close hint attached to result prompts, in milliseconds
pub const DEFAULT_RESULT_PROMPT_MS: u64 = 3000;

/// Default screen resolution (the resolution the tool was tuned on)
pub const DEFAULT_SCREEN_WIDTH_PX: f64 = 2560.0;
pub const DEFAULT_SCREEN_HEIGHT_PX: f64 = 1440.0;
