//! Settings for a measurement session
//!
//! All fields have defaults matching the game's stock setup, so a config file
//! only needs to list what differs, e.g. `{"screen_width_px": 1920,
//! "screen_height_px": 1080}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HORIZONTAL_FOV_DEG, DEFAULT_MAX_RANGE_M, DEFAULT_REFERENCE_METERS,
    DEFAULT_RESULT_PROMPT_MS, DEFAULT_SCREEN_HEIGHT_PX, DEFAULT_SCREEN_WIDTH_PX,
};
use crate::error::MortarError;
use crate::geometry::ScreenGeometry;
use crate::solver::BallisticSolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MortarConfig {
    pub screen_width_px: f64,
    pub screen_height_px: f64,
    pub horizontal_fov_deg: f64,
    pub max_range_m: f64,
    /// Real length of the segment clicked during calibration
    pub reference_meters: f64,
    /// Auto-close hint for result prompts
    pub result_prompt_ms: u64,
}

impl Default for MortarConfig {
    fn default() -> Self {
        Self {
            screen_width_px: DEFAULT_SCREEN_WIDTH_PX,
            screen_height_px: DEFAULT_SCREEN_HEIGHT_PX,
            horizontal_fov_deg: DEFAULT_HORIZONTAL_FOV_DEG,
            max_range_m: DEFAULT_MAX_RANGE_M,
            reference_meters: DEFAULT_REFERENCE_METERS,
            result_prompt_ms: DEFAULT_RESULT_PROMPT_MS,
        }
    }
}

impl MortarConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MortarError> {
        let config: MortarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MortarError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        log::debug!("loading config from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Check value ranges the geometry and solver cannot recover from
    pub fn validate(&self) -> Result<(), MortarError> {
        self.geometry()?;
        if !self.max_range_m.is_finite() || self.max_range_m <= 0.0 {
            return Err(format!("max_range_m must be positive, got {}", self.max_range_m).into());
        }
        if !self.reference_meters.is_finite() || self.reference_meters <= 0.0 {
            return Err(format!("reference_meters must be positive, got {}", self.reference_meters).into());
        }
        Ok(())
    }

    pub fn geometry(&self) -> Result<ScreenGeometry, MortarError> {
        ScreenGeometry::from_resolution(self.screen_width_px, self.screen_height_px, self.horizontal_fov_deg)
    }

    pub fn solver(&self) -> BallisticSolver {
        BallisticSolver::new(self.max_range_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MortarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geometry().unwrap().center_y, 719.0);
        assert_eq!(config.solver().max_range_m, 700.0);
    }

    #[test]
    fn test_partial_json() {
        let config = MortarConfig::from_json_str(r#"{"screen_width_px": 1920, "screen_height_px": 1080}"#).unwrap();
        assert_eq!(config.screen_height_px, 1080.0);
        assert_eq!(config.horizontal_fov_deg, 80.0);
        assert_eq!(config.result_prompt_ms, 3000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            MortarConfig::from_json_str(r#"{"max_range_m": 0}"#),
            Err(MortarError::Config(_))
        ));
        assert!(matches!(
            MortarConfig::from_json_str(r#"{"screen_height_px": -5}"#),
            Err(MortarError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            MortarConfig::from_json_str(r#"{"fov": 90}"#),
            Err(MortarError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_range_m": 500, "reference_meters": 50}}"#).unwrap();

        let config = MortarConfig::load(file.path()).unwrap();
        assert_eq!(config.max_range_m, 500.0);
        assert_eq!(config.reference_meters, 50.0);

        assert!(matches!(
            MortarConfig::load(file.path().with_extension("missing")),
            Err(MortarError::Io(_))
        ));
    }
}
