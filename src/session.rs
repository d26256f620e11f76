//! Measurement protocol
//!
//! A full measurement takes five clicks: two on a 100 m map grid segment
//! (scale), two on the map for firing point and target (distance) and one on
//! the target in the world view (elevation). Quick measurement skips the scale
//! clicks once a calibration exists.
//!
//! `MeasurementSession::handle` is the whole transition function: it applies
//! one event to the session and returns the display commands it produced.
//! Events must be handled one at a time; see `runner` for a channel-driven
//! loop.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::config::MortarConfig;
use crate::elevation;
use crate::error::MortarError;
use crate::geometry::{Point2D, ScreenGeometry};
use crate::readout::{self, MeasurementResult, StatusReadout};
use crate::solver::BallisticSolver;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_PAUSED: &str = "Paused";
pub const STATUS_COMPLETE: &str = "Measurement complete";

/// Step of the measurement protocol, named after the click it waits for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementState {
    #[default]
    Idle,
    ScalePoint1,
    ScalePoint2,
    DistancePoint1,
    DistancePoint2,
    ElevationPoint,
}

/// Input raised by the input-capture side (and the display, for dismissals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Begin a full measurement, starting with the scale
    Start,
    /// Re-measure with the current scale, or cancel the open prompt
    QuickMeasure,
    PointCaptured { x: f64, y: f64 },
    /// Abandon the current cycle; the scale is kept
    Reset,
    ResizeGeometry { width_px: f64, height_px: f64 },
    /// Forget the scale
    ClearCalibration,
    /// The display closed a prompt on its own (timer or user)
    PromptDismissed,
    SetListening { listening: bool },
}

/// Instruction for the overlay display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayCommand {
    ShowPrompt {
        text: String,
        /// Hint only: the display may close the prompt after this long
        auto_close_ms: Option<u64>,
    },
    ClosePrompt,
}

/// Prompt asking for the click a state waits for
pub fn step_prompt(state: MeasurementState, horizontal_distance_m: Option<f64>) -> String {
    match state {
        MeasurementState::Idle => STATUS_READY.to_string(),
        MeasurementState::ScalePoint1 => "Set 100 m scale: first point".to_string(),
        MeasurementState::ScalePoint2 => "Set 100 m scale: second point".to_string(),
        MeasurementState::DistancePoint1 => "Measure distance: first point (your position)".to_string(),
        MeasurementState::DistancePoint2 => "Measure distance: second point (target position)".to_string(),
        MeasurementState::ElevationPoint => format!(
            "Horizontal distance: {}\nSet elevation: aim at the target and click",
            readout::format_distance(horizontal_distance_m)
        ),
    }
}

#[derive(Debug, Clone)]
pub struct MeasurementSession {
    state: MeasurementState,
    pending_point: Option<Point2D>,
    calibration: Calibration,
    geometry: ScreenGeometry,
    solver: BallisticSolver,
    reference_meters: f64,
    result_prompt_ms: u64,
    last_horizontal_distance_m: Option<f64>,
    last_elevation_deg: Option<f64>,
    last_result: Option<MeasurementResult>,
    prompt_active: bool,
    listening: bool,
    status: String,
}

impl MeasurementSession {
    pub fn new(config: &MortarConfig) -> Result<Self, MortarError> {
        config.validate()?;
        Ok(Self::with_parts(
            config.geometry()?,
            config.solver(),
            config.reference_meters,
            config.result_prompt_ms,
        ))
    }

    pub fn with_parts(
        geometry: ScreenGeometry,
        solver: BallisticSolver,
        reference_meters: f64,
        result_prompt_ms: u64,
    ) -> Self {
        MeasurementSession {
            state: MeasurementState::Idle,
            pending_point: None,
            calibration: Calibration::new(),
            geometry,
            solver,
            reference_meters,
            result_prompt_ms,
            last_horizontal_distance_m: None,
            last_elevation_deg: None,
            last_result: None,
            prompt_active: false,
            listening: true,
            status: STATUS_READY.to_string(),
        }
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    pub fn pending_point(&self) -> Option<Point2D> {
        self.pending_point
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    pub fn solver(&self) -> &BallisticSolver {
        &self.solver
    }

    pub fn last_horizontal_distance_m(&self) -> Option<f64> {
        self.last_horizontal_distance_m
    }

    pub fn last_elevation_deg(&self) -> Option<f64> {
        self.last_elevation_deg
    }

    pub fn last_result(&self) -> Option<&MeasurementResult> {
        self.last_result.as_ref()
    }

    pub fn prompt_active(&self) -> bool {
        self.prompt_active
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn readout(&self) -> StatusReadout {
        StatusReadout {
            status_text: self.status.clone(),
            horizontal_distance_text: readout::format_distance(self.last_horizontal_distance_m),
            elevation_angle_text: readout::format_elevation(self.last_elevation_deg),
            result_text: readout::format_result(self.last_result.as_ref()),
            listening: self.listening,
        }
    }

    /// Apply one event and return the display commands it produced
    pub fn handle(&mut self, event: SessionEvent) -> Vec<DisplayCommand> {
        let mut out = Vec::new();
        let before = self.state;

        match event {
            SessionEvent::SetListening { listening } => self.set_listening(listening),
            SessionEvent::Reset => self.reset(&mut out),
            SessionEvent::ResizeGeometry { width_px, height_px } => self.resize(width_px, height_px, &mut out),
            SessionEvent::ClearCalibration => {
                self.calibration.invalidate();
                info!("calibration cleared");
            }
            SessionEvent::PromptDismissed => self.prompt_active = false,
            _ if !self.listening => debug!("paused, ignoring {:?}", event),
            SessionEvent::Start => self.start(&mut out),
            SessionEvent::QuickMeasure => self.quick_measure(&mut out),
            SessionEvent::PointCaptured { x, y } => self.point_captured(Point2D::new(x, y), &mut out),
        }

        if before != self.state {
            debug!("{:?} -> {:?} on {:?}", before, self.state, event);
        }
        out
    }

    fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
        let status = if listening { STATUS_READY } else { STATUS_PAUSED };
        self.status = status.to_string();
    }

    fn reset(&mut self, out: &mut Vec<DisplayCommand>) {
        self.state = MeasurementState::Idle;
        self.pending_point = None;
        self.clear_results();
        self.close_prompt(out);
        if self.listening {
            self.status = STATUS_READY.to_string();
        }
    }

    fn resize(&mut self, width_px: f64, height_px: f64, out: &mut Vec<DisplayCommand>) {
        match self.geometry.resized(width_px, height_px) {
            Ok(geometry) => {
                info!(
                    "screen geometry {}x{}: max elevation {:.2}°, center row {}",
                    width_px, height_px, geometry.max_elevation_deg, geometry.center_y
                );
                self.geometry = geometry;
            }
            Err(err) => {
                warn!("keeping previous geometry: {}", err);
                self.report_error(&err, out);
            }
        }
    }

    fn start(&mut self, out: &mut Vec<DisplayCommand>) {
        self.pending_point = None;
        self.clear_results();
        self.advance(MeasurementState::ScalePoint1, out);
    }

    fn quick_measure(&mut self, out: &mut Vec<DisplayCommand>) {
        if self.prompt_active {
            self.pending_point = None;
            self.state = MeasurementState::Idle;
            self.close_prompt(out);
            self.status = STATUS_READY.to_string();
            return;
        }
        if self.state != MeasurementState::Idle {
            debug!("quick measure ignored in {:?} without an open prompt", self.state);
            return;
        }

        if self.calibration.is_valid() {
            self.pending_point = None;
            self.advance(MeasurementState::DistancePoint1, out);
        } else {
            self.start(out);
        }
    }

    fn point_captured(&mut self, point: Point2D, out: &mut Vec<DisplayCommand>) {
        match self.state {
            MeasurementState::Idle => debug!("stray click at ({}, {}) while idle", point.x, point.y),
            MeasurementState::ScalePoint1 | MeasurementState::DistancePoint1 => {
                self.pending_point = Some(point);
                let next = if self.state == MeasurementState::ScalePoint1 {
                    MeasurementState::ScalePoint2
                } else {
                    MeasurementState::DistancePoint2
                };
                self.advance(next, out);
            }
            MeasurementState::ScalePoint2 => self.finish_scale(point, out),
            MeasurementState::DistancePoint2 => self.finish_distance(point, out),
            MeasurementState::ElevationPoint => self.finish_elevation(point, out),
        }
    }

    fn finish_scale(&mut self, point: Point2D, out: &mut Vec<DisplayCommand>) {
        let Some(first) = self.pending_point.take() else {
            return;
        };

        self.state = MeasurementState::DistancePoint1;
        match self.calibration.calibrate(first, point, self.reference_meters) {
            Ok(scale) => {
                info!("scale set: {:.4} m/px", scale);
                self.show_prompt(step_prompt(self.state, None), None, out);
            }
            Err(err) => {
                warn!("calibration rejected: {}", err);
                let kept = if self.calibration.is_valid() {
                    "keeping previous scale"
                } else {
                    "no scale set"
                };
                let text = format!("{}, {}\n{}", err, kept, step_prompt(self.state, None));
                self.show_prompt(text, None, out);
            }
        }
    }

    fn finish_distance(&mut self, point: Point2D, out: &mut Vec<DisplayCommand>) {
        let Some(first) = self.pending_point.take() else {
            return;
        };

        match self.calibration.measure(first, point) {
            Ok(distance) => {
                self.last_horizontal_distance_m = Some(distance);
                self.advance(MeasurementState::ElevationPoint, out);
            }
            Err(err) => {
                warn!("cannot measure distance: {}", err);
                self.state = MeasurementState::ScalePoint1;
                let text = format!("{}\n{}", err, step_prompt(self.state, None));
                self.show_prompt(text, None, out);
            }
        }
    }

    fn finish_elevation(&mut self, point: Point2D, out: &mut Vec<DisplayCommand>) {
        self.state = MeasurementState::Idle;
        self.pending_point = None;

        let elevation_deg = match elevation::estimate(&self.geometry, point) {
            Ok(angle) => angle,
            Err(err) => {
                warn!("cannot estimate elevation: {}", err);
                self.clear_results();
                self.report_error(&err, out);
                return;
            }
        };
        self.last_elevation_deg = Some(elevation_deg);

        // Only reachable after DistancePoint2 stored a distance
        let distance = self.last_horizontal_distance_m.unwrap_or_default();
        let result = MeasurementResult::from(self.solver.solve(elevation_deg, distance));
        self.last_result = Some(result);

        let text = match result {
            MeasurementResult::Range(range) => {
                info!(
                    "range setting {:.1} m (distance {:.1} m, elevation {:.2}°)",
                    range, distance, elevation_deg
                );
                format!("Mortar distance: {:.0} m", range)
            }
            MeasurementResult::NoSolution(no_solution) => {
                info!("{}", no_solution);
                "No solution - target out of range".to_string()
            }
        };
        self.show_prompt(text, Some(self.result_prompt_ms), out);
        self.status = STATUS_COMPLETE.to_string();
    }

    /// Move to `next` and ask for its click
    fn advance(&mut self, next: MeasurementState, out: &mut Vec<DisplayCommand>) {
        self.state = next;
        let text = step_prompt(next, self.last_horizontal_distance_m);
        self.show_prompt(text, None, out);
    }

    /// Show an error; mid-cycle the current step prompt is repeated under it
    fn report_error(&mut self, err: &MortarError, out: &mut Vec<DisplayCommand>) {
        if self.state == MeasurementState::Idle {
            self.show_prompt(err.to_string(), Some(self.result_prompt_ms), out);
        } else {
            let text = format!("{}\n{}", err, step_prompt(self.state, self.last_horizontal_distance_m));
            self.show_prompt(text, None, out);
        }
    }

    /// Prompts with an auto-close hint are notices, not requests for input
    fn show_prompt(&mut self, text: String, auto_close_ms: Option<u64>, out: &mut Vec<DisplayCommand>) {
        self.status = text.lines().next().unwrap_or_default().to_string();
        self.prompt_active = auto_close_ms.is_none();
        out.push(DisplayCommand::ShowPrompt { text, auto_close_ms });
    }

    fn close_prompt(&mut self, out: &mut Vec<DisplayCommand>) {
        self.prompt_active = false;
        out.push(DisplayCommand::ClosePrompt);
    }

    fn clear_results(&mut self) {
        self.last_horizontal_distance_m = None;
        self.last_elevation_deg = None;
        self.last_result = None;
    }
}

impl Default for MeasurementSession {
    fn default() -> Self {
        let config = MortarConfig::default();
        Self::with_parts(
            ScreenGeometry::default(),
            config.solver(),
            config.reference_meters,
            config.result_prompt_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(x: f64, y: f64) -> SessionEvent {
        SessionEvent::PointCaptured { x, y }
    }

    fn prompt_text(commands: &[DisplayCommand]) -> Option<&str> {
        commands.iter().rev().find_map(|c| match c {
            DisplayCommand::ShowPrompt { text, .. } => Some(text.as_str()),
            DisplayCommand::ClosePrompt => None,
        })
    }

    fn calibrated_session() -> MeasurementSession {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        session.handle(click(1000.0, 719.0));
        session.handle(click(1100.0, 719.0));
        session.handle(SessionEvent::Reset);
        session
    }

    #[test]
    fn test_default_uses_stock_geometry() {
        let session = MeasurementSession::default();
        let configured = MeasurementSession::new(&MortarConfig::default()).unwrap();
        assert_eq!(session.geometry(), configured.geometry());
        assert!((session.geometry().max_elevation_deg - 25.267).abs() < 0.001);
    }

    #[test]
    fn test_initial_state() {
        let session = MeasurementSession::default();
        assert_eq!(session.state(), MeasurementState::Idle);
        assert!(!session.calibration().is_valid());
        assert!(!session.prompt_active());
        assert_eq!(session.readout().result_text, "--");
        assert_eq!(session.status(), STATUS_READY);
    }

    #[test]
    fn test_full_cycle_prompts() {
        let mut session = MeasurementSession::default();

        let out = session.handle(SessionEvent::Start);
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
        assert_eq!(prompt_text(&out), Some("Set 100 m scale: first point"));

        let out = session.handle(click(1000.0, 719.0));
        assert_eq!(session.state(), MeasurementState::ScalePoint2);
        assert_eq!(session.pending_point(), Some(Point2D::new(1000.0, 719.0)));
        assert_eq!(prompt_text(&out), Some("Set 100 m scale: second point"));

        let out = session.handle(click(1100.0, 719.0));
        assert_eq!(session.state(), MeasurementState::DistancePoint1);
        assert_eq!(session.pending_point(), None);
        assert_eq!(session.calibration().scale_factor(), Some(1.0));
        assert!(prompt_text(&out).unwrap().starts_with("Measure distance: first point"));

        session.handle(click(0.0, 719.0));
        assert_eq!(session.state(), MeasurementState::DistancePoint2);

        let out = session.handle(click(250.0, 719.0));
        assert_eq!(session.state(), MeasurementState::ElevationPoint);
        assert_eq!(session.last_horizontal_distance_m(), Some(250.0));
        assert!(prompt_text(&out).unwrap().starts_with("Horizontal distance: 250.0 m\n"));
        assert_eq!(session.status(), "Horizontal distance: 250.0 m");

        let out = session.handle(click(1280.0, 719.0));
        assert_eq!(session.state(), MeasurementState::Idle);
        assert_eq!(session.last_result(), Some(&MeasurementResult::Range(250.0)));
        assert_eq!(
            out,
            vec![DisplayCommand::ShowPrompt {
                text: "Mortar distance: 250 m".to_string(),
                auto_close_ms: Some(3000),
            }]
        );
        assert!(!session.prompt_active());
        assert_eq!(session.status(), STATUS_COMPLETE);

        let readout = session.readout();
        assert_eq!(readout.horizontal_distance_text, "250.0 m");
        assert_eq!(readout.elevation_angle_text, "0.00°");
        assert_eq!(readout.result_text, "250 m");
    }

    #[test]
    fn test_stray_click_while_idle_ignored() {
        let mut session = MeasurementSession::default();
        let out = session.handle(click(10.0, 10.0));
        assert!(out.is_empty());
        assert_eq!(session.state(), MeasurementState::Idle);
        assert_eq!(session.pending_point(), None);
    }

    #[test]
    fn test_quick_measure_without_calibration_is_start() {
        let mut quick = MeasurementSession::default();
        let mut full = MeasurementSession::default();

        let quick_out = quick.handle(SessionEvent::QuickMeasure);
        let full_out = full.handle(SessionEvent::Start);

        assert_eq!(quick.state(), MeasurementState::ScalePoint1);
        assert_eq!(quick.state(), full.state());
        assert_eq!(quick_out, full_out);
    }

    #[test]
    fn test_quick_measure_with_calibration_skips_scale() {
        let mut session = calibrated_session();
        assert!(session.calibration().is_valid());

        let out = session.handle(SessionEvent::QuickMeasure);
        assert_eq!(session.state(), MeasurementState::DistancePoint1);
        assert!(prompt_text(&out).unwrap().starts_with("Measure distance"));
    }

    #[test]
    fn test_quick_measure_cancels_open_prompt() {
        let mut session = calibrated_session();
        session.handle(SessionEvent::QuickMeasure);
        session.handle(click(5.0, 5.0));
        assert_eq!(session.state(), MeasurementState::DistancePoint2);
        assert!(session.prompt_active());

        let out = session.handle(SessionEvent::QuickMeasure);
        assert_eq!(out, vec![DisplayCommand::ClosePrompt]);
        assert_eq!(session.state(), MeasurementState::Idle);
        assert_eq!(session.pending_point(), None);
        assert!(!session.prompt_active());
        assert!(session.calibration().is_valid());
    }

    #[test]
    fn test_quick_measure_after_result_starts_again() {
        let mut session = calibrated_session();
        session.handle(SessionEvent::QuickMeasure);
        session.handle(click(0.0, 719.0));
        session.handle(click(300.0, 719.0));
        session.handle(click(0.0, 719.0));
        assert_eq!(session.state(), MeasurementState::Idle);

        // The result notice auto-closes, so it does not count as an open prompt
        session.handle(SessionEvent::QuickMeasure);
        assert_eq!(session.state(), MeasurementState::DistancePoint1);
    }

    #[test]
    fn test_reset_keeps_calibration() {
        let mut session = calibrated_session();
        session.handle(SessionEvent::QuickMeasure);
        session.handle(click(0.0, 0.0));

        let out = session.handle(SessionEvent::Reset);
        assert_eq!(out, vec![DisplayCommand::ClosePrompt]);
        assert_eq!(session.state(), MeasurementState::Idle);
        assert_eq!(session.pending_point(), None);
        assert_eq!(session.calibration().scale_factor(), Some(1.0));
        assert_eq!(session.readout().horizontal_distance_text, "--");
    }

    #[test]
    fn test_clear_calibration() {
        let mut session = calibrated_session();
        session.handle(SessionEvent::ClearCalibration);
        assert!(!session.calibration().is_valid());
        assert_eq!(session.calibration().scale_factor(), None);

        session.handle(SessionEvent::QuickMeasure);
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
    }

    #[test]
    fn test_degenerate_calibration_keeps_previous_scale() {
        let mut session = calibrated_session();
        session.handle(SessionEvent::Start);
        session.handle(click(400.0, 400.0));
        let out = session.handle(click(400.0, 400.0));

        assert_eq!(session.state(), MeasurementState::DistancePoint1);
        assert_eq!(session.calibration().scale_factor(), Some(1.0));
        let text = prompt_text(&out).unwrap();
        assert!(text.contains("keeping previous scale"));
        assert!(text.ends_with("Measure distance: first point (your position)"));
    }

    #[test]
    fn test_degenerate_first_calibration_asks_again_at_distance() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        session.handle(click(400.0, 400.0));
        session.handle(click(400.0, 400.0));
        assert_eq!(session.state(), MeasurementState::DistancePoint1);
        assert!(!session.calibration().is_valid());

        session.handle(click(0.0, 0.0));
        let out = session.handle(click(100.0, 0.0));
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
        assert_eq!(session.pending_point(), None);
        assert!(prompt_text(&out).unwrap().ends_with("Set 100 m scale: first point"));
    }

    #[test]
    fn test_no_solution_still_completes() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        session.handle(click(0.0, 719.0));
        session.handle(click(100.0, 719.0));
        session.handle(click(0.0, 719.0));
        session.handle(click(690.0, 719.0));

        // 25° above the crosshair
        let g = *session.geometry();
        let tan_per_px = g.max_elevation_deg.to_radians().tan() / g.center_y;
        let y = g.center_y - 25f64.to_radians().tan() / tan_per_px;

        let out = session.handle(click(100.0, y));
        assert_eq!(session.state(), MeasurementState::Idle);
        assert!(matches!(session.last_result(), Some(MeasurementResult::NoSolution(_))));
        assert_eq!(prompt_text(&out), Some("No solution - target out of range"));
        assert_eq!(session.readout().result_text, "No solution");
        assert!((session.last_elevation_deg().unwrap() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_paused_session_ignores_input() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::SetListening { listening: false });
        assert_eq!(session.status(), STATUS_PAUSED);

        assert!(session.handle(SessionEvent::Start).is_empty());
        assert!(session.handle(SessionEvent::QuickMeasure).is_empty());
        assert_eq!(session.state(), MeasurementState::Idle);

        session.handle(SessionEvent::SetListening { listening: true });
        assert!(session.is_listening());
        session.handle(SessionEvent::Start);
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
    }

    #[test]
    fn test_resize_geometry() {
        let mut session = MeasurementSession::default();
        let out = session.handle(SessionEvent::ResizeGeometry {
            width_px: 1920.0,
            height_px: 1080.0,
        });
        assert!(out.is_empty());
        assert_eq!(session.geometry().center_y, 539.0);

        let out = session.handle(SessionEvent::ResizeGeometry {
            width_px: 0.0,
            height_px: 1080.0,
        });
        assert_eq!(session.geometry().center_y, 539.0);
        assert!(matches!(
            out.as_slice(),
            [DisplayCommand::ShowPrompt { auto_close_ms: Some(_), .. }]
        ));
    }

    #[test]
    fn test_resize_failure_mid_cycle_repeats_step_prompt() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        let out = session.handle(SessionEvent::ResizeGeometry {
            width_px: -1.0,
            height_px: -1.0,
        });
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
        assert!(session.prompt_active());
        assert!(prompt_text(&out).unwrap().ends_with("Set 100 m scale: first point"));
    }

    #[test]
    fn test_degenerate_geometry_at_elevation_step() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        session.handle(click(0.0, 0.0));
        session.handle(click(100.0, 0.0));
        session.handle(click(0.0, 0.0));
        session.handle(click(50.0, 0.0));
        session.handle(SessionEvent::ResizeGeometry {
            width_px: 4.0,
            height_px: 2.0,
        });

        let out = session.handle(click(1.0, 1.0));
        assert_eq!(session.state(), MeasurementState::Idle);
        assert_eq!(session.last_result(), None);
        assert!(prompt_text(&out).unwrap().contains("invalid screen geometry"));
    }

    #[test]
    fn test_prompt_dismissed_clears_active_flag() {
        let mut session = MeasurementSession::default();
        session.handle(SessionEvent::Start);
        assert!(session.prompt_active());
        session.handle(SessionEvent::PromptDismissed);
        assert!(!session.prompt_active());

        // No rule for quick measure mid-cycle without a prompt
        assert!(session.handle(SessionEvent::QuickMeasure).is_empty());
        assert_eq!(session.state(), MeasurementState::ScalePoint1);
    }

    #[test]
    fn test_events_from_json() {
        let events: Vec<SessionEvent> = serde_json::from_str(
            r#"["start", {"point_captured": {"x": 1.0, "y": 2.0}}, {"set_listening": {"listening": false}}]"#,
        )
        .unwrap();
        assert_eq!(events[0], SessionEvent::Start);
        assert_eq!(events[1], SessionEvent::PointCaptured { x: 1.0, y: 2.0 });
        assert_eq!(events[2], SessionEvent::SetListening { listening: false });
    }
}
