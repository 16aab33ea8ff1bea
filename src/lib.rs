pub mod common;
pub mod config;
pub mod control;
pub mod navigation;
pub mod session;
pub mod snapshot;

use crate::common::types::Point3;
use crate::common::{EngineError, Pose, PosePatch, RobotDimensions, RotationOffsets};
use crate::config::{Pacing, PlannerConfig};
use crate::control::trajectory::{Sample, TrajectorySampler};
use crate::control::{Advance, FollowCallback, PlaybackController, State};
use crate::navigation::path_planning::CornerSmoothingPlanner;
use crate::navigation::planner::PathPlanner;
use crate::navigation::waypoints::{Waypoint, WaypointPath};
use crate::navigation::PathGeometry;
use crate::session::EditorSession;
use crate::snapshot::PathSnapshot;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Opaque handle to a loaded robot model. Only its presence matters here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    source: String,
}

impl ModelHandle {
    pub fn new(source: impl Into<String>) -> Self {
        ModelHandle {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// What a playback tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Playback is stopped
    Idle,
    /// The robot moved to a new sample
    Moved(Sample),
    /// A pass finished; progress is back at 0
    Completed,
}

/// Path editing and playback engine for one field
pub struct OmniPathCore {
    config: PlannerConfig,
    pose: Pose,
    path: WaypointPath,
    planner: Box<dyn PathPlanner>,
    sampler: TrajectorySampler,
    geometry: Arc<PathGeometry>,
    playback: PlaybackController,
    dimensions: RobotDimensions,
    offsets: RotationOffsets,
    model: Option<ModelHandle>,
    current: Option<Sample>,
}

impl OmniPathCore {
    /// Create an engine with the default start pose and configuration
    pub fn new() -> Self {
        Self::build(PlannerConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: PlannerConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PlannerConfig) -> Self {
        let pose = Pose::default();
        let path = WaypointPath::new(&pose);
        let planner = CornerSmoothingPlanner::new(config.corner_tension, config.corner_samples);
        let geometry = Arc::new(PathGeometry::build(&planner, path.as_slice()));

        OmniPathCore {
            sampler: TrajectorySampler::new(config.heading_blend_window),
            playback: PlaybackController::new(&config),
            planner: Box::new(planner),
            config,
            pose,
            path,
            geometry,
            dimensions: RobotDimensions::default(),
            offsets: RotationOffsets::default(),
            model: None,
            current: None,
        }
    }

    /// Configure with named parameters, see [`PlannerConfig::configure`]
    pub fn configure(&mut self, session: &EditorSession, params: &HashMap<String, f64>) -> Result<(), EngineError> {
        self.config.configure(params)?;
        info!(config = ?self.config, "planner reconfigured");

        self.planner = Box::new(CornerSmoothingPlanner::new(
            self.config.corner_tension,
            self.config.corner_samples,
        ));
        self.sampler = TrajectorySampler::new(self.config.heading_blend_window);
        self.playback.apply_config(&self.config);
        self.path_changed(session);
        Ok(())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn start_pose(&self) -> &Pose {
        &self.pose
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.path.as_slice()
    }

    /// Waypoint position relative to the start pose, for numeric editing
    pub fn waypoint_local(&self, index: usize) -> Option<Point3> {
        self.path.local_position(index, &self.pose)
    }

    /// Polyline with rounded corners for the renderer
    pub fn render_geometry(&self) -> &[Point3] {
        self.geometry.render_points()
    }

    /// Current geometry snapshot
    pub fn geometry(&self) -> Arc<PathGeometry> {
        Arc::clone(&self.geometry)
    }

    pub fn robot_dimensions(&self) -> &RobotDimensions {
        &self.dimensions
    }

    pub fn rotation_offsets(&self) -> &RotationOffsets {
        &self.offsets
    }

    pub fn robot_model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    pub fn state(&self) -> State {
        self.playback.state()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn progress(&self) -> f64 {
        self.playback.progress()
    }

    /// Robot placement at the current progress, if the path can be driven
    pub fn current_sample(&self) -> Option<Sample> {
        self.current
    }

    /// Sample the trajectory without touching playback state.
    /// Returns `None` when fewer than two waypoints exist.
    pub fn sample_at(&self, progress: f64) -> Result<Option<Sample>, EngineError> {
        if !progress.is_finite() {
            return Err(EngineError::NonFiniteProgress(progress));
        }
        let geometry = Arc::clone(&self.geometry);
        if !geometry.is_drivable() {
            return Ok(None);
        }
        self.sampler
            .sample(&geometry, progress, &self.pose, &self.offsets)
            .map(Some)
    }

    /// Append a waypoint at a field position. Refused during playback or a drag.
    pub fn add_waypoint(&mut self, session: &EditorSession, position: Point3) -> bool {
        if self.is_playing() || session.is_dragging() {
            debug!("waypoint placement refused");
            return false;
        }
        self.path.add(position);
        self.path_changed(session);
        true
    }

    /// Move a waypoint to a field position. Moving the start waypoint moves
    /// the start pose with it.
    pub fn update_waypoint_position(&mut self, session: &EditorSession, index: usize, position: Point3) -> bool {
        if index == 0 {
            self.set_start_pose(session, PosePatch::position(position.x, position.y));
            return true;
        }
        if !self.path.update_position(index, position) {
            return false;
        }
        self.path_changed(session);
        true
    }

    /// Move a waypoint using coordinates relative to the start pose
    pub fn update_waypoint_local(&mut self, session: &EditorSession, index: usize, local: Point3) -> bool {
        let global = navigation::frame::to_global(&local, &self.pose);
        self.update_waypoint_position(session, index, global)
    }

    pub fn toggle_smooth(&mut self, session: &EditorSession, index: usize) -> bool {
        if !self.path.toggle_smooth(index) {
            return false;
        }
        self.path_changed(session);
        true
    }

    /// Remove a waypoint. The start waypoint cannot be removed, and nothing
    /// is removed while a drag holds an index into the path.
    pub fn remove_waypoint(&mut self, session: &EditorSession, index: usize) -> bool {
        if session.is_dragging() {
            debug!(index, "waypoint removal refused during a drag");
            return false;
        }
        if self.path.remove(index).is_none() {
            return false;
        }
        self.path_changed(session);
        true
    }

    /// Drop every waypoint except the start waypoint. Refused during a drag.
    pub fn clear(&mut self, session: &EditorSession) -> bool {
        if session.is_dragging() {
            debug!("clear refused during a drag");
            return false;
        }
        self.path.clear(&self.pose);
        self.path_changed(session);
        true
    }

    /// Edit the start pose. Position changes move the start waypoint,
    /// heading changes only affect the heading blend.
    pub fn set_start_pose(&mut self, session: &EditorSession, patch: PosePatch) {
        let (moved_x, moved_y) = self.pose.apply(patch);
        if moved_x || moved_y {
            self.path.set_start(
                Some(self.pose.x).filter(|_| moved_x),
                Some(self.pose.y).filter(|_| moved_y),
            );
            self.path_changed(session);
        } else {
            self.settings_changed(session);
        }
    }

    pub fn set_robot_dimensions(&mut self, dimensions: RobotDimensions) {
        self.dimensions = dimensions;
    }

    pub fn set_rotation_offsets(&mut self, session: &EditorSession, offsets: RotationOffsets) {
        self.offsets = offsets;
        self.settings_changed(session);
    }

    /// Attach or detach the robot model. Detaching stops playback.
    pub fn set_robot_model(&mut self, model: Option<ModelHandle>) {
        if model.is_none() {
            self.playback.pause();
        }
        self.model = model;
    }

    /// Start playback; needs two waypoints, a model and no active drag
    pub fn play(&mut self, session: &EditorSession) -> bool {
        let ready = self.geometry.is_drivable() && self.model.is_some() && !session.is_dragging();
        self.playback.play(ready)
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Play if stopped, pause if playing. Returns whether playback now runs.
    pub fn toggle(&mut self, session: &EditorSession) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play(session)
        }
    }

    /// Stop and rewind to the start of the path
    pub fn reset(&mut self) {
        self.playback.reset();
        self.refresh_sample();
    }

    /// Scrub to a progress value
    pub fn seek(&mut self, progress: f64) -> Result<Option<Sample>, EngineError> {
        self.playback.seek(progress)?;
        self.refresh_sample();
        Ok(self.current)
    }

    /// Advance playback by `delta` seconds of wall-clock time
    pub fn tick(&mut self, delta: f64) -> Result<TickOutcome, EngineError> {
        let path_length = self.geometry.path_length().unwrap_or(0.0);
        match self.playback.advance(delta, path_length)? {
            Advance::Idle => Ok(TickOutcome::Idle),
            Advance::Completed => {
                self.refresh_sample();
                Ok(TickOutcome::Completed)
            }
            Advance::Progressed(progress) => {
                let geometry = Arc::clone(&self.geometry);
                let sample = self
                    .sampler
                    .sample(&geometry, progress, &self.pose, &self.offsets)?;
                self.current = Some(sample);
                self.playback.notify_follow(&sample.position);
                Ok(TickOutcome::Moved(sample))
            }
        }
    }

    /// Install a callback that receives the robot position on every tick
    pub fn set_follow_callback(&mut self, callback: Option<FollowCallback>) {
        self.playback.set_follow_callback(callback);
    }

    /// Copy of the authored path
    pub fn snapshot(&self) -> PathSnapshot {
        PathSnapshot {
            start_pose: self.pose,
            waypoints: self.path.as_slice().to_vec(),
            rotation_offsets: self.offsets,
            robot_dimensions: self.dimensions,
        }
    }

    /// Replace the authored path. Refused during playback or a drag.
    pub fn restore(&mut self, session: &EditorSession, snapshot: PathSnapshot) -> bool {
        if self.is_playing() || session.is_dragging() {
            return false;
        }
        self.pose = snapshot.start_pose;
        self.path = WaypointPath::from_waypoints(&self.pose, snapshot.waypoints);
        self.offsets = snapshot.rotation_offsets;
        self.dimensions = snapshot.robot_dimensions;
        self.playback.reset();
        info!(waypoints = self.path.len(), "path restored");
        self.path_changed(session);
        true
    }

    /// Re-evaluate the displayed pose at the current progress
    pub fn refresh_sample(&mut self) {
        self.current = self.sample_at(self.playback.progress()).ok().flatten();
    }

    /// Rebuild geometry after a waypoint change
    fn path_changed(&mut self, session: &EditorSession) {
        let mut geometry = PathGeometry::build(self.planner.as_ref(), self.path.as_slice());
        if let Pacing::ConstantSpeed { .. } = self.config.pacing {
            geometry = geometry.with_arc_length(self.config.curve_divisions);
        }
        self.geometry = Arc::new(geometry);

        if !self.geometry.is_drivable() && self.is_playing() {
            info!("path too short to drive, stopping playback");
            self.playback.pause();
        }
        self.settings_changed(session);
    }

    /// Keep the displayed pose live while stopped and not dragging
    fn settings_changed(&mut self, session: &EditorSession) {
        if self.is_playing() {
            return;
        }
        if session.is_dragging() {
            return;
        }
        self.refresh_sample();
    }
}

impl Default for OmniPathCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playable() -> (OmniPathCore, EditorSession) {
        let mut core = OmniPathCore::new();
        let session = EditorSession::new();
        core.add_waypoint(&session, Point3::new(-60.0, 0.0, 0.0));
        core.add_waypoint(&session, Point3::new(0.0, 0.0, 0.0));
        core.set_robot_model(Some(ModelHandle::new("robot.stl")));
        (core, session)
    }

    #[test]
    fn starts_with_single_start_waypoint() {
        let core = OmniPathCore::new();
        assert_eq!(core.waypoints().len(), 1);
        assert!(core.render_geometry().is_empty());
        assert!(core.current_sample().is_none());
        assert_eq!(core.sample_at(0.5).unwrap(), None);
    }

    #[test]
    fn play_needs_model_and_two_waypoints() {
        let mut core = OmniPathCore::new();
        let session = EditorSession::new();
        core.set_robot_model(Some(ModelHandle::new("robot.stl")));
        assert!(!core.play(&session));
        assert_eq!(core.state(), State::Stopped);

        core.add_waypoint(&session, Point3::new(0.0, 0.0, 0.0));
        core.set_robot_model(None);
        assert!(!core.play(&session));

        core.set_robot_model(Some(ModelHandle::new("robot.stl")));
        assert!(core.play(&session));
    }

    #[test]
    fn placement_is_refused_during_playback() {
        let (mut core, session) = playable();
        assert!(core.play(&session));
        assert!(!core.add_waypoint(&session, Point3::new(10.0, 10.0, 0.0)));
        assert_eq!(core.waypoints().len(), 3);
    }

    #[test]
    fn stopped_edits_refresh_the_displayed_pose() {
        let (mut core, session) = playable();
        core.seek(1.0).unwrap();
        let before = core.current_sample().unwrap();

        assert!(core.update_waypoint_position(&session, 2, Point3::new(0.0, 30.0, 0.0)));
        let after = core.current_sample().unwrap();
        assert_ne!(before.position, after.position);
        assert!((after.position - Point3::new(0.0, 30.0, 0.0)).norm() < 1e-9);

        core.set_rotation_offsets(&session, RotationOffsets::new(0.0, 0.0, 90.0));
        let rotated = core.current_sample().unwrap();
        assert!((rotated.orientation.z - after.orientation.z - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn heading_edit_does_not_move_start_waypoint() {
        let (mut core, session) = playable();
        core.set_start_pose(&session, PosePatch::heading(0.0));
        assert_eq!(core.waypoints()[0].position, Point3::new(-60.0, -60.0, 0.0));

        core.set_start_pose(&session, PosePatch { x: Some(-50.0), ..Default::default() });
        assert_eq!(core.waypoints()[0].position, Point3::new(-50.0, -60.0, 0.0));
    }

    #[test]
    fn heading_edit_refreshes_displayed_pose() {
        let (mut core, session) = playable();
        core.seek(0.05).unwrap();
        let before = core.current_sample().unwrap();

        core.set_start_pose(&session, PosePatch::heading(0.0));
        let after = core.current_sample().unwrap();
        assert_eq!(after.position, before.position);
        assert!(after.heading < before.heading);
        assert_eq!(Some(after), core.sample_at(0.05).unwrap());
    }

    #[test]
    fn dragging_start_waypoint_moves_start_pose() {
        let (mut core, session) = playable();
        assert!(core.update_waypoint_position(&session, 0, Point3::new(-40.0, -45.0, 0.0)));
        assert_eq!(core.start_pose().x, -40.0);
        assert_eq!(core.start_pose().y, -45.0);
        assert_eq!(core.waypoints()[0].position, Point3::new(-40.0, -45.0, 0.0));
    }

    #[test]
    fn removing_below_two_waypoints_stops_playback() {
        let (mut core, session) = playable();
        assert!(core.remove_waypoint(&session, 1));
        assert!(core.play(&session));
        assert!(!core.remove_waypoint(&session, 0));
        assert!(core.remove_waypoint(&session, 1));
        assert!(!core.is_playing());
        assert_eq!(core.tick(0.1).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn toggle_flips_transport() {
        let (mut core, session) = playable();
        assert!(core.toggle(&session));
        assert!(core.is_playing());
        assert!(!core.toggle(&session));
        assert!(!core.is_playing());
    }

    #[test]
    fn smooth_toggle_rebuilds_render_geometry() {
        let (mut core, session) = playable();
        assert_eq!(core.render_geometry().len(), 3);
        assert!(core.toggle_smooth(&session, 1));
        assert_eq!(core.render_geometry().len(), 10);
        assert!(!core.toggle_smooth(&session, 9));
    }

    #[test]
    fn local_edit_round_trips_through_start_frame() {
        let (mut core, session) = playable();
        assert!(core.update_waypoint_local(&session, 1, Point3::new(10.0, 0.0, 0.0)));
        assert!((core.waypoints()[1].position - Point3::new(-60.0, -50.0, 0.0)).norm() < 1e-9);
        let local = core.waypoint_local(1).unwrap();
        assert!((local - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn snapshot_restores_path() {
        let (mut core, session) = playable();
        core.toggle_smooth(&session, 1);
        let json = core.snapshot().to_json().unwrap();

        let mut other = OmniPathCore::new();
        let restored = PathSnapshot::from_json(&json).unwrap();
        assert!(other.restore(&session, restored));
        assert_eq!(other.waypoints(), core.waypoints());
        assert_eq!(other.render_geometry().len(), 10);
    }

    #[test]
    fn sample_rejects_non_finite_progress() {
        let (core, _) = playable();
        assert!(matches!(
            core.sample_at(f64::NAN),
            Err(EngineError::NonFiniteProgress(_))
        ));
    }
}
