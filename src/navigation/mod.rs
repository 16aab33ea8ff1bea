//! Navigation module: waypoints, frames and path geometry
pub mod frame;
pub mod path_planning;
pub mod planner;
pub mod waypoints;

use self::planner::PathPlanner;
use self::waypoints::Waypoint;
use crate::common::types::Point3;
use crate::control::trajectory::catmull_rom::{ArcLengthTable, CatmullRomCurve};

/// Geometry derived from one version of the waypoint sequence.
///
/// Rebuilt whenever the waypoints change and never mutated afterwards, so a
/// sample always sees a consistent render polyline and trajectory curve.
#[derive(Debug, Clone)]
pub struct PathGeometry {
    render_points: Vec<Point3>,
    curve: Option<CatmullRomCurve>,
    arc_lengths: Option<ArcLengthTable>,
    waypoint_count: usize,
}

impl PathGeometry {
    /// Build render geometry and the trajectory curve for a waypoint sequence
    pub fn build(planner: &dyn PathPlanner, waypoints: &[Waypoint]) -> Self {
        let render_points = planner.build_path(waypoints);
        let curve = CatmullRomCurve::new(waypoints.iter().map(|w| w.position).collect()).ok();
        PathGeometry {
            render_points,
            curve,
            arc_lengths: None,
            waypoint_count: waypoints.len(),
        }
    }

    /// Spread progress evenly over the arc length instead of over segments
    pub fn with_arc_length(mut self, divisions: usize) -> Self {
        self.arc_lengths = self
            .curve
            .as_ref()
            .map(|curve| ArcLengthTable::new(curve, divisions));
        self
    }

    /// Curve length, when built with an arc-length table
    pub fn path_length(&self) -> Option<f64> {
        self.arc_lengths.as_ref().map(ArcLengthTable::total)
    }

    /// Curve parameter for a progress value in [0, 1]
    pub fn curve_parameter(&self, progress: f64) -> f64 {
        match &self.arc_lengths {
            Some(table) => table.parameter_at(progress),
            None => progress,
        }
    }

    /// Polyline for the renderer
    pub fn render_points(&self) -> &[Point3] {
        &self.render_points
    }

    /// Trajectory curve through the raw waypoints, if there are at least two
    pub fn curve(&self) -> Option<&CatmullRomCurve> {
        self.curve.as_ref()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoint_count
    }

    pub fn is_drivable(&self) -> bool {
        self.curve.is_some()
    }
}
