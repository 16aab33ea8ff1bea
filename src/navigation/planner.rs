//! Path geometry building

use super::waypoints::Waypoint;
use crate::common::types::Point3;

/// Trait for algorithms that turn waypoints into drawable geometry
pub trait PathPlanner: Send + Sync {
    /// Build the polyline for a waypoint sequence.
    /// Fewer than 2 waypoints produce an empty path.
    fn build_path(&self, waypoints: &[Waypoint]) -> Vec<Point3>;

    /// Get the name of this planner
    fn name(&self) -> &str;
}
