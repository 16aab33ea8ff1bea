use crate::common::lerp;
use crate::common::types::Point3;
use crate::navigation::planner::PathPlanner;
use crate::navigation::waypoints::Waypoint;

pub mod bezier;

use self::bezier::QuadraticBezier;

/// Default pull of the corner control points toward the neighbours
pub const DEFAULT_TENSION: f64 = 0.3;
/// Default number of points emitted for a rounded corner
pub const DEFAULT_CORNER_SAMPLES: usize = 8;

/// Planner that keeps straight segments and rounds smooth interior corners
/// with a short quadratic Bezier
pub struct CornerSmoothingPlanner {
    tension: f64,     // fraction of the way toward each neighbour
    samples: usize,   // points per rounded corner
}

impl CornerSmoothingPlanner {
    pub fn new(tension: f64, samples: usize) -> Self {
        CornerSmoothingPlanner { tension, samples }
    }

    /// Rounded replacement for a single corner
    fn round_corner(&self, prev: &Point3, corner: &Point3, next: &Point3) -> Vec<Point3> {
        let entry = lerp(corner, prev, self.tension);
        let exit = lerp(corner, next, self.tension);
        QuadraticBezier::new(entry, *corner, exit).sample(self.samples)
    }
}

impl Default for CornerSmoothingPlanner {
    fn default() -> Self {
        CornerSmoothingPlanner::new(DEFAULT_TENSION, DEFAULT_CORNER_SAMPLES)
    }
}

impl PathPlanner for CornerSmoothingPlanner {
    fn build_path(&self, waypoints: &[Waypoint]) -> Vec<Point3> {
        let n = waypoints.len();
        if n < 2 {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(n + waypoints.iter().filter(|w| w.smooth).count() * self.samples);
        for (i, waypoint) in waypoints.iter().enumerate() {
            // End points have no two-sided corner, their flag is ignored
            if waypoint.smooth && i > 0 && i < n - 1 {
                let corner = self.round_corner(
                    &waypoints[i - 1].position,
                    &waypoint.position,
                    &waypoints[i + 1].position,
                );
                path.extend(corner);
            } else {
                path.push(waypoint.position);
            }
        }
        path
    }

    fn name(&self) -> &str {
        "CornerSmoothingPlanner"
    }
}
