//! Ordered waypoint storage
//!
//! Index 0 is the start waypoint. It always exists, follows the start pose
//! position and can never be removed.

use crate::common::types::Point3;
use crate::common::Pose;
use crate::navigation::frame;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single placed waypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Global field position, z = 0
    pub position: Point3,
    /// Round this corner instead of leaving a sharp vertex
    pub smooth: bool,
}

impl Waypoint {
    pub fn new(position: Point3) -> Self {
        Waypoint {
            position: Point3::new(position.x, position.y, 0.0),
            smooth: false,
        }
    }
}

/// The authored path, never empty
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Waypoint>,
}

impl WaypointPath {
    /// Create a path containing only the start waypoint
    pub fn new(start: &Pose) -> Self {
        WaypointPath {
            waypoints: vec![Waypoint::new(start.position())],
        }
    }

    /// Rebuild a path from stored waypoints, re-anchoring index 0 on the pose
    pub fn from_waypoints(start: &Pose, waypoints: Vec<Waypoint>) -> Self {
        let mut path = WaypointPath { waypoints };
        if path.waypoints.is_empty() {
            path.waypoints.push(Waypoint::new(start.position()));
        } else {
            path.waypoints[0].position = start.position();
        }
        for waypoint in path.waypoints.iter_mut() {
            waypoint.position.z = 0.0;
        }
        path
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Raw waypoint positions in order
    pub fn positions(&self) -> Vec<Point3> {
        self.waypoints.iter().map(|w| w.position).collect()
    }

    /// Append a sharp waypoint at a global position
    pub fn add(&mut self, position: Point3) {
        self.waypoints.push(Waypoint::new(position));
        debug!(index = self.waypoints.len() - 1, x = position.x, y = position.y, "waypoint added");
    }

    /// Move a waypoint to a new global position
    pub fn update_position(&mut self, index: usize, position: Point3) -> bool {
        match self.waypoints.get_mut(index) {
            Some(waypoint) => {
                waypoint.position = Point3::new(position.x, position.y, 0.0);
                true
            }
            None => {
                debug!(index, "ignoring update of missing waypoint");
                false
            }
        }
    }

    /// Position of a waypoint relative to the start pose
    pub fn local_position(&self, index: usize, pose: &Pose) -> Option<Point3> {
        self.waypoints
            .get(index)
            .map(|w| frame::to_local(&w.position, pose))
    }

    /// Flip the smoothing flag of a waypoint
    pub fn toggle_smooth(&mut self, index: usize) -> bool {
        match self.waypoints.get_mut(index) {
            Some(waypoint) => {
                waypoint.smooth = !waypoint.smooth;
                true
            }
            None => false,
        }
    }

    /// Remove a waypoint; the start waypoint stays
    pub fn remove(&mut self, index: usize) -> Option<Waypoint> {
        if index == 0 {
            debug!("start waypoint cannot be removed");
            return None;
        }
        if index >= self.waypoints.len() {
            return None;
        }
        Some(self.waypoints.remove(index))
    }

    /// Follow a start pose edit. Only the changed components are written.
    pub fn set_start(&mut self, x: Option<f64>, y: Option<f64>) {
        let start = &mut self.waypoints[0].position;
        if let Some(x) = x {
            start.x = x;
        }
        if let Some(y) = y {
            start.y = y;
        }
    }

    /// Drop everything except the start waypoint
    pub fn clear(&mut self, start: &Pose) {
        self.waypoints.truncate(1);
        self.waypoints[0].position = start.position();
    }
}
