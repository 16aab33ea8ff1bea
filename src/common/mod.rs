//! Common utilities and types for the path engine

pub mod error;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub use self::error::EngineError;

/// Common types and utilities used across the codebase
pub mod types {
    /// A point on the field (z is always 0)
    pub type Point3 = nalgebra::Vector3<f64>;
}

use self::types::Point3;

/// Robot start pose in the global field frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Position of the pose on the field plane
    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, 0.0)
    }

    /// Heading in radians
    pub fn heading(&self) -> f64 {
        self.theta.to_radians()
    }

    /// Apply a partial edit, returning which position components changed
    pub fn apply(&mut self, patch: PosePatch) -> (bool, bool) {
        let mut moved = (false, false);
        if let Some(x) = patch.x {
            moved.0 = x != self.x;
            self.x = x;
        }
        if let Some(y) = patch.y {
            moved.1 = y != self.y;
            self.y = y;
        }
        if let Some(theta) = patch.theta {
            self.theta = theta;
        }
        moved
    }
}

impl Default for Pose {
    fn default() -> Self {
        // Corner of the 144x144 field, facing +y
        Pose::new(-60.0, -60.0, 90.0)
    }
}

/// Partial edit of the start pose; `None` leaves a field untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PosePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub theta: Option<f64>,
}

impl PosePatch {
    pub fn position(x: f64, y: f64) -> Self {
        PosePatch {
            x: Some(x),
            y: Some(y),
            theta: None,
        }
    }

    pub fn heading(theta: f64) -> Self {
        PosePatch {
            theta: Some(theta),
            ..Default::default()
        }
    }
}

/// Physical robot extents, only used to scale a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotDimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RobotDimensions {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        RobotDimensions { x, y, z }
    }

    /// Per-axis scale that maps a model's native extents onto these dimensions.
    /// Axes with a degenerate model extent keep a scale of 1.
    pub fn scale_for(&self, model_extents: Point3) -> Point3 {
        let axis = |target: f64, native: f64| {
            if native.abs() < f64::EPSILON || target <= 0.0 {
                1.0
            } else {
                target / native.abs()
            }
        };
        Point3::new(
            axis(self.x, model_extents.x),
            axis(self.y, model_extents.y),
            axis(self.z, model_extents.z),
        )
    }
}

impl Default for RobotDimensions {
    fn default() -> Self {
        // 18 inch cube
        RobotDimensions::new(18.0, 18.0, 18.0)
    }
}

/// Constant orientation offsets for a model, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationOffsets {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationOffsets {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        RotationOffsets { x, y, z }
    }
}

/// Wrap an angle in radians into (-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    PI - (PI - angle).rem_euclid(2.0 * PI)
}

/// Linear interpolation between two points
pub fn lerp(from: &Point3, to: &Point3, t: f64) -> Point3 {
    from + (to - from) * t
}
