//! Conversion between the start-pose frame and the global field frame

use crate::common::types::Point3;
use crate::common::Pose;
use nalgebra::{Rotation2, Vector2};

/// Convert a point expressed relative to the start pose into field coordinates
pub fn to_global(local: &Point3, pose: &Pose) -> Point3 {
    let rotation = Rotation2::new(pose.heading());
    let rotated = rotation * Vector2::new(local.x, local.y);
    Point3::new(rotated.x + pose.x, rotated.y + pose.y, 0.0)
}

/// Convert a field point into coordinates relative to the start pose.
/// The z component of the input is ignored.
pub fn to_local(global: &Point3, pose: &Pose) -> Point3 {
    let rotation = Rotation2::new(-pose.heading());
    let translated = Vector2::new(global.x - pose.x, global.y - pose.y);
    let local = rotation * translated;
    Point3::new(local.x, local.y, 0.0)
}
