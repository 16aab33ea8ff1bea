//! Trajectory sampling module
//!
//! Maps a progress value onto the robot's position and orientation along the
//! waypoint curve. The animated path follows the raw waypoints, not the
//! rounded render geometry.

pub mod catmull_rom;

use crate::common::types::Point3;
use crate::common::{normalize_angle, EngineError, Pose, RotationOffsets};
use crate::navigation::PathGeometry;

/// Default share of the progress range used to ease from the start heading
pub const DEFAULT_BLEND_WINDOW: f64 = 0.15;

/// Robot placement at one progress value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Progress after clamping
    pub progress: f64,
    pub position: Point3,
    /// Blended heading in radians, before offsets
    pub heading: f64,
    /// Model orientation in radians: (offset x, offset y, heading + offset z)
    pub orientation: Point3,
}

/// A trajectory sampler for the robot
#[derive(Debug, Clone)]
pub struct TrajectorySampler {
    blend_window: f64,
}

impl TrajectorySampler {
    /// Create a new trajectory sampler
    pub fn new(blend_window: f64) -> Self {
        TrajectorySampler { blend_window }
    }

    /// Sample the trajectory at `progress`.
    ///
    /// Progress maps onto the curve through the geometry, evenly by arc
    /// length when the geometry carries a length table. The heading blend
    /// always runs on progress.
    ///
    /// Progress outside [0, 1] is clamped. A non-finite progress is a caller
    /// defect and is reported as an error, as is a geometry built from fewer
    /// than two waypoints.
    pub fn sample(
        &self,
        geometry: &PathGeometry,
        progress: f64,
        pose: &Pose,
        offsets: &RotationOffsets,
    ) -> Result<Sample, EngineError> {
        if !progress.is_finite() {
            return Err(EngineError::NonFiniteProgress(progress));
        }
        let curve = geometry
            .curve()
            .ok_or(EngineError::InsufficientWaypoints {
                found: geometry.waypoint_count(),
            })?;

        let progress = progress.clamp(0.0, 1.0);
        let t = geometry.curve_parameter(progress);
        let position = curve.point_at(t);
        let tangent = curve.tangent_at(t);
        let raw_heading = tangent.y.atan2(tangent.x);
        let heading = self.blend_heading(pose.heading(), raw_heading, progress);

        Ok(Sample {
            progress,
            position,
            heading,
            orientation: Point3::new(
                offsets.x.to_radians(),
                offsets.y.to_radians(),
                heading + offsets.z.to_radians(),
            ),
        })
    }

    /// Ease from the start heading into the path heading over the blend window
    pub fn blend_heading(&self, start: f64, raw: f64, progress: f64) -> f64 {
        if progress >= self.blend_window {
            return raw;
        }
        let t = (progress / self.blend_window).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        start + normalize_angle(raw - start) * eased
    }
}

impl Default for TrajectorySampler {
    fn default() -> Self {
        TrajectorySampler::new(DEFAULT_BLEND_WINDOW)
    }
}
