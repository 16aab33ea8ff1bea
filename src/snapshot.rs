//! Serializable copy of an authored path

use crate::common::{EngineError, Pose, RobotDimensions, RotationOffsets};
use crate::navigation::waypoints::Waypoint;
use serde::{Deserialize, Serialize};

/// Everything needed to restore an authored path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSnapshot {
    pub start_pose: Pose,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub rotation_offsets: RotationOffsets,
    #[serde(default)]
    pub robot_dimensions: RobotDimensions,
}

impl PathSnapshot {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
