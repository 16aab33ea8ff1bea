//! Error types for the path engine

use thiserror::Error;

/// Faults raised by the engine.
///
/// Unmet UI preconditions (starting playback without a model, removing the
/// start waypoint, ...) are not errors; those operations are refused and
/// report `false` instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("progress must be a finite number, got {0}")]
    NonFiniteProgress(f64),

    #[error("tick duration must be a finite number, got {0}")]
    NonFiniteDelta(f64),

    #[error("trajectory needs at least 2 waypoints, found {found}")]
    InsufficientWaypoints { found: usize },

    #[error("invalid value for parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid(name: &str, reason: &str) -> Self {
        EngineError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
