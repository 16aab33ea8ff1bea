//! Engine configuration

use crate::common::EngineError;
use crate::control::trajectory::DEFAULT_BLEND_WINDOW;
use crate::navigation::path_planning::{DEFAULT_CORNER_SAMPLES, DEFAULT_TENSION};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// How playback progress relates to wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Pacing {
    /// Every pass takes `1 / playback_rate` seconds, whatever the path length
    FixedDuration,
    /// The robot moves at `speed` field units per second along the curve
    ConstantSpeed { speed: f64 },
}

/// Tunables for geometry, sampling and playback
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Progress per second under fixed-duration pacing
    pub playback_rate: f64,
    /// Progress span over which the heading eases in from the start pose
    pub heading_blend_window: f64,
    /// Corner control point pull toward the neighbours
    pub corner_tension: f64,
    /// Points emitted for each rounded corner
    pub corner_samples: usize,
    /// Chords in the arc-length table used by constant-speed pacing
    pub curve_divisions: usize,
    /// Restart from the beginning instead of stopping after a pass
    pub looping: bool,
    pub pacing: Pacing,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            playback_rate: 0.2, // 5 seconds per pass
            heading_blend_window: DEFAULT_BLEND_WINDOW,
            corner_tension: DEFAULT_TENSION,
            corner_samples: DEFAULT_CORNER_SAMPLES,
            curve_divisions: 200,
            looping: false,
            pacing: Pacing::FixedDuration,
        }
    }
}

impl PlannerConfig {
    /// Parse a JSON configuration; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Configure with named parameters. Unknown names are ignored.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), EngineError> {
        let mut next = self.clone();

        for (name, &value) in params {
            match name.as_str() {
                "playback_rate" => next.playback_rate = value,
                "heading_blend_window" => next.heading_blend_window = value,
                "corner_tension" => next.corner_tension = value,
                "corner_samples" => {
                    if value < 1.0 || value.fract() != 0.0 {
                        return Err(EngineError::invalid(name, "must be a positive whole number"));
                    }
                    next.corner_samples = value as usize;
                }
                "curve_divisions" => {
                    if value < 1.0 || value.fract() != 0.0 {
                        return Err(EngineError::invalid(name, "must be a positive whole number"));
                    }
                    next.curve_divisions = value as usize;
                }
                "looping" => next.looping = value != 0.0,
                "traversal_speed" => {
                    next.pacing = if value == 0.0 {
                        Pacing::FixedDuration
                    } else {
                        Pacing::ConstantSpeed { speed: value }
                    };
                }
                _ => warn!(parameter = %name, "ignoring unknown planner parameter"),
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.playback_rate.is_finite() && self.playback_rate > 0.0) {
            return Err(EngineError::invalid("playback_rate", "must be positive"));
        }
        if !(self.heading_blend_window.is_finite() && self.heading_blend_window > 0.0) {
            return Err(EngineError::invalid("heading_blend_window", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.corner_tension) {
            return Err(EngineError::invalid("corner_tension", "must be within [0, 1]"));
        }
        if self.corner_samples < 2 {
            return Err(EngineError::invalid("corner_samples", "must be at least 2"));
        }
        if self.curve_divisions == 0 {
            return Err(EngineError::invalid("curve_divisions", "must be positive"));
        }
        if let Pacing::ConstantSpeed { speed } = self.pacing {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(EngineError::invalid("traversal_speed", "must be positive"));
            }
        }
        Ok(())
    }
}
