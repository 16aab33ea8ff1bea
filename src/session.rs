//! Caller-owned editor state
//!
//! The drag index belongs to the UI layer. It is passed into the engine's
//! mutation entry points so the engine can keep drags and playback apart
//! without storing editor state itself.

use crate::common::types::Point3;
use crate::OmniPathCore;
use tracing::debug;

/// Editor state for one user session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    drag_index: Option<usize>,
}

impl EditorSession {
    pub fn new() -> Self {
        EditorSession::default()
    }

    /// Index of the waypoint being dragged, if any
    pub fn drag_index(&self) -> Option<usize> {
        self.drag_index
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_index.is_some()
    }

    /// Grab a waypoint. Refused while playing, while another drag is active,
    /// or for an index that does not exist.
    pub fn begin_drag(&mut self, core: &OmniPathCore, index: usize) -> bool {
        if core.is_playing() {
            debug!(index, "drag refused during playback");
            return false;
        }
        if self.drag_index.is_some() || index >= core.waypoints().len() {
            return false;
        }
        self.drag_index = Some(index);
        true
    }

    /// Move the grabbed waypoint to a field position
    pub fn drag_to(&self, core: &mut OmniPathCore, position: Point3) -> bool {
        match self.drag_index {
            Some(index) => core.update_waypoint_position(self, index, position),
            None => false,
        }
    }

    /// Release the grabbed waypoint and bring the displayed pose up to date
    pub fn end_drag(&mut self, core: &mut OmniPathCore) {
        if self.drag_index.take().is_some() {
            core.refresh_sample();
        }
    }
}

/// Read a numeric field as typed by the user. Anything that is not a finite
/// number counts as 0.
pub fn parse_coordinate(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
