//! Control module: playback transport for the simulated robot
pub mod trajectory;

use crate::common::types::Point3;
use crate::common::EngineError;
use crate::config::{Pacing, PlannerConfig};
use std::fmt;
use tracing::{debug, info};

/// Transport state of the playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Stopped,
    Playing,
}

/// Result of advancing the playback clock by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Not playing, nothing moved
    Idle,
    /// Progress moved to the contained value
    Progressed(f64),
    /// A full pass finished and progress wrapped to 0
    Completed,
}

/// Callback receiving the sampled robot position on every playback tick
pub type FollowCallback = Box<dyn FnMut(&Point3) + Send>;

/// Drives normalised progress over wall-clock time
pub struct PlaybackController {
    state: State,
    progress: f64,
    playback_rate: f64,
    pacing: Pacing,
    looping: bool,
    follow: Option<FollowCallback>,
}

impl PlaybackController {
    /// Create a new stopped controller at progress 0
    pub fn new(config: &PlannerConfig) -> Self {
        PlaybackController {
            state: State::Stopped,
            progress: 0.0,
            playback_rate: config.playback_rate,
            pacing: config.pacing,
            looping: config.looping,
            follow: None,
        }
    }

    /// Pick up new pacing settings; the transport state is kept
    pub fn apply_config(&mut self, config: &PlannerConfig) {
        self.playback_rate = config.playback_rate;
        self.pacing = config.pacing;
        self.looping = config.looping;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == State::Playing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Start playing if the preconditions hold. Returns whether playback runs.
    pub fn play(&mut self, can_play: bool) -> bool {
        if self.is_playing() {
            return true;
        }
        if !can_play {
            debug!("playback refused, path or model not ready");
            return false;
        }
        info!(progress = self.progress, "playback started");
        self.state = State::Playing;
        true
    }

    /// Stop advancing, keeping the current progress
    pub fn pause(&mut self) {
        if self.is_playing() {
            info!(progress = self.progress, "playback paused");
            self.state = State::Stopped;
        }
    }

    /// Stop and rewind to the start of the path
    pub fn reset(&mut self) {
        self.state = State::Stopped;
        self.progress = 0.0;
    }

    /// Jump to a progress value, clamped to [0, 1]
    pub fn seek(&mut self, progress: f64) -> Result<f64, EngineError> {
        if !progress.is_finite() {
            return Err(EngineError::NonFiniteProgress(progress));
        }
        self.progress = progress.clamp(0.0, 1.0);
        Ok(self.progress)
    }

    /// Advance the clock by `delta` seconds.
    ///
    /// `path_length` is only used with constant-speed pacing. Negative
    /// durations count as zero.
    pub fn advance(&mut self, delta: f64, path_length: f64) -> Result<Advance, EngineError> {
        if !delta.is_finite() {
            return Err(EngineError::NonFiniteDelta(delta));
        }
        if !self.is_playing() {
            return Ok(Advance::Idle);
        }

        if delta <= 0.0 {
            return Ok(Advance::Progressed(self.progress));
        }
        self.progress += delta * self.rate(path_length);
        if self.progress >= 1.0 {
            self.progress = 0.0;
            if !self.looping {
                self.state = State::Stopped;
            }
            info!(looping = self.looping, "animation complete");
            return Ok(Advance::Completed);
        }
        Ok(Advance::Progressed(self.progress))
    }

    /// Progress gained per second
    pub fn rate(&self, path_length: f64) -> f64 {
        match self.pacing {
            Pacing::FixedDuration => self.playback_rate,
            Pacing::ConstantSpeed { speed } => {
                if path_length > f64::EPSILON {
                    speed / path_length
                } else {
                    // Zero-length path, finish on the next tick
                    f64::INFINITY
                }
            }
        }
    }

    /// Install or remove the follow callback
    pub fn set_follow_callback(&mut self, callback: Option<FollowCallback>) {
        self.follow = callback;
    }

    /// Hand the sampled position to the follow callback, if any
    pub fn notify_follow(&mut self, position: &Point3) {
        if let Some(follow) = self.follow.as_mut() {
            follow(position);
        }
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("progress", &self.progress)
            .field("playback_rate", &self.playback_rate)
            .field("pacing", &self.pacing)
            .field("looping", &self.looping)
            .field("follow", &self.follow.is_some())
            .finish()
    }
}
