//! Distance score and the bullet-time ramp
//!
//! The ramp is a presentation curve, not physics: after a launch (and while
//! the ragdoll is pulled home) the time scale grows geometrically as the
//! countdown runs out.

use serde::{Deserialize, Serialize};

/// Best distance reached in the current run, plus the session best
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    current: f32,
    best: f32,
}

impl Score {
    /// Record a distance sample; the score only ever grows within a run
    pub fn record(&mut self, distance: f32) {
        if distance.is_finite() {
            self.current = self.current.max(distance);
            self.best = self.best.max(self.current);
        }
    }

    /// Start a new run. The session best survives.
    pub fn reset(&mut self) {
        self.current = 0.0;
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn best(&self) -> f32 {
        self.best
    }

    /// Whole units, as shown on the HUD
    pub fn display(&self) -> u32 {
        self.current as u32
    }
}

/// Countdown plus the time scale derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    /// Length of a full countdown (seconds)
    pub window: f32,
    /// Base of the geometric ramp
    pub base: f32,
    wait_time: f32,
    time_scale: f32,
}

impl Pacing {
    pub fn new(window: f32, base: f32) -> Self {
        Self {
            window,
            base,
            wait_time: 0.0,
            time_scale: 1.0,
        }
    }

    /// Restart the countdown from a full window
    pub fn start(&mut self) {
        self.wait_time = self.window;
    }

    /// Stop the ramp and return to real time
    pub fn freeze(&mut self) {
        self.wait_time = 0.0;
        self.time_scale = 1.0;
    }

    /// Run down the countdown by real elapsed time and update the time scale
    pub fn advance(&mut self, dt: f32) {
        self.wait_time = (self.wait_time - dt.max(0.0)).max(0.0);
        self.time_scale = self.scale_at(self.wait_time);
    }

    /// `base^(window - wait_time)`
    pub fn scale_at(&self, wait_time: f32) -> f32 {
        self.base.powf(self.window - wait_time)
    }

    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_running(&self) -> bool {
        self.wait_time > 0.0
    }

    pub fn expired(&self) -> bool {
        self.wait_time <= 0.0
    }
}
