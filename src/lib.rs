//! Tether Fall - swing a ragdoll, let go, and fall as far as you can
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, registry, state machine, pacing)
//! - `bridge`: Values and events handed to presentation (camera, HUD, audio)
//! - `config`: Data-driven tuning loaded from JSON
//! - `error`: Error taxonomy shared by the core

pub mod bridge;
pub mod config;
pub mod error;
pub mod sim;

pub use bridge::{PresentationBridge, PresentationFrame};
pub use config::{Planet, RigLayout, Tuning};
pub use error::{SimError, SimResult};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the physics step)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravity acceleration used by both swing and launch modes
    pub const GRAVITY_CONSTANT: f32 = 9.8;
    /// Each `GRAVITY_DIVIDER` deaths adds another unit to the launch gravity divisor
    pub const GRAVITY_DIVIDER: f32 = 3.0;
    /// Input below this magnitude falls back to straight down
    pub const SWING_DEADZONE: f32 = 0.1;

    /// Seconds of slow-motion recovery after launch and during return
    pub const RETURN_WINDOW: f32 = 15.0;
    /// Base of the geometric time-scale ramp
    pub const PACING_BASE: f32 = 1.15;

    /// Distance under which a returning body snaps back to rest
    pub const SETTLE_RADIUS: f32 = 3.0;
    /// Restoring force per unit of distance (scaled by mass)
    pub const SPRING_GAIN: f32 = 1.0;
    /// Constant part of the restoring force (scaled by mass)
    pub const SPRING_BIAS: f32 = 2.0;
    /// Linear drag while a body is being pulled home
    pub const RETURN_DRAG: f32 = 0.1;

    /// Downward impulse on the head when the player taps release mid-flight
    pub const LAUNCH_IMPULSE: f32 = 1000.0;

    /// Distance at which office and space ambiance cross over
    pub const END_GAME_SCORE: f32 = 300.0;

    /// Default planet radius
    pub const PLANET_RADIUS: f32 = 100.0;
    /// Height of the swing above the default planet's surface
    pub const PLANET_ALTITUDE: f32 = 100.0;
}

/// Logistic function
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid rescaled so that `x = 0` maps to 0 and the range is (-1, 1)
#[inline]
pub fn sigmoid_from_zero(x: f32) -> f32 {
    (sigmoid(x) - 0.5) * 2.0
}

/// Sigmoid centred on `shift` with `shift` as its horizontal scale.
///
/// Not clamped: inputs below `shift` give negative values down to about
/// -0.46 at `x = 0`.
#[inline]
pub fn sigmoid_shifted(x: f32, shift: f32) -> f32 {
    sigmoid_from_zero((x - shift) / shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert_eq!(sigmoid_from_zero(0.0), 0.0);
    }

    #[test]
    fn test_sigmoid_shifted_crossover() {
        assert_eq!(sigmoid_shifted(consts::END_GAME_SCORE, consts::END_GAME_SCORE), 0.0);
        // 2 * (sigmoid(-1) - 0.5)
        let at_origin = sigmoid_shifted(0.0, consts::END_GAME_SCORE);
        assert!((at_origin + 0.462_117).abs() < 1e-4);
        assert!(sigmoid_shifted(600.0, consts::END_GAME_SCORE) > 0.46);
    }
}
