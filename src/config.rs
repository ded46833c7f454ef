//! Game tuning and rig layout
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! JSON file only needs the values it wants to override.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// The gravity well the ragdoll falls toward after launch.
///
/// The swing hangs at the world origin; by default the planet sits below it
/// with its surface `PLANET_ALTITUDE` under the swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Planet {
    pub center: Vec2,
    pub radius: f32,
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.0, -(PLANET_RADIUS + PLANET_ALTITUDE)),
            radius: PLANET_RADIUS,
        }
    }
}

/// Names of the bodies that make up the player and the swing.
///
/// Resolved against the physics world once, at registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigLayout {
    /// Ragdoll bodies, in a stable order
    pub ragdoll: Vec<String>,
    /// Cosmetic swing bodies that are reset at each run start
    pub rig: Vec<String>,
    /// Ragdoll body holding the tether
    pub hand: String,
    /// Swing body the hand hangs from
    pub string: String,
    /// Ragdoll body that sits on the seat (followed by the camera)
    pub head: String,
    /// Swing body the head-body rests on
    pub seat: String,
}

impl Default for RigLayout {
    fn default() -> Self {
        Self {
            ragdoll: ["head_body", "upper_arm", "hand", "thigh", "shin"]
                .into_iter()
                .map(String::from)
                .collect(),
            rig: ["frame", "string", "seat"]
                .into_iter()
                .map(String::from)
                .collect(),
            hand: "hand".into(),
            string: "string".into(),
            head: "head_body".into(),
            seat: "seat".into(),
        }
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Gravity ===
    pub gravity: f32,
    pub gravity_divider: f32,
    pub swing_deadzone: f32,

    // === Pacing ===
    pub return_window: f32,
    pub pacing_base: f32,

    // === Return ===
    pub settle_radius: f32,
    pub spring_gain: f32,
    pub spring_bias: f32,
    pub return_drag: f32,

    // === Launch ===
    pub launch_impulse: f32,
    pub end_game_score: f32,

    // === Cosmetics ===
    /// Number of multi-frame sprites a successful undo can advance
    pub sprite_count: u32,
    /// Seed for cosmetic picks
    pub seed: u64,

    pub planet: Planet,
    pub rig: RigLayout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_CONSTANT,
            gravity_divider: GRAVITY_DIVIDER,
            swing_deadzone: SWING_DEADZONE,

            return_window: RETURN_WINDOW,
            pacing_base: PACING_BASE,

            settle_radius: SETTLE_RADIUS,
            spring_gain: SPRING_GAIN,
            spring_bias: SPRING_BIAS,
            return_drag: RETURN_DRAG,

            launch_impulse: LAUNCH_IMPULSE,
            end_game_score: END_GAME_SCORE,

            sprite_count: 4,
            seed: 0x5EED,

            planet: Planet::default(),
            rig: RigLayout::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("gravity", self.gravity),
            ("gravity_divider", self.gravity_divider),
            ("return_window", self.return_window),
            ("pacing_base", self.pacing_base),
            ("settle_radius", self.settle_radius),
            ("end_game_score", self.end_game_score),
            ("planet.radius", self.planet.radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::config(format!(
                    "{name} = {value} must be a positive finite number"
                )));
            }
        }

        let non_negative = [
            ("swing_deadzone", self.swing_deadzone),
            ("spring_gain", self.spring_gain),
            ("spring_bias", self.spring_bias),
            ("return_drag", self.return_drag),
            ("launch_impulse", self.launch_impulse),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimError::config(format!(
                    "{name} = {value} must be a non-negative finite number"
                )));
            }
        }

        if self.rig.ragdoll.is_empty() {
            return Err(SimError::config("rig.ragdoll lists no bodies"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity, GRAVITY_CONSTANT);
        assert_eq!(tuning.return_window, RETURN_WINDOW);
        assert_eq!(tuning.settle_radius, SETTLE_RADIUS);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning =
            Tuning::from_json_str(r#"{ "gravity": 4.9, "planet": { "radius": 50.0 } }"#).unwrap();
        assert_eq!(tuning.gravity, 4.9);
        assert_eq!(tuning.planet.radius, 50.0);
        assert_eq!(tuning.planet.center, Planet::default().center);
        assert_eq!(tuning.pacing_base, PACING_BASE);
        assert_eq!(tuning.rig, RigLayout::default());
    }

    #[test]
    fn test_default_planet_sits_below_swing() {
        let planet = Planet::default();
        assert_eq!(planet.center.y + planet.radius, -PLANET_ALTITUDE);
        assert_eq!(planet.center.x, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = Tuning::from_json_str(r#"{ "settle_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ gravity: ").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
