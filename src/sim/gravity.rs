//! Manually applied gravity
//!
//! Ragdoll bodies have their engine gravity switched off; every tick the game
//! pushes them with one of two force fields depending on the state:
//! - swing: a player-steered uniform pull that can never point up
//! - launch: inverse-square attraction toward the planet, eased by deaths

use glam::Vec2;

use super::physics::PhysicsWorld;
use super::registry::PhysicsBodyRegistry;
use crate::config::{Planet, Tuning};

/// Force-field parameters, copied out of [`Tuning`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    pub gravity: f32,
    pub gravity_divider: f32,
    pub swing_deadzone: f32,
    pub planet: Planet,
}

impl GravityModel {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            gravity: tuning.gravity,
            gravity_divider: tuning.gravity_divider,
            swing_deadzone: tuning.swing_deadzone,
            planet: tuning.planet,
        }
    }

    /// Direction of the swing pull for a raw stick/keys sample.
    ///
    /// Clamped to unit length, folded so it never points up, and replaced by
    /// straight down inside the deadzone.
    pub fn swing_direction(&self, input: Vec2) -> Vec2 {
        let clamped = input.clamp_length_max(1.0);
        let folded = Vec2::new(clamped.x, -clamped.y.abs());
        if !folded.is_finite() || folded.length() < self.swing_deadzone {
            return Vec2::NEG_Y;
        }
        folded
    }

    /// Force applied to each ragdoll body while swinging
    pub fn swing_force(&self, input: Vec2) -> Vec2 {
        self.swing_direction(input) * self.gravity
    }

    /// Height used by the falloff: the body's height above the planet centre
    /// plus one radius, never below zero.
    pub fn height(&self, position: Vec2) -> f32 {
        ((position.y - self.planet.center.y) + self.planet.radius).max(0.0)
    }

    /// Launch gravity strength at `height`, softened by `death_count`
    pub fn launch_magnitude(&self, height: f32, death_count: u32) -> f32 {
        let ease = 1.0 / (death_count as f32 / self.gravity_divider + 1.0);
        let falloff = (1.0 + height.max(0.0) / self.planet.radius).powi(2);
        ease * self.gravity / falloff
    }

    /// Launch-phase force on a body at `position`
    pub fn launch_force(&self, position: Vec2, death_count: u32) -> Vec2 {
        let toward = (self.planet.center - position).normalize_or_zero();
        toward * self.launch_magnitude(self.height(position), death_count)
    }

    /// Push every ragdoll body with the swing field
    pub fn apply_swing(
        &self,
        world: &mut impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
        input: Vec2,
    ) {
        let force = self.swing_force(input);
        for &body in registry.all_bodies() {
            world.add_force(body, force);
        }
    }

    /// Pull every ragdoll body toward the planet
    pub fn apply_launch(
        &self,
        world: &mut impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
        death_count: u32,
    ) {
        for &body in registry.all_bodies() {
            let force = self.launch_force(world.position(body), death_count);
            world.add_force(body, force);
        }
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
