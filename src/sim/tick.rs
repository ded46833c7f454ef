//! Fixed timestep simulation tick
//!
//! One call per physics tick: consume this tick's input, run at most one
//! transition, then the current state's update. Stepping the physics world
//! (by `dt * time_scale`) is left to the caller.

use glam::Vec2;

use super::machine::GameStateMachine;
use super::physics::PhysicsWorld;
use super::registry::PhysicsBodyRegistry;
use super::state::GameEvent;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Stick plus directional keys, each axis in [-1, 1] before combining
    pub direction: Vec2,
    /// Release pressed this tick (space)
    pub release: bool,
    /// Undo pressed this tick (ctrl+z)
    pub undo: bool,
    /// The ragdoll hit something fatal this tick
    pub died: bool,
}

/// Advance the game by one tick. Returns the events raised during it.
///
/// A death signal takes the tick's one transition; otherwise release wins
/// over undo.
pub fn tick(
    machine: &mut GameStateMachine,
    world: &mut impl PhysicsWorld,
    registry: &PhysicsBodyRegistry,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let died = input.died && machine.die(world, registry);
    if !died {
        if input.release {
            machine.release(world, registry);
        } else if input.undo {
            machine.undo();
        }
    }

    machine.update(world, registry, input.direction, dt);
    machine.drain_events()
}
