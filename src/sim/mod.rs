//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, with real elapsed time passed in
//! - Seeded RNG only
//! - Stable iteration order (registry order)
//! - No rendering, audio or platform dependencies

pub mod gravity;
pub mod machine;
pub mod pacing;
pub mod physics;
pub mod registry;
pub mod scene;
pub mod state;
pub mod tick;
pub mod world;

pub use gravity::GravityModel;
pub use machine::{GameStateMachine, aberration_for_deaths};
pub use pacing::{Pacing, Score};
pub use physics::{BodyHandle, JointHandle, PhysicsWorld, Pose};
pub use registry::PhysicsBodyRegistry;
pub use scene::demo_scene;
pub use state::{GameEvent, GameState, HudMessage};
pub use tick::{TickInput, tick};
pub use world::{BodyKind, RapierWorld};
