//! Default swing scene for the Rapier world
//!
//! A static frame with a hanging string and seat, and a five-part ragdoll
//! sitting on the seat holding the string. Names match [`RigLayout::default`].

use glam::Vec2;

use super::world::{BodyKind, RapierWorld};
use crate::config::RigLayout;

/// Build the default scene. The swing sits at the world origin.
pub fn demo_scene() -> (RapierWorld, RigLayout) {
    let mut world = RapierWorld::new();

    // Swing rig
    let frame = world.add_body("frame", BodyKind::Static, Vec2::new(0.0, 8.0), 10.0);
    let string = world.add_body("string", BodyKind::Dynamic, Vec2::new(0.0, 3.5), 0.5);
    let seat = world.add_body("seat", BodyKind::Dynamic, Vec2::new(0.0, 0.0), 1.0);
    world.add_joint(string, frame);
    world.add_joint(seat, string);

    // Ragdoll
    let head_body = world.add_body("head_body", BodyKind::Dynamic, Vec2::new(0.0, 1.5), 3.0);
    let upper_arm = world.add_body("upper_arm", BodyKind::Dynamic, Vec2::new(0.6, 2.4), 1.0);
    let hand = world.add_body("hand", BodyKind::Dynamic, Vec2::new(0.3, 3.2), 0.5);
    let thigh = world.add_body("thigh", BodyKind::Dynamic, Vec2::new(0.9, 0.6), 1.5);
    let shin = world.add_body("shin", BodyKind::Dynamic, Vec2::new(1.4, -0.4), 1.0);

    world.add_joint(head_body, seat);
    world.add_joint(upper_arm, head_body);
    world.add_joint(hand, upper_arm);
    world.add_joint(hand, string);
    world.add_joint(thigh, head_body);
    world.add_joint(shin, thigh);

    (world, RigLayout::default())
}
