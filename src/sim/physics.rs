//! Rigid-body interface the game drives
//!
//! The core never integrates motion itself. It reads and writes body state,
//! applies forces and impulses, and toggles joints through this trait; the
//! host engine does the rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index of a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Index of a joint in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointHandle(pub u32);

/// World-space position and rotation (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: f32,
}

impl Pose {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }
}

/// Operations the game needs from a 2D rigid-body engine
pub trait PhysicsWorld {
    /// Look up a body by its scene name
    fn find_body(&self, name: &str) -> Option<BodyHandle>;

    fn pose(&self, body: BodyHandle) -> Pose;
    fn set_pose(&mut self, body: BodyHandle, pose: Pose);

    fn linear_velocity(&self, body: BodyHandle) -> Vec2;
    fn angular_velocity(&self, body: BodyHandle) -> f32;
    fn set_velocity(&mut self, body: BodyHandle, linear: Vec2, angular: f32);

    fn mass(&self, body: BodyHandle) -> f32;
    fn linear_drag(&self, body: BodyHandle) -> f32;
    fn angular_drag(&self, body: BodyHandle) -> f32;
    fn set_drag(&mut self, body: BodyHandle, linear: f32, angular: f32);
    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32);

    /// Continuous force, integrated over the next step
    fn add_force(&mut self, body: BodyHandle, force: Vec2);
    /// Instantaneous change in momentum
    fn add_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Joints attached to `body` as their owner
    fn joints_of(&self, body: BodyHandle) -> Vec<JointHandle>;
    /// `(owner, connected)` bodies of a joint
    fn joint_bodies(&self, joint: JointHandle) -> (BodyHandle, BodyHandle);
    fn joint_enabled(&self, joint: JointHandle) -> bool;
    fn set_joint_enabled(&mut self, joint: JointHandle, enabled: bool);

    /// Convenience: current position only
    fn position(&self, body: BodyHandle) -> Vec2 {
        self.pose(body).position
    }
}
