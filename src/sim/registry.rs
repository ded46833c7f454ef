//! Ragdoll body and joint bookkeeping
//!
//! Resolves the rig layout against the physics world once, at startup, and
//! keeps the rest pose every body returns to after a death.

use super::physics::{BodyHandle, JointHandle, PhysicsWorld, Pose};
use crate::config::RigLayout;
use crate::error::{SimError, SimResult};

/// Bodies and joints that make up the player ragdoll and the swing rig
#[derive(Debug, Clone)]
pub struct PhysicsBodyRegistry {
    /// Ragdoll bodies, in layout order
    bodies: Vec<BodyHandle>,
    /// Rest pose per ragdoll body (same order as `bodies`)
    rest_poses: Vec<Pose>,
    /// Every joint owned by a ragdoll body
    joints: Vec<JointHandle>,
    /// Cosmetic swing bodies and their rest poses
    rig: Vec<(BodyHandle, Pose)>,
    head: BodyHandle,
    tether: JointHandle,
    seat: JointHandle,
}

fn resolve(world: &impl PhysicsWorld, name: &str) -> SimResult<BodyHandle> {
    world
        .find_body(name)
        .ok_or_else(|| SimError::config(format!("body '{name}' not found in physics world")))
}

/// The joint owned by `owner` whose other end is `connected`
fn joint_between(
    world: &impl PhysicsWorld,
    owner: BodyHandle,
    connected: BodyHandle,
) -> Option<JointHandle> {
    world
        .joints_of(owner)
        .into_iter()
        .find(|&j| world.joint_bodies(j).1 == connected)
}

impl PhysicsBodyRegistry {
    /// Resolve `layout` against `world`, capture rest poses and hand gravity
    /// over to the game (every ragdoll body gets a gravity scale of 0).
    ///
    /// Fails if any named body is missing, if the hand or head is not part of
    /// the ragdoll, or if the tether or seat joint cannot be found.
    pub fn new(world: &mut impl PhysicsWorld, layout: &RigLayout) -> SimResult<Self> {
        let bodies = layout
            .ragdoll
            .iter()
            .map(|name| resolve(&*world, name))
            .collect::<SimResult<Vec<_>>>()?;
        if bodies.is_empty() {
            return Err(SimError::config("ragdoll has no bodies"));
        }

        let rig = layout
            .rig
            .iter()
            .map(|name| resolve(&*world, name).map(|b| (b, world.pose(b))))
            .collect::<SimResult<Vec<_>>>()?;

        let hand = resolve(&*world, &layout.hand)?;
        let string = resolve(&*world, &layout.string)?;
        let head = resolve(&*world, &layout.head)?;
        let seat_body = resolve(&*world, &layout.seat)?;
        for (role, body) in [("hand", hand), ("head", head)] {
            if !bodies.contains(&body) {
                return Err(SimError::config(format!(
                    "{role} body is not part of the ragdoll"
                )));
            }
        }

        let tether = joint_between(&*world, hand, string).ok_or_else(|| {
            SimError::config(format!(
                "no joint from '{}' to '{}' (tether)",
                layout.hand, layout.string
            ))
        })?;
        let seat = joint_between(&*world, head, seat_body).ok_or_else(|| {
            SimError::config(format!(
                "no joint from '{}' to '{}' (seat)",
                layout.head, layout.seat
            ))
        })?;

        let joints = bodies
            .iter()
            .flat_map(|&b| world.joints_of(b))
            .collect::<Vec<_>>();

        let mut registry = Self {
            rest_poses: Vec::with_capacity(bodies.len()),
            bodies,
            joints,
            rig,
            head,
            tether,
            seat,
        };
        registry.capture_rest_pose(&*world);
        for &body in &registry.bodies {
            world.set_gravity_scale(body, 0.0);
        }

        log::info!(
            "Registry ready: {} bodies, {} joints, {} rig parts",
            registry.bodies.len(),
            registry.joints.len(),
            registry.rig.len()
        );
        Ok(registry)
    }

    /// Record every ragdoll body's current pose as its rest pose
    pub fn capture_rest_pose(&mut self, world: &impl PhysicsWorld) {
        self.rest_poses = self.bodies.iter().map(|&b| world.pose(b)).collect();
    }

    /// Move a ragdoll body back to its rest pose.
    ///
    /// Velocities are left alone; callers decide whether to zero them.
    pub fn restore_pose(&self, world: &mut impl PhysicsWorld, body: BodyHandle) {
        if let Some(pose) = self.rest_pose(body) {
            world.set_pose(body, pose);
        }
    }

    /// Put every swing rig part back where it started
    pub fn restore_rig(&self, world: &mut impl PhysicsWorld) {
        for &(body, pose) in &self.rig {
            world.set_pose(body, pose);
            world.set_velocity(body, glam::Vec2::ZERO, 0.0);
        }
    }

    pub fn rest_pose(&self, body: BodyHandle) -> Option<Pose> {
        self.bodies
            .iter()
            .position(|&b| b == body)
            .map(|i| self.rest_poses[i])
    }

    /// Ragdoll bodies paired with their rest poses
    pub fn bodies_with_rest(&self) -> impl Iterator<Item = (BodyHandle, Pose)> + '_ {
        self.bodies.iter().copied().zip(self.rest_poses.iter().copied())
    }

    pub fn all_bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    pub fn all_joints(&self) -> &[JointHandle] {
        &self.joints
    }

    pub fn rig_bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.rig.iter().map(|&(b, _)| b)
    }

    /// The joint owned by `a` whose other end is `b`
    pub fn find_joint(
        &self,
        world: &impl PhysicsWorld,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<JointHandle> {
        joint_between(world, a, b)
    }

    /// Joints owned by `body`, excluding the tether and seat
    pub fn owned_joints(&self, world: &impl PhysicsWorld, body: BodyHandle) -> Vec<JointHandle> {
        world
            .joints_of(body)
            .into_iter()
            .filter(|&j| !self.is_severed_on_launch(j))
            .collect()
    }

    /// Tether and seat: the two joints cut when the player lets go
    pub fn is_severed_on_launch(&self, joint: JointHandle) -> bool {
        joint == self.tether || joint == self.seat
    }

    pub fn head(&self) -> BodyHandle {
        self.head
    }

    pub fn tether(&self) -> JointHandle {
        self.tether
    }

    pub fn seat(&self) -> JointHandle {
        self.seat
    }
}
