//! Physics world management with Rapier2D
//!
//! Named rigid bodies linked by revolute joints. The game never steps this
//! world itself; the host calls [`RapierWorld::step`] with the scaled time
//! after each game tick.

use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, JointHandle, PhysicsWorld, Pose};
use crate::consts::GRAVITY_CONSTANT;

/// Radius of gyration used for every body's moment of inertia
const GYRATION_RADIUS: f32 = 0.5;

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Moved by forces, impulses and joints
    Dynamic,
    /// Never moves on its own (swing frame, test anchors)
    Static,
}

#[derive(Debug, Clone)]
struct BodyEntry {
    name: String,
    handle: RigidBodyHandle,
    mass: f32,
}

#[derive(Debug, Clone, Copy)]
struct JointEntry {
    handle: ImpulseJointHandle,
    owner: BodyHandle,
    connected: BodyHandle,
}

/// Rapier-backed implementation of [`PhysicsWorld`]
pub struct RapierWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub ccd_solver: CCDSolver,
    /// World gravity, scaled per body by its gravity scale
    pub gravity: Vec2,
    bodies: Vec<BodyEntry>,
    joints: Vec<JointEntry>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vec2::new(0.0, -GRAVITY_CONSTANT),
            bodies: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Spawn a body at rest. Bodies carry no colliders: ragdoll parts pass
    /// through each other and the rig.
    pub fn add_body(
        &mut self,
        name: impl Into<String>,
        kind: BodyKind,
        position: Vec2,
        mass: f32,
    ) -> BodyHandle {
        let builder = match kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let inertia = mass * GYRATION_RADIUS * GYRATION_RADIUS;
        let rigid_body = builder
            .translation(vector![position.x, position.y])
            .additional_mass_properties(MassProperties::new(point![0.0, 0.0], mass, inertia))
            .angular_damping(0.05)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        // Mass properties are otherwise only refreshed by the first step
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }

        let id = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(BodyEntry {
            name: name.into(),
            handle,
            mass,
        });
        id
    }

    /// Pin two bodies together at the midpoint of their current centres.
    ///
    /// Both keep their separation and are free to rotate about the pin.
    pub fn add_joint(&mut self, owner: BodyHandle, connected: BodyHandle) -> JointHandle {
        let a = self.pose(owner);
        let b = self.pose(connected);
        let pin = (a.position + b.position) * 0.5;
        let anchor1 = Vec2::from_angle(-a.rotation).rotate(pin - a.position);
        let anchor2 = Vec2::from_angle(-b.rotation).rotate(pin - b.position);

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![anchor1.x, anchor1.y])
            .local_anchor2(point![anchor2.x, anchor2.y])
            .build();
        let (body1, body2) = (self.rapier_handle(owner), self.rapier_handle(connected));
        let handle = self.impulse_joint_set.insert(body1, body2, joint, true);

        let id = JointHandle(self.joints.len() as u32);
        self.joints.push(JointEntry {
            handle,
            owner,
            connected,
        });
        id
    }

    /// Advance the world by `dt` seconds of (already time-scaled) simulation
    /// time. Forces added since the last step are consumed.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &vector![self.gravity.x, self.gravity.y],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        for entry in &self.bodies {
            if let Some(body) = self.rigid_body_set.get_mut(entry.handle) {
                body.reset_forces(false);
            }
        }
    }

    /// Force waiting to be integrated on the next step
    pub fn pending_force(&self, body: BodyHandle) -> Vec2 {
        self.rigid_body(body)
            .map(|rb| Vec2::new(rb.user_force().x, rb.user_force().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn gravity_scale(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).map_or(1.0, |rb| rb.gravity_scale())
    }

    /// Names of every body, in creation order
    pub fn body_names(&self) -> impl Iterator<Item = (BodyHandle, &str)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, entry)| (BodyHandle(i as u32), entry.name.as_str()))
    }

    fn rapier_handle(&self, body: BodyHandle) -> RigidBodyHandle {
        self.bodies[body.0 as usize].handle
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&RigidBody> {
        let entry = self.bodies.get(body.0 as usize)?;
        self.rigid_body_set.get(entry.handle)
    }

    fn rigid_body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let entry = self.bodies.get(body.0 as usize)?;
        self.rigid_body_set.get_mut(entry.handle)
    }
}

impl PhysicsWorld for RapierWorld {
    fn find_body(&self, name: &str) -> Option<BodyHandle> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .map(|i| BodyHandle(i as u32))
    }

    fn pose(&self, body: BodyHandle) -> Pose {
        self.rigid_body(body)
            .map(|rb| {
                let t = rb.translation();
                Pose::new(Vec2::new(t.x, t.y), rb.rotation().angle())
            })
            .unwrap_or_default()
    }

    fn set_pose(&mut self, body: BodyHandle, pose: Pose) {
        if let Some(rb) = self.rigid_body_mut(body) {
            let translation = vector![pose.position.x, pose.position.y];
            rb.set_position(Isometry::new(translation, pose.rotation), true);
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vec2 {
        self.rigid_body(body)
            .map(|rb| Vec2::new(rb.linvel().x, rb.linvel().y))
            .unwrap_or(Vec2::ZERO)
    }

    fn angular_velocity(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).map_or(0.0, |rb| rb.angvel())
    }

    fn set_velocity(&mut self, body: BodyHandle, linear: Vec2, angular: f32) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_linvel(vector![linear.x, linear.y], true);
            rb.set_angvel(angular, true);
        }
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.bodies.get(body.0 as usize).map_or(0.0, |b| b.mass)
    }

    fn linear_drag(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).map_or(0.0, |rb| rb.linear_damping())
    }

    fn angular_drag(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).map_or(0.0, |rb| rb.angular_damping())
    }

    fn set_drag(&mut self, body: BodyHandle, linear: f32, angular: f32) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_linear_damping(linear);
            rb.set_angular_damping(angular);
        }
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_gravity_scale(scale, true);
        }
    }

    fn add_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.add_force(vector![force.x, force.y], true);
        }
    }

    fn add_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    fn joints_of(&self, body: BodyHandle) -> Vec<JointHandle> {
        self.joints
            .iter()
            .enumerate()
            .filter(|(_, j)| j.owner == body)
            .map(|(i, _)| JointHandle(i as u32))
            .collect()
    }

    fn joint_bodies(&self, joint: JointHandle) -> (BodyHandle, BodyHandle) {
        let entry = self.joints[joint.0 as usize];
        (entry.owner, entry.connected)
    }

    fn joint_enabled(&self, joint: JointHandle) -> bool {
        self.joints
            .get(joint.0 as usize)
            .and_then(|entry| self.impulse_joint_set.get(entry.handle))
            .is_some_and(|j| j.data.is_enabled())
    }

    fn set_joint_enabled(&mut self, joint: JointHandle, enabled: bool) {
        let Some(entry) = self.joints.get(joint.0 as usize) else {
            return;
        };
        let handle = entry.handle;
        // Bodies never sleep, so nothing needs waking here
        if let Some((_, j)) = self.impulse_joint_set.iter_mut().find(|(h, _)| *h == handle) {
            j.data.set_enabled(enabled);
        }
    }
}
