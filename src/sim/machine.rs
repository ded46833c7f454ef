//! The swing → launch → dead → return loop
//!
//! One owned [`GameStateMachine`] holds everything that persists between
//! ticks: the state, the run's score, the pacing countdown and the session
//! death counter. Transitions and per-state updates act on the physics world
//! through [`PhysicsWorld`] and never step it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::gravity::GravityModel;
use super::pacing::{Pacing, Score};
use super::physics::{BodyHandle, PhysicsWorld};
use super::registry::PhysicsBodyRegistry;
use super::state::{GameEvent, GameState, HudMessage};
use crate::config::Tuning;
use crate::error::SimResult;
use crate::sigmoid_from_zero;

/// Chromatic aberration for a given number of deaths
pub fn aberration_for_deaths(death_count: u32) -> f32 {
    (0.5 * sigmoid_from_zero(death_count as f32 * 0.2)).min(1.0)
}

/// Game state machine (one per session)
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    state: GameState,
    score: Score,
    pacing: Pacing,
    /// Deaths this session; never reset
    death_count: u32,
    gravity: GravityModel,
    tuning: Tuning,
    hud: HudMessage,
    /// Post-processing intensity, recomputed at each run start
    aberration: f32,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Ticks since the machine was created
    time_ticks: u64,
}

impl GameStateMachine {
    /// Build the machine and put the world in its starting pose
    pub fn new(
        tuning: &Tuning,
        world: &mut impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
    ) -> SimResult<Self> {
        tuning.validate()?;
        let mut machine = Self {
            state: GameState::Swing,
            score: Score::default(),
            pacing: Pacing::new(tuning.return_window, tuning.pacing_base),
            death_count: 0,
            gravity: GravityModel::from_tuning(tuning),
            tuning: tuning.clone(),
            hud: HudMessage::Instructions,
            aberration: 0.0,
            rng: Pcg32::seed_from_u64(tuning.seed),
            events: Vec::new(),
            time_ticks: 0,
        };
        machine.restart(world, registry);
        machine.events.clear();
        Ok(machine)
    }

    fn set_state(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        log::info!("State {} -> {}", from, to);
        self.state = to;
        self.events.push(GameEvent::StateChanged { from, to });
    }

    // === Transitions ===

    /// The release action. Its meaning depends on the state: let go of the
    /// swing, kick downward mid-flight, summon the bodies back, or complain
    /// that they are already on their way.
    pub fn release(&mut self, world: &mut impl PhysicsWorld, registry: &PhysicsBodyRegistry) {
        match self.state {
            GameState::Swing => self.launch(world, registry),
            GameState::Launch => {
                let impulse = Vec2::new(0.0, -self.tuning.launch_impulse);
                world.add_impulse(registry.head(), impulse);
                self.events.push(GameEvent::Impulse { impulse });
            }
            GameState::Dead => self.begin_return(),
            GameState::Return => {
                log::warn!("Release pressed while bodies are still returning");
                self.hud = HudMessage::TooEarly;
                self.events.push(GameEvent::EarlyRelease);
            }
        }
    }

    /// The undo action: only meaningful after death
    pub fn undo(&mut self) {
        if self.state == GameState::Dead {
            self.begin_return();
        }
    }

    /// External death signal (collision with the ground, out of bounds, ...)
    ///
    /// Returns whether the signal caused a transition.
    pub fn die(&mut self, world: &mut impl PhysicsWorld, registry: &PhysicsBodyRegistry) -> bool {
        if !matches!(self.state, GameState::Swing | GameState::Launch) {
            log::debug!("Ignoring death signal in {}", self.state);
            return false;
        }

        self.set_state(GameState::Dead);
        self.pacing.freeze();
        self.death_count += 1;
        for &joint in registry.all_joints() {
            world.set_joint_enabled(joint, false);
        }

        let score = self.score.display();
        self.hud = HudMessage::Summary {
            score,
            deaths: self.death_count,
        };
        self.events.push(GameEvent::Died {
            death_count: self.death_count,
            score,
        });
        true
    }

    fn launch(&mut self, world: &mut impl PhysicsWorld, registry: &PhysicsBodyRegistry) {
        world.set_joint_enabled(registry.tether(), false);
        world.set_joint_enabled(registry.seat(), false);
        self.set_state(GameState::Launch);
        self.pacing.start();
        self.hud = self.flight_hud();
    }

    fn begin_return(&mut self) {
        self.set_state(GameState::Return);
        self.pacing.start();
        self.hud = HudMessage::Hidden;
        if self.tuning.sprite_count > 0 {
            let index = self.rng.random_range(0..self.tuning.sprite_count);
            self.events.push(GameEvent::SpriteAdvance { index });
        }
    }

    /// Full restart: back on the swing with a fresh score.
    ///
    /// The death counter is kept.
    pub fn restart(&mut self, world: &mut impl PhysicsWorld, registry: &PhysicsBodyRegistry) {
        self.set_state(GameState::Swing);
        self.score.reset();
        self.pacing.freeze();

        for &joint in registry.all_joints() {
            world.set_joint_enabled(joint, true);
        }
        registry.restore_rig(world);
        for &body in registry.all_bodies() {
            settle(world, registry, body);
        }

        self.aberration = aberration_for_deaths(self.death_count);
        self.hud = HudMessage::Instructions;
        self.events.push(GameEvent::Restarted);
        log::info!(
            "Run started (deaths so far: {}, best: {})",
            self.death_count,
            self.score.best() as u32
        );
    }

    // === Per-tick updates ===

    /// Apply the current state's forces and advance its timers.
    ///
    /// `dt` is real elapsed time, independent of the time scale.
    pub fn update(
        &mut self,
        world: &mut impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
        direction: Vec2,
        dt: f32,
    ) {
        self.time_ticks += 1;
        match self.state {
            GameState::Swing => self.gravity.apply_swing(world, registry, direction),
            GameState::Launch => {
                self.gravity.apply_launch(world, registry, self.death_count);
                self.track_distance(&*world, registry);
                if self.pacing.is_running() {
                    self.pacing.advance(dt);
                }
                self.hud = self.flight_hud();
            }
            GameState::Dead => {
                self.gravity.apply_launch(world, registry, self.death_count);
                self.track_distance(&*world, registry);
            }
            GameState::Return => self.update_return(world, registry, dt),
        }
    }

    /// Score is the head's distance from the swing anchor at the world origin
    fn track_distance(&mut self, world: &impl PhysicsWorld, registry: &PhysicsBodyRegistry) {
        let head = world.position(registry.head());
        self.score.record(head.length());
    }

    fn update_return(
        &mut self,
        world: &mut impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
        dt: f32,
    ) {
        self.pacing.advance(dt);
        let expired = self.pacing.expired();

        let mut returning = 0;
        for (body, rest) in registry.bodies_with_rest() {
            let offset = rest.position - world.position(body);
            let distance = offset.length();

            if distance < self.tuning.settle_radius || expired {
                settle(world, registry, body);
                for joint in registry.owned_joints(&*world, body) {
                    world.set_joint_enabled(joint, true);
                }
                continue;
            }

            let dir = offset / distance;
            let mass = world.mass(body);
            let pull = dir * (distance * self.tuning.spring_gain + self.tuning.spring_bias) * mass;
            world.add_force(body, pull);
            let angular_drag = world.angular_drag(body);
            world.set_drag(body, self.tuning.return_drag, angular_drag);
            returning += 1;
        }

        if returning == 0 {
            self.restart(world, registry);
        } else {
            log::debug!(
                "{} bodies still returning, {:.2}s left",
                returning,
                self.pacing.wait_time()
            );
        }
    }

    fn flight_hud(&self) -> HudMessage {
        HudMessage::Flight {
            score: self.score.display(),
            past_end: self.score.current() > self.tuning.end_game_score,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn death_count(&self) -> u32 {
        self.death_count
    }

    pub fn wait_time(&self) -> f32 {
        self.pacing.wait_time()
    }

    pub fn time_scale(&self) -> f32 {
        self.pacing.time_scale()
    }

    pub fn hud(&self) -> HudMessage {
        self.hud
    }

    pub fn aberration(&self) -> f32 {
        self.aberration
    }

    pub fn gravity(&self) -> &GravityModel {
        &self.gravity
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Snap a body back to its rest pose and stop it dead
fn settle(world: &mut impl PhysicsWorld, registry: &PhysicsBodyRegistry, body: BodyHandle) {
    registry.restore_pose(world, body);
    world.set_velocity(body, Vec2::ZERO, 0.0);
    world.set_drag(body, 0.0, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::physics::Pose;
    use crate::sim::scene::demo_scene;
    use crate::sim::world::RapierWorld;

    fn setup() -> (RapierWorld, PhysicsBodyRegistry, GameStateMachine) {
        let (mut world, layout) = demo_scene();
        let registry = PhysicsBodyRegistry::new(&mut world, &layout).unwrap();
        let machine = GameStateMachine::new(&Tuning::default(), &mut world, &registry).unwrap();
        (world, registry, machine)
    }

    #[test]
    fn test_starts_on_swing_with_joints_enabled() {
        let (world, registry, machine) = setup();
        assert_eq!(machine.state(), GameState::Swing);
        assert_eq!(machine.score().current(), 0.0);
        assert_eq!(machine.time_scale(), 1.0);
        assert_eq!(machine.hud(), HudMessage::Instructions);
        assert!(registry.all_joints().iter().all(|&j| world.joint_enabled(j)));
    }

    #[test]
    fn test_release_cuts_tether_and_seat_only() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);

        assert_eq!(machine.state(), GameState::Launch);
        assert_eq!(machine.wait_time(), RETURN_WINDOW);
        assert!(!world.joint_enabled(registry.tether()));
        assert!(!world.joint_enabled(registry.seat()));
        let internal = registry
            .all_joints()
            .iter()
            .filter(|&&j| !registry.is_severed_on_launch(j));
        for &joint in internal {
            assert!(world.joint_enabled(joint));
        }
    }

    #[test]
    fn test_release_in_flight_kicks_head() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        machine.drain_events();

        machine.release(&mut world, &registry);
        assert_eq!(machine.state(), GameState::Launch);
        let head_mass = world.mass(registry.head());
        let expected = -LAUNCH_IMPULSE / head_mass;
        assert!((world.linear_velocity(registry.head()).y - expected).abs() < 1e-3);
        assert_eq!(
            machine.drain_events(),
            vec![GameEvent::Impulse {
                impulse: Vec2::new(0.0, -LAUNCH_IMPULSE)
            }]
        );
    }

    #[test]
    fn test_death_disables_everything_and_counts() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        machine.update(&mut world, &registry, Vec2::ZERO, 1.0);
        assert!(machine.time_scale() > 1.0);

        assert!(machine.die(&mut world, &registry));
        assert_eq!(machine.state(), GameState::Dead);
        assert_eq!(machine.death_count(), 1);
        assert_eq!(machine.time_scale(), 1.0);
        assert_eq!(machine.wait_time(), 0.0);
        assert!(registry.all_joints().iter().all(|&j| !world.joint_enabled(j)));

        // Already dead: no double count
        assert!(!machine.die(&mut world, &registry));
        assert_eq!(machine.death_count(), 1);
    }

    #[test]
    fn test_death_from_swing() {
        let (mut world, registry, mut machine) = setup();
        assert!(machine.die(&mut world, &registry));
        assert_eq!(machine.state(), GameState::Dead);
        assert_eq!(machine.death_count(), 1);
    }

    #[test]
    fn test_undo_only_from_dead() {
        let (mut world, registry, mut machine) = setup();
        machine.undo();
        assert_eq!(machine.state(), GameState::Swing);

        machine.release(&mut world, &registry);
        machine.undo();
        assert_eq!(machine.state(), GameState::Launch);

        machine.die(&mut world, &registry);
        machine.drain_events();
        machine.undo();
        assert_eq!(machine.state(), GameState::Return);
        assert_eq!(machine.wait_time(), RETURN_WINDOW);

        let events = machine.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::SpriteAdvance { index } if *index < 4)));
    }

    #[test]
    fn test_release_while_dead_acts_as_undo() {
        let (mut world, registry, mut machine) = setup();
        machine.die(&mut world, &registry);
        machine.release(&mut world, &registry);
        assert_eq!(machine.state(), GameState::Return);
    }

    #[test]
    fn test_early_release_during_return_is_noop() {
        let (mut world, registry, mut machine) = setup();
        machine.die(&mut world, &registry);
        machine.undo();
        machine.drain_events();

        machine.release(&mut world, &registry);
        assert_eq!(machine.state(), GameState::Return);
        assert_eq!(machine.hud(), HudMessage::TooEarly);
        assert_eq!(machine.drain_events(), vec![GameEvent::EarlyRelease]);
    }

    #[test]
    fn test_score_tracks_head_distance_in_flight() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        let head = registry.head();

        world.set_pose(head, Pose::new(Vec2::new(0.0, 40.0), 0.0));
        machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        assert_eq!(machine.score().display(), 40);

        world.set_pose(head, Pose::new(Vec2::new(0.0, 10.0), 0.0));
        machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        assert_eq!(machine.score().display(), 40);
        assert_eq!(
            machine.hud(),
            HudMessage::Flight {
                score: 40,
                past_end: false
            }
        );
    }

    #[test]
    fn test_swing_update_applies_player_pull() {
        let (mut world, registry, mut machine) = setup();
        machine.update(&mut world, &registry, Vec2::new(1.0, 1.0), SIM_DT);
        let expected = Vec2::new(1.0, -1.0).normalize() * GRAVITY_CONSTANT;
        for &body in registry.all_bodies() {
            assert!((world.pending_force(body) - expected).length() < 1e-4);
        }
    }

    fn assert_launch_forces(
        machine: &GameStateMachine,
        world: &RapierWorld,
        registry: &PhysicsBodyRegistry,
    ) {
        for &body in registry.all_bodies() {
            let expected = machine
                .gravity()
                .launch_force(world.position(body), machine.death_count());
            assert!(expected.length() > 0.0);
            assert!(
                (world.pending_force(body) - expected).length() < 1e-5,
                "{body:?}: {} vs {expected}",
                world.pending_force(body)
            );
        }
    }

    #[test]
    fn test_launch_update_applies_planet_gravity() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        machine.update(&mut world, &registry, Vec2::new(1.0, 0.0), SIM_DT);
        assert_launch_forces(&machine, &world, &registry);
    }

    #[test]
    fn test_dead_update_keeps_planet_gravity() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        machine.die(&mut world, &registry);
        machine.update(&mut world, &registry, Vec2::new(-1.0, 0.0), SIM_DT);
        assert_eq!(machine.death_count(), 1);
        assert_launch_forces(&machine, &world, &registry);
    }

    #[test]
    fn test_score_keeps_rising_while_dead() {
        let (mut world, registry, mut machine) = setup();
        machine.release(&mut world, &registry);
        let head = registry.head();
        world.set_pose(head, Pose::new(Vec2::new(0.0, -30.0), 0.0));
        machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        assert_eq!(machine.score().display(), 30);

        machine.die(&mut world, &registry);
        world.set_pose(head, Pose::new(Vec2::new(0.0, -55.0), 0.0));
        machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        assert_eq!(machine.state(), GameState::Dead);
        assert_eq!(machine.score().display(), 55);
    }

    #[test]
    fn test_settle_restores_rotation_and_stops_spin() {
        let (mut world, registry, mut machine) = setup();
        machine.die(&mut world, &registry);
        let head = registry.head();
        let rest = registry.rest_pose(head).unwrap();
        world.set_pose(head, Pose::new(rest.position + Vec2::new(1.0, 0.0), 2.0));
        world.set_velocity(head, Vec2::new(3.0, 0.0), 4.0);

        machine.undo();
        machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        assert_eq!(machine.state(), GameState::Swing);
        let pose = world.pose(head);
        assert!((pose.position - rest.position).length() < 1e-5);
        assert!((pose.rotation - rest.rotation).abs() < 1e-5);
        assert_eq!(world.angular_velocity(head), 0.0);
    }

    #[test]
    fn test_time_ticks_count_updates() {
        let (mut world, registry, mut machine) = setup();
        for _ in 0..3 {
            machine.update(&mut world, &registry, Vec2::ZERO, SIM_DT);
        }
        assert_eq!(machine.time_ticks(), 3);
    }

    #[test]
    fn test_aberration_grows_with_deaths() {
        assert_eq!(aberration_for_deaths(0), 0.0);
        assert!(aberration_for_deaths(5) > aberration_for_deaths(1));
        assert!(aberration_for_deaths(1000) <= 0.5);
    }
}
