//! Values handed to presentation after each tick
//!
//! Camera, HUD, ambiance and post-processing live outside the core. They read
//! a [`PresentationFrame`] and the tick's events and never touch physics.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::sigmoid_shifted;
use crate::sim::{
    GameEvent, GameState, GameStateMachine, HudMessage, PhysicsBodyRegistry, PhysicsWorld,
};

/// Camera distance kept behind the head, on top of its distance from the origin
pub const CAMERA_BACKOFF: f32 = 10.0;
/// Yaw per unit of horizontal head offset (degrees)
pub const CAMERA_YAW_PER_UNIT: f32 = 0.1;
/// Yaw limit either side (degrees)
pub const CAMERA_MAX_YAW: f32 = 45.0;

/// Follow camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    /// Rotation about the vertical axis, degrees
    pub yaw: f32,
}

impl CameraPose {
    /// Follow the head and pull back further the farther it travels
    pub fn follow(head: Vec2) -> Self {
        Self {
            position: Vec3::new(head.x, head.y, -(head.length() + CAMERA_BACKOFF)),
            yaw: (-head.x * CAMERA_YAW_PER_UNIT).clamp(-CAMERA_MAX_YAW, CAMERA_MAX_YAW),
        }
    }
}

/// Crossfade between office and space ambiance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioMix {
    /// Raw sigmoid value; negative below the crossover distance
    pub office: f32,
    pub space: f32,
}

impl AudioMix {
    pub fn at_distance(distance: f32, crossover: f32) -> Self {
        let office = sigmoid_shifted(distance, crossover);
        Self {
            office,
            space: 1.0 - office,
        }
    }

    /// The same mix with both volumes limited to [0, 1]
    pub fn clamped(&self) -> Self {
        Self {
            office: self.office.clamp(0.0, 1.0),
            space: self.space.clamp(0.0, 1.0),
        }
    }
}

/// Snapshot of everything presentation shows for one tick
#[derive(Debug, Clone, Serialize)]
pub struct PresentationFrame {
    pub tick: u64,
    pub state: GameState,
    /// Distance this run, in whole units
    pub score: u32,
    /// Best distance this session, in whole units
    pub best: u32,
    pub death_count: u32,
    pub head_position: Vec2,
    pub camera: CameraPose,
    pub audio: AudioMix,
    /// Chromatic aberration intensity
    pub aberration: f32,
    pub hud: HudMessage,
    pub time_scale: f32,
}

impl PresentationFrame {
    /// Read the frame out of the machine and world after a tick
    pub fn capture(
        machine: &GameStateMachine,
        world: &impl PhysicsWorld,
        registry: &PhysicsBodyRegistry,
    ) -> Self {
        let head = world.position(registry.head());
        Self {
            tick: machine.time_ticks(),
            state: machine.state(),
            score: machine.score().display(),
            best: machine.score().best() as u32,
            death_count: machine.death_count(),
            head_position: head,
            camera: CameraPose::follow(head),
            audio: AudioMix::at_distance(head.length(), machine.tuning().end_game_score),
            aberration: machine.aberration(),
            hud: machine.hud(),
            time_scale: machine.time_scale(),
        }
    }
}

/// Consumer side of the core: camera rig, HUD, mixer, sprite swapper
pub trait PresentationBridge {
    fn present(&mut self, frame: &PresentationFrame, events: &[GameEvent]);
}

/// Bridge that writes what a player would see to the log
#[derive(Debug, Default)]
pub struct LogBridge {
    last_hud: Option<HudMessage>,
}

impl PresentationBridge for LogBridge {
    fn present(&mut self, frame: &PresentationFrame, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::SpriteAdvance { index } => log::info!("Sprite {} advances", index),
                GameEvent::Died { death_count, score } => {
                    log::info!("Died at {} (death #{})", score, death_count)
                }
                other => log::debug!("{:?}", other),
            }
        }

        // Flight HUD changes every tick; only report state-level changes
        let changed = match (self.last_hud, frame.hud) {
            (Some(HudMessage::Flight { .. }), HudMessage::Flight { .. }) => false,
            (last, now) => last != Some(now),
        };
        if changed && frame.hud != HudMessage::Hidden {
            log::info!("HUD: {}", frame.hud.to_string().replace('\n', " | "));
        }
        self.last_hud = Some(frame.hud);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::END_GAME_SCORE;

    #[test]
    fn test_audio_crossover_at_end_score() {
        let mix = AudioMix::at_distance(END_GAME_SCORE, END_GAME_SCORE);
        assert_eq!(mix.office, 0.0);
        assert_eq!(mix.space, 1.0);
    }

    #[test]
    fn test_audio_is_negative_near_origin() {
        let mix = AudioMix::at_distance(0.0, END_GAME_SCORE);
        assert!((mix.office + 0.4621).abs() < 1e-3);
        assert!(mix.space > 1.0);

        let clamped = mix.clamped();
        assert_eq!(clamped.office, 0.0);
        assert_eq!(clamped.space, 1.0);
    }

    #[test]
    fn test_camera_follows_and_backs_off() {
        let camera = CameraPose::follow(Vec2::new(3.0, 4.0));
        assert_eq!(camera.position, Vec3::new(3.0, 4.0, -15.0));
        assert!((camera.yaw + 0.3).abs() < 1e-6);

        let far = CameraPose::follow(Vec2::new(-1000.0, 0.0));
        assert_eq!(far.yaw, CAMERA_MAX_YAW);
    }

    proptest! {
        #[test]
        fn prop_audio_volumes_sum_to_one(distance in 0.0f32..5000.0) {
            let mix = AudioMix::at_distance(distance, END_GAME_SCORE);
            prop_assert!((mix.office + mix.space - 1.0).abs() < 1e-5);
            prop_assert!((-1.0..=1.0).contains(&mix.office));
        }
    }
}
