//! Tether Fall headless driver
//!
//! Runs scripted sessions on the Rapier world and reports what the
//! presentation layer would show. Pass a tuning JSON path to override the
//! defaults.

use glam::Vec2;

use tether_fall::bridge::LogBridge;
use tether_fall::consts::SIM_DT;
use tether_fall::sim::{
    GameState, GameStateMachine, PhysicsBodyRegistry, PhysicsWorld, TickInput, demo_scene, tick,
};
use tether_fall::{PresentationBridge, PresentationFrame, SimResult, Tuning};

/// Runs per session
const RUNS: u32 = 3;
/// Give up on a flight after this long (seconds)
const MAX_FLIGHT: f32 = 20.0;
/// Hard cap so a bad tuning file can't spin forever
const MAX_TICKS: u64 = 60 * 60 * 10;

/// What the scripted player does on a given tick of a run
fn scripted_input(state: GameState, secs_in_state: f32, presses: &mut u32) -> TickInput {
    let mut input = TickInput::default();
    match state {
        GameState::Swing => {
            // Pump the swing left and right, then let go
            input.direction = Vec2::new((secs_in_state * 3.0).sin(), -0.5);
            if secs_in_state > 2.0 {
                input.release = true;
            }
        }
        GameState::Launch if secs_in_state > 1.0 && *presses == 0 => {
            *presses += 1;
            input.release = true;
        }
        GameState::Dead if secs_in_state > 1.0 => input.undo = true,
        _ => {}
    }
    input
}

fn run() -> SimResult<()> {
    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let (mut world, scene_layout) = demo_scene();
    if tuning.rig != scene_layout {
        log::warn!("Tuning overrides the demo rig layout; body names must still match");
    }
    let registry = PhysicsBodyRegistry::new(&mut world, &tuning.rig)?;
    let mut machine = GameStateMachine::new(&tuning, &mut world, &registry)?;
    let mut bridge = LogBridge::default();

    let mut runs = 0;
    let mut state_entered = 0u64;
    let mut presses = 0;
    let mut last_state = machine.state();

    while runs < RUNS && machine.time_ticks() < MAX_TICKS {
        let secs_in_state = (machine.time_ticks() - state_entered) as f32 * SIM_DT;
        let mut input = scripted_input(machine.state(), secs_in_state, &mut presses);

        if machine.state() == GameState::Launch {
            // Touching the planet surface ends the flight
            let head = world.position(registry.head());
            let planet = tuning.planet;
            let landed = head.distance(planet.center) < planet.radius;
            input.died = landed || secs_in_state > MAX_FLIGHT;
        }

        let events = tick(&mut machine, &mut world, &registry, &input, SIM_DT);
        world.step(SIM_DT * machine.time_scale());

        let frame = PresentationFrame::capture(&machine, &world, &registry);
        bridge.present(&frame, &events);

        if machine.state() != last_state {
            state_entered = machine.time_ticks();
            if last_state == GameState::Return && machine.state() == GameState::Swing {
                runs += 1;
                presses = 0;
            }
            last_state = machine.state();
        }
    }

    let summary = PresentationFrame::capture(&machine, &world, &registry);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tether Fall (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
