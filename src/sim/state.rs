//! Game states, events and HUD messages

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Sitting on the swing, steering the pull
    #[default]
    Swing,
    /// Let go; falling toward the planet
    Launch,
    /// Ragdoll torn apart, drifting
    Dead,
    /// Bodies being pulled back to the swing
    Return,
}

impl GameState {
    pub const ALL: [GameState; 4] = [
        GameState::Swing,
        GameState::Launch,
        GameState::Dead,
        GameState::Return,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Swing => "Swing",
            GameState::Launch => "Launch",
            GameState::Dead => "Dead",
            GameState::Return => "Return",
        }
    }

    /// Stable integer code, for hosts that keep the state outside Rust
    pub fn code(&self) -> u8 {
        match self {
            GameState::Swing => 0,
            GameState::Launch => 1,
            GameState::Dead => 2,
            GameState::Return => 3,
        }
    }
}

impl TryFrom<u8> for GameState {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GameState::Swing),
            1 => Ok(GameState::Launch),
            2 => Ok(GameState::Dead),
            3 => Ok(GameState::Return),
            other => Err(SimError::InvalidState(other)),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Things that happened during a tick, for presentation to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    /// Mid-flight downward kick on the head
    Impulse { impulse: Vec2 },
    Died { death_count: u32, score: u32 },
    /// Advance one multi-frame sprite to its next frame
    SpriteAdvance { index: u32 },
    /// Release pressed while bodies were still returning
    EarlyRelease,
    Restarted,
}

/// Text shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HudMessage {
    /// Controls reminder before the first release
    Instructions,
    /// Live distance during flight
    Flight { score: u32, past_end: bool },
    /// End-of-run summary
    Summary { score: u32, deaths: u32 },
    /// Release pressed before the bodies got home
    TooEarly,
    Hidden,
}

impl HudMessage {
    /// Whether the message uses the large font
    pub fn is_large(&self) -> bool {
        matches!(self, HudMessage::Flight { .. })
    }
}

impl fmt::Display for HudMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HudMessage::Instructions => write!(
                f,
                "Press [Space] to Release Swing.\n[AWSD]/[Gamepad] to Move."
            ),
            HudMessage::Flight { score, past_end } => {
                write!(f, "Score: {score}")?;
                if *past_end {
                    write!(f, "\nSometimes, [Space] travel in vast [Space] needs some [Space]")?;
                }
                Ok(())
            }
            HudMessage::Summary { score, deaths } => write!(
                f,
                "Score: {score}\nDeaths: {deaths}\nPress Ctrl+Z to restart"
            ),
            HudMessage::TooEarly => write!(
                f,
                "You summoned your bodies too quickly. Look at you!\n\
                 You know that you only need to press Ctrl+Z once right?"
            ),
            HudMessage::Hidden => Ok(()),
        }
    }
}
