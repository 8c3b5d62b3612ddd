//! Game simulation modules

pub mod bodies;
pub mod engine;
pub mod pause;
pub mod resize;
pub mod scene;
pub mod snapshot;

pub use engine::GameEngine;
pub use pause::{GamePhase, PauseManager};
pub use resize::ResizeManager;
pub use scene::Scene;
pub use snapshot::{BallState, GameSnapshot};

use serde::{Deserialize, Serialize};

/// Game mode selected at match initialization
///
/// Background demo is the decorative self-playing mode: countdowns are
/// skipped and the ball relaunches immediately after a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    SinglePlayer,
    MultiPlayer,
    Tournament,
    BackgroundDemo,
}

impl GameMode {
    pub fn is_background(self) -> bool {
        matches!(self, GameMode::BackgroundDemo)
    }
}

/// One of the two paddle sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSide {
    Left,
    Right,
}

impl PlayerSide {
    pub fn opponent(self) -> Self {
        match self {
            PlayerSide::Left => PlayerSide::Right,
            PlayerSide::Right => PlayerSide::Left,
        }
    }
}

/// Queryable match outcome, refreshed after every update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub score_left: u32,
    pub score_right: u32,
    pub game_over: bool,
    pub winner: Option<PlayerSide>,
    pub duration_secs: u32,
}
