//! Pong simulation engine
//!
//! A real-time match simulation for a two-paddle ball game: a frame-by-frame
//! physics scene, a pause/resume/countdown state machine, and debounced
//! resize reconciliation tied together by a proportional snapshot contract.
//! The engine only needs a 2-D drawing surface and is otherwise host-agnostic;
//! persistence, transport and screens belong to the surrounding application.

pub mod config;
pub mod game;
pub mod input;
pub mod render;
pub mod util;

pub use config::{ConfigError, EngineConfig};
pub use game::{
    BallState, GameEngine, GameMode, GamePhase, GameSnapshot, MatchReport, PauseManager,
    PlayerSide, ResizeManager, Scene,
};
pub use input::{Key, KeyboardHandle};
pub use render::{NullSurface, Surface};
