//! Game engine: composition root and the only component exposed to the
//! surrounding application
//!
//! Owns the scene and the drawing surface; the pause and resize managers
//! receive references through method arguments, so cross-component
//! coordination always flows through here and never through shared
//! globals.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::game::pause::{CountdownCallback, GamePhase, PauseManager};
use crate::game::resize::ResizeManager;
use crate::game::scene::Scene;
use crate::game::{GameMode, MatchReport, PlayerSide};
use crate::input::{keyboard_channel, Key, KeyboardHandle};
use crate::render::Surface;
use crate::util::time::tick_delta;

pub struct GameEngine {
    id: Uuid,
    config: EngineConfig,
    surface: Option<Box<dyn Surface + Send>>,
    scene: Option<Scene>,
    pause: PauseManager,
    resize: ResizeManager,
    keyboard_rx: Option<mpsc::UnboundedReceiver<Key>>,
    keyboard_handle: Option<KeyboardHandle>,
}

impl GameEngine {
    pub fn new(config: EngineConfig, surface: Box<dyn Surface + Send>) -> Self {
        let id = Uuid::new_v4();
        info!(engine_id = %id, "Engine created");
        Self {
            id,
            pause: PauseManager::new(GameMode::MultiPlayer, &config),
            resize: ResizeManager::new(&config),
            config,
            surface: Some(surface),
            scene: None,
            keyboard_rx: None,
            keyboard_handle: None,
        }
    }

    pub fn initialize_single_player(&mut self, seed: u64) {
        self.init_mode(GameMode::SinglePlayer, seed);
    }

    pub fn initialize_multi_player(&mut self, seed: u64) {
        self.init_mode(GameMode::MultiPlayer, seed);
    }

    pub fn initialize_tournament(&mut self, seed: u64) {
        self.init_mode(GameMode::Tournament, seed);
    }

    pub fn initialize_background_demo(&mut self, seed: u64) {
        self.init_mode(GameMode::BackgroundDemo, seed);
    }

    fn init_mode(&mut self, mode: GameMode, seed: u64) {
        let (width, height) = match &self.surface {
            Some(surface) => (surface.width(), surface.height()),
            None => (self.config.surface_width, self.config.surface_height),
        };
        self.scene = Some(Scene::new(mode, width, height, seed, &self.config));
        self.pause = PauseManager::new(mode, &self.config);
        self.resize.cleanup();
        info!(engine_id = %self.id, ?mode, seed, "Match initialized");
    }

    /// Register the countdown display bridge
    pub fn set_countdown_callback(&mut self, callback: CountdownCallback) {
        self.pause.set_countdown_callback(callback);
    }

    /// First start of the current match: countdown, then serve
    pub fn start_game(&mut self) {
        if let Some(scene) = &mut self.scene {
            self.pause.start_game(scene);
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Drains keyboard input, settles any pending resize remap, advances
    /// the countdown, then steps physics while playing. A scene fault is
    /// absorbed and logged; the frame is skipped and the next tick
    /// proceeds normally.
    pub fn update(&mut self) {
        let dt = tick_delta();
        self.drain_keyboard();

        let mut needs_redraw = false;
        if let Some(surface) = &mut self.surface {
            needs_redraw = self.resize.tick(
                dt,
                self.scene.as_mut(),
                &mut self.pause,
                surface.as_mut(),
            );
        }

        if let Some(scene) = &mut self.scene {
            self.pause.tick(dt, scene);

            if self.pause.phase() == GamePhase::Playing {
                match scene.update(dt) {
                    Ok(Some(outcome)) => {
                        if outcome.game_over {
                            let report = scene.report();
                            info!(
                                engine_id = %self.id,
                                score_left = report.score_left,
                                score_right = report.score_right,
                                winner = ?report.winner,
                                "Match over"
                            );
                            self.pause.pause(scene);
                        } else {
                            self.pause.handle_point_scored(scene);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(engine_id = %self.id, error = %err, "Scene update failed, skipping frame");
                    }
                }
            }
        }

        if needs_redraw {
            self.redraw();
        }
    }

    /// Clear the surface and draw the current scene. Safe before any
    /// update has run and after cleanup.
    pub fn draw(&mut self) {
        self.redraw();
    }

    fn redraw(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        surface.clear();
        if let Some(scene) = &self.scene {
            scene.draw(surface.as_mut());
        }
    }

    /// Keyboard-driven pause toggle. Ignored mid-resize: the resize
    /// bracket already owns the pause/resume pair.
    pub fn toggle_pause(&mut self) {
        if self.resize.is_resizing() {
            debug!(engine_id = %self.id, "Pause toggle ignored during resize");
            return;
        }
        let Some(scene) = &mut self.scene else {
            return;
        };
        match self.pause.phase() {
            GamePhase::Playing | GamePhase::Countdown => self.pause.pause(scene),
            GamePhase::Paused => {
                if self.pause.is_first_start() {
                    self.pause.start_game(scene);
                } else {
                    self.pause.resume(scene);
                }
            }
        }
    }

    /// One-way pause request, same resize gating as the toggle
    pub fn request_pause(&mut self) {
        if self.resize.is_resizing() {
            return;
        }
        if let Some(scene) = &mut self.scene {
            self.pause.pause(scene);
        }
    }

    /// Surface-size change from the host. The raw dimension change and a
    /// single redraw happen here; the geometric remap runs debounced in
    /// the resize manager.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.resize
            .notify(width, height, &mut self.pause, self.scene.as_mut());
        if let Some(surface) = &mut self.surface {
            surface.set_size(width, height);
        }
        if let Some(scene) = &mut self.scene {
            scene.set_surface_size(width, height);
        }
        self.redraw();
    }

    /// Add or remove the keyboard subscription. Enabling twice keeps the
    /// existing subscription rather than leaking a duplicate.
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        if enabled {
            if self.keyboard_rx.is_none() {
                let (handle, rx) = keyboard_channel();
                self.keyboard_handle = Some(handle);
                self.keyboard_rx = Some(rx);
            }
        } else {
            self.keyboard_rx = None;
            self.keyboard_handle = None;
        }
    }

    /// Handle the host forwards key presses into, while the subscription
    /// is enabled
    pub fn keyboard(&self) -> Option<KeyboardHandle> {
        self.keyboard_handle.clone()
    }

    fn drain_keyboard(&mut self) {
        let mut toggles = 0u32;
        if let Some(rx) = &mut self.keyboard_rx {
            while let Ok(key) = rx.try_recv() {
                if matches!(key, Key::Confirm | Key::Cancel) {
                    toggles += 1;
                }
            }
        }
        for _ in 0..toggles {
            self.toggle_pause();
        }
    }

    /// Host-driven paddle input axis in [-1, 1]
    pub fn set_paddle_axis(&mut self, side: PlayerSide, axis: f32) {
        if let Some(scene) = &mut self.scene {
            scene.paddle_mut(side).axis = axis.clamp(-1.0, 1.0);
        }
    }

    pub fn set_player_names(&mut self, left: &str, right: &str) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        if !left.is_empty() {
            scene.paddle_mut(PlayerSide::Left).name = left.to_string();
        }
        if !right.is_empty() {
            scene.paddle_mut(PlayerSide::Right).name = right.to_string();
        }
    }

    pub fn update_player_colors(&mut self, left: &str, right: &str) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        if !left.is_empty() {
            scene.paddle_mut(PlayerSide::Left).color = left.to_string();
        }
        if !right.is_empty() {
            scene.paddle_mut(PlayerSide::Right).color = right.to_string();
        }
    }

    pub fn game_phase(&self) -> GamePhase {
        self.pause.phase()
    }

    /// Scores, game-over flag and winner, queryable after every update
    pub fn match_report(&self) -> Option<MatchReport> {
        self.scene.as_ref().map(Scene::report)
    }

    /// Release the scene and drawing surface and cancel all outstanding
    /// timers. Safe to call multiple times; update/draw afterward are
    /// guaranteed no-ops.
    pub fn cleanup(&mut self) {
        self.scene = None;
        self.surface = None;
        self.pause.cleanup();
        self.resize.cleanup();
        self.keyboard_rx = None;
        self.keyboard_handle = None;
        info!(engine_id = %self.id, "Engine cleaned up");
    }
}
