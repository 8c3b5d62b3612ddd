//! Pause / resume / countdown state machine
//!
//! Exactly one phase is active at a time. The auxiliary flags
//! (`pending_pause`, `first_start`) are named booleans, not states, so
//! contradictory combinations cannot be expressed. Every (phase, event)
//! pair is a total function: out-of-order calls are no-ops, never errors.
//!
//! The countdown is a dt-accumulator advanced from the engine's update
//! tick, so there can never be two live countdowns for one engine and
//! teardown cancels everything by clearing state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::game::scene::Scene;
use crate::game::snapshot::GameSnapshot;
use crate::game::GameMode;

/// Current simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    Countdown,
}

/// Receives `Some(n)` on countdown entry and every decrement, `None` when
/// the countdown ends or is cancelled. The manager's only bridge to
/// whatever displays the on-screen number.
pub type CountdownCallback = Box<dyn FnMut(Option<u32>) + Send>;

#[derive(Debug, Clone, Copy)]
struct CountdownTicker {
    remaining: u32,
    elapsed: f32,
}

pub struct PauseManager {
    phase: GamePhase,
    mode: GameMode,
    pending_pause: bool,
    first_start: bool,
    snapshot: Option<GameSnapshot>,
    countdown: Option<CountdownTicker>,
    /// Remaining delay between a scored point and the next countdown
    score_delay: Option<f32>,
    callback: Option<CountdownCallback>,
    countdown_start: u32,
    countdown_step: f32,
    score_delay_secs: f32,
}

impl PauseManager {
    pub fn new(mode: GameMode, config: &EngineConfig) -> Self {
        Self {
            phase: GamePhase::Paused,
            mode,
            pending_pause: false,
            first_start: true,
            snapshot: None,
            countdown: None,
            score_delay: None,
            callback: None,
            countdown_start: config.countdown_start,
            countdown_step: config.countdown_step,
            score_delay_secs: config.score_delay,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_first_start(&self) -> bool {
        self.first_start
    }

    pub fn pending_pause(&self) -> bool {
        self.pending_pause
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn set_countdown_callback(&mut self, callback: CountdownCallback) {
        self.callback = Some(callback);
    }

    /// Ask for a pause at the next safe point (countdown completion)
    /// without corrupting an in-flight countdown display
    pub fn set_pending_pause_request(&mut self, pending: bool) {
        self.pending_pause = pending;
    }

    /// First-ever start: countdown, then serve. No-op once started or
    /// outside the initial paused phase.
    pub fn start_game(&mut self, scene: &mut Scene) {
        if !self.first_start || self.phase != GamePhase::Paused {
            return;
        }
        self.first_start = false;
        scene.center_ball();
        self.begin_countdown(scene);
    }

    /// Transition to paused. Idempotent.
    ///
    /// From playing: snapshots the live geometry, then stops the ball (the
    /// velocity survives inside the snapshot). From countdown: cancels the
    /// in-flight countdown and completes the transition to paused.
    pub fn pause(&mut self, scene: &mut Scene) {
        match self.phase {
            GamePhase::Paused => {}
            GamePhase::Playing => {
                self.snapshot = Some(GameSnapshot::capture(scene));
                let ball = scene.ball_mut();
                ball.vel_x = 0.0;
                ball.vel_y = 0.0;
                self.phase = GamePhase::Paused;
                debug!("Paused from playing");
            }
            GamePhase::Countdown => {
                self.cancel_countdown();
                self.pending_pause = false;
                self.phase = GamePhase::Paused;
                debug!("Paused from countdown");
            }
        }
    }

    /// Resume from paused through a fresh countdown. The snapshot, if one
    /// exists, is restored when the countdown completes; otherwise the
    /// ball is served fresh. No-op unless paused.
    pub fn resume(&mut self, scene: &mut Scene) {
        if self.phase != GamePhase::Paused || self.first_start {
            return;
        }
        self.begin_countdown(scene);
    }

    /// A point was scored: the post-point state is freshly centered, never
    /// "resumed", so any snapshot is cleared. Competitive modes pause
    /// briefly before the next countdown; the background demo relaunches
    /// immediately.
    pub fn handle_point_scored(&mut self, scene: &mut Scene) {
        self.snapshot = None;
        self.cancel_countdown();
        self.score_delay = None;
        scene.center_ball();

        if self.mode.is_background() {
            scene.launch_ball();
            self.phase = GamePhase::Playing;
        } else {
            self.phase = GamePhase::Paused;
            self.score_delay = Some(self.score_delay_secs);
        }
    }

    /// Re-emit the current countdown value after a resize remap so the
    /// display picks the number back up without the countdown restarting
    pub fn maintain_countdown_state(&mut self) {
        if self.phase == GamePhase::Countdown {
            if let Some(ticker) = self.countdown {
                self.notify(Some(ticker.remaining));
            }
        }
    }

    /// Advance the countdown / post-point delay by one frame
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        if let Some(delay) = &mut self.score_delay {
            *delay -= dt;
            if *delay <= 0.0 {
                self.score_delay = None;
                self.begin_countdown(scene);
            }
            return;
        }

        let Some(mut ticker) = self.countdown else {
            return;
        };
        if self.phase != GamePhase::Countdown {
            return;
        }

        ticker.elapsed += dt;
        while ticker.elapsed >= self.countdown_step {
            ticker.elapsed -= self.countdown_step;
            ticker.remaining = ticker.remaining.saturating_sub(1);
            if ticker.remaining > 0 {
                self.notify(Some(ticker.remaining));
            } else {
                self.countdown = None;
                self.notify(None);
                self.complete_countdown(scene);
                return;
            }
        }
        self.countdown = Some(ticker);
    }

    /// Start (or restart) the countdown; any outstanding countdown or
    /// post-point delay is cancelled first. The background demo skips the
    /// countdown entirely.
    fn begin_countdown(&mut self, scene: &mut Scene) {
        self.cancel_countdown();
        self.score_delay = None;

        if self.mode.is_background() {
            self.complete_countdown(scene);
            return;
        }

        self.phase = GamePhase::Countdown;
        self.countdown = Some(CountdownTicker {
            remaining: self.countdown_start,
            elapsed: 0.0,
        });
        self.notify(Some(self.countdown_start));
    }

    /// Terminal countdown transition: paused if a pause request is
    /// pending, otherwise restore-or-serve and play
    fn complete_countdown(&mut self, scene: &mut Scene) {
        if self.pending_pause {
            self.pending_pause = false;
            self.phase = GamePhase::Paused;
            debug!("Countdown deferred to pause");
            return;
        }

        match self.snapshot.take() {
            Some(snapshot) => snapshot.restore(scene),
            None => scene.launch_ball(),
        }
        self.phase = GamePhase::Playing;
    }

    fn cancel_countdown(&mut self) {
        if self.countdown.take().is_some() {
            self.notify(None);
        }
    }

    fn notify(&mut self, value: Option<u32>) {
        if let Some(callback) = &mut self.callback {
            callback(value);
        }
    }

    /// Cancel all outstanding timers and drop shared state so nothing can
    /// fire after teardown. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.countdown = None;
        self.score_delay = None;
        self.snapshot = None;
        self.callback = None;
        self.pending_pause = false;
        self.phase = GamePhase::Paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::util::time::tick_delta;

    fn setup(mode: GameMode) -> (PauseManager, Scene) {
        let config = EngineConfig::default();
        let scene = Scene::new(mode, 800.0, 600.0, 9, &config);
        (PauseManager::new(mode, &config), scene)
    }

    fn step_secs(pause: &mut PauseManager, scene: &mut Scene, secs: f32) {
        let dt = tick_delta();
        let ticks = (secs / dt).ceil() as u32 + 1;
        for _ in 0..ticks {
            pause.tick(dt, scene);
        }
    }

    #[test]
    fn starts_paused_and_first_start_runs_full_countdown() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        let seen: Arc<Mutex<Vec<Option<u32>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        pause.set_countdown_callback(Box::new(move |n| sink.lock().unwrap().push(n)));

        assert_eq!(pause.phase(), GamePhase::Paused);
        assert!(pause.is_first_start());

        pause.start_game(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Countdown);
        assert!(!pause.is_first_start());

        step_secs(&mut pause, &mut scene, 3.2);
        assert_eq!(pause.phase(), GamePhase::Playing);
        assert_eq!(*seen.lock().unwrap(), vec![Some(3), Some(2), Some(1), None]);
        assert!(scene.ball().speed() > 0.0);
    }

    #[test]
    fn start_game_is_one_shot() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);
        pause.pause(&mut scene);
        pause.start_game(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
    }

    #[test]
    fn pause_is_idempotent_and_preserves_snapshot() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);

        pause.pause(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
        let first = pause.snapshot().cloned().unwrap();
        assert_eq!(scene.ball().speed(), 0.0);
        // Velocity survives inside the snapshot
        assert!(first.ball.dx != 0.0 || first.ball.dy != 0.0);

        pause.pause(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
        assert_eq!(pause.snapshot().unwrap(), &first);
    }

    #[test]
    fn resume_restores_pre_pause_ball_position() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);

        scene.ball_mut().x = 123.0;
        scene.ball_mut().y = 456.0;
        pause.pause(&mut scene);
        assert!(pause.snapshot().is_some());

        pause.resume(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Countdown);
        step_secs(&mut pause, &mut scene, 3.2);

        assert_eq!(pause.phase(), GamePhase::Playing);
        assert!((scene.ball().x - 123.0).abs() < 1e-3);
        assert!((scene.ball().y - 456.0).abs() < 1e-3);
        assert!(scene.ball().speed() > 0.0);
        assert!(pause.snapshot().is_none());
    }

    #[test]
    fn resume_while_not_paused_is_a_no_op() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);
        pause.resume(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Playing);
    }

    #[test]
    fn pending_pause_defers_countdown_to_paused() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 1.0);
        assert_eq!(pause.phase(), GamePhase::Countdown);

        pause.set_pending_pause_request(true);
        step_secs(&mut pause, &mut scene, 3.0);

        assert_eq!(pause.phase(), GamePhase::Paused);
        assert!(!pause.pending_pause());
        // Deferred launch countdown: no snapshot, resume serves fresh
        assert!(pause.snapshot().is_none());
        assert_eq!(scene.ball().speed(), 0.0);
    }

    #[test]
    fn direct_pause_cancels_countdown() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        let seen: Arc<Mutex<Vec<Option<u32>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        pause.set_countdown_callback(Box::new(move |n| sink.lock().unwrap().push(n)));

        pause.start_game(&mut scene);
        pause.pause(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
        // Cancellation clears the display
        assert_eq!(seen.lock().unwrap().last(), Some(&None));

        // Resume serves fresh since nothing was ever in flight
        pause.resume(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);
        assert_eq!(pause.phase(), GamePhase::Playing);
        assert!(scene.ball().speed() > 0.0);
    }

    #[test]
    fn point_scored_clears_snapshot_and_restarts_after_delay() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        step_secs(&mut pause, &mut scene, 3.2);
        pause.pause(&mut scene);
        pause.resume(&mut scene);

        pause.handle_point_scored(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
        assert!(pause.snapshot().is_none());
        assert_eq!(scene.ball().speed(), 0.0);

        // Short delay, then a fresh countdown back into play
        step_secs(&mut pause, &mut scene, 1.0);
        assert_eq!(pause.phase(), GamePhase::Countdown);
        step_secs(&mut pause, &mut scene, 3.2);
        assert_eq!(pause.phase(), GamePhase::Playing);
        assert!(scene.ball().speed() > 0.0);
    }

    #[test]
    fn background_demo_skips_countdowns_entirely() {
        let (mut pause, mut scene) = setup(GameMode::BackgroundDemo);
        pause.start_game(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Playing);
        assert!(scene.ball().speed() > 0.0);

        pause.handle_point_scored(&mut scene);
        assert_eq!(pause.phase(), GamePhase::Playing);
        assert!(scene.ball().speed() > 0.0);
    }

    #[test]
    fn cleanup_cancels_everything_and_is_repeatable() {
        let (mut pause, mut scene) = setup(GameMode::MultiPlayer);
        pause.start_game(&mut scene);
        pause.cleanup();
        pause.cleanup();
        assert_eq!(pause.phase(), GamePhase::Paused);
        assert!(pause.snapshot().is_none());
        // A tick after teardown is a guaranteed no-op
        pause.tick(tick_delta(), &mut scene);
        assert_eq!(pause.phase(), GamePhase::Paused);
    }
}
