//! Resize reconciliation
//!
//! Keeps the simulation proportionally consistent across surface-size
//! changes without corrupting the pause state machine. Notifications are
//! debounced: a burst collapses into a single remap performed from the
//! engine's update tick after a quiet period, never synchronously inside
//! the notification.

use tracing::debug;

use crate::config::EngineConfig;
use crate::game::pause::{GamePhase, PauseManager};
use crate::game::scene::Scene;
use crate::game::snapshot::GameSnapshot;
use crate::render::Surface;

#[derive(Debug, Clone)]
struct PendingRemap {
    width: f32,
    height: f32,
    /// Quiet time left before the remap fires
    quiet: f32,
    /// The burst began while playing; resume through a fresh countdown
    /// after the remap
    resume_after: bool,
    /// The burst began mid-countdown; keep the displayed countdown alive
    maintain_countdown: bool,
    /// Relative positions computed at burst start, used when the pause
    /// manager holds no snapshot of its own
    fallback: Option<GameSnapshot>,
}

pub struct ResizeManager {
    pending: Option<PendingRemap>,
    quiet_period: f32,
}

impl ResizeManager {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            pending: None,
            quiet_period: config.resize_quiet_period,
        }
    }

    /// True while a debounce window or remap is outstanding. The engine
    /// gates keyboard pause requests on this: the resize bracket already
    /// owns the pause/resume pair.
    pub fn is_resizing(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a resize notification with the dimensions read from the
    /// host. Restarts the quiet period; only the newest dimensions of a
    /// burst are applied. The first notification of a burst brackets the
    /// simulation: an immediate pause when playing, a pending-pause
    /// request when mid-countdown.
    pub fn notify(
        &mut self,
        width: f32,
        height: f32,
        pause: &mut PauseManager,
        mut scene: Option<&mut Scene>,
    ) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        match &mut self.pending {
            Some(pending) => {
                pending.width = width;
                pending.height = height;
                pending.quiet = self.quiet_period;
            }
            None => {
                let mut resume_after = false;
                let mut maintain_countdown = false;
                let mut fallback = None;
                match pause.phase() {
                    GamePhase::Playing => {
                        if let Some(scene) = scene.as_deref_mut() {
                            pause.pause(scene);
                            resume_after = true;
                        }
                    }
                    GamePhase::Countdown => {
                        pause.set_pending_pause_request(true);
                        maintain_countdown = true;
                    }
                    GamePhase::Paused => {}
                }
                if pause.snapshot().is_none() {
                    // Relative positions must come from the absolute ones
                    // before the surface dimensions change underneath us
                    fallback = scene.as_deref().map(GameSnapshot::capture);
                }
                self.pending = Some(PendingRemap {
                    width,
                    height,
                    quiet: self.quiet_period,
                    resume_after,
                    maintain_countdown,
                    fallback,
                });
            }
        }
    }

    /// Advance the debounce window by one frame; fires the remap once the
    /// notifications have settled. Returns true when a redraw is needed.
    pub fn tick(
        &mut self,
        dt: f32,
        scene: Option<&mut Scene>,
        pause: &mut PauseManager,
        surface: &mut dyn Surface,
    ) -> bool {
        let Some(pending) = &mut self.pending else {
            return false;
        };
        pending.quiet -= dt;
        if pending.quiet > 0.0 {
            return false;
        }
        let pending = self.pending.take().expect("pending remap checked above");
        self.remap(pending, scene, pause, surface);
        true
    }

    /// Cancel any outstanding debounce window
    pub fn cleanup(&mut self) {
        self.pending = None;
    }

    fn remap(
        &mut self,
        pending: PendingRemap,
        scene: Option<&mut Scene>,
        pause: &mut PauseManager,
        surface: &mut dyn Surface,
    ) {
        let PendingRemap {
            width,
            height,
            resume_after,
            maintain_countdown,
            fallback,
            ..
        } = pending;

        surface.set_size(width, height);

        // Non-simulation scene (menu): nothing to remap, redraw only
        let Some(scene) = scene else {
            return;
        };

        // The common case: the pause taken at burst start produced a
        // snapshot. Otherwise fall back to the relative positions recorded
        // when the burst began, or derive them now as a last resort.
        let snapshot = match pause.snapshot() {
            Some(snapshot) => snapshot.clone(),
            None => fallback.unwrap_or_else(|| GameSnapshot::capture(scene)),
        };

        scene.set_surface_size(width, height);
        snapshot.restore_positions(scene);

        debug!(width, height, "Remapped scene geometry");

        if maintain_countdown {
            pause.maintain_countdown_state();
        }
        if resume_after {
            pause.resume(scene);
        }
    }
}
