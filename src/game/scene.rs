//! Scene: one ball, two paddles, per-tick physics and scoring

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::game::bodies::{Ball, Paddle, PaddleControl};
use crate::game::{GameMode, MatchReport, PlayerSide};
use crate::render::Surface;
use crate::util::time::unix_millis;

/// Per-frame simulation fault; absorbed and logged by the engine
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Non-finite {body} position after physics step")]
    NonFinite { body: &'static str },
}

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointOutcome {
    pub scorer: PlayerSide,
    pub game_over: bool,
}

/// The live simulation scene. Owns its bodies; the pause and resize
/// managers receive mutable references through method arguments only.
pub struct Scene {
    mode: GameMode,
    width: f32,
    height: f32,
    ball: Ball,
    left: Paddle,
    right: Paddle,
    score_left: u32,
    score_right: u32,
    win_score: u32,
    game_over: bool,
    winner: Option<PlayerSide>,
    started_at: Option<u64>,
    rng: ChaCha8Rng,
    config: EngineConfig,
}

impl Scene {
    pub fn new(mode: GameMode, width: f32, height: f32, seed: u64, config: &EngineConfig) -> Self {
        let (left_control, right_control) = match mode {
            GameMode::SinglePlayer => (PaddleControl::Human, PaddleControl::Tracking),
            GameMode::MultiPlayer | GameMode::Tournament => {
                (PaddleControl::Human, PaddleControl::Human)
            }
            GameMode::BackgroundDemo => (PaddleControl::Tracking, PaddleControl::Tracking),
        };

        Self {
            mode,
            width,
            height,
            ball: Ball::new(config, width, height),
            left: Paddle::new(PlayerSide::Left, left_control, config, width, height),
            right: Paddle::new(PlayerSide::Right, right_control, config, width, height),
            score_left: 0,
            score_right: 0,
            win_score: config.win_score,
            game_over: false,
            winner: None,
            started_at: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config: config.clone(),
        }
    }

    /// Advance physics by one frame and detect scoring
    pub fn update(&mut self, dt: f32) -> Result<Option<PointOutcome>, SceneError> {
        if self.game_over {
            return Ok(None);
        }

        if self.left.control == PaddleControl::Tracking {
            self.left.track_ball(&self.ball);
        }
        if self.right.control == PaddleControl::Tracking {
            self.right.track_ball(&self.ball);
        }
        self.left.step(dt, self.height);
        self.right.step(dt, self.height);

        self.ball.step(dt);
        self.ball.bounce_walls(self.height);
        self.ball.bounce_paddle(&self.left, &self.config, self.width);
        self.ball.bounce_paddle(&self.right, &self.config, self.width);

        if !self.ball.x.is_finite() || !self.ball.y.is_finite() {
            return Err(SceneError::NonFinite { body: "ball" });
        }

        if self.ball.x + self.ball.size < 0.0 {
            return Ok(Some(self.record_point(PlayerSide::Right)));
        }
        if self.ball.x > self.width {
            return Ok(Some(self.record_point(PlayerSide::Left)));
        }
        Ok(None)
    }

    fn record_point(&mut self, scorer: PlayerSide) -> PointOutcome {
        match scorer {
            PlayerSide::Left => self.score_left += 1,
            PlayerSide::Right => self.score_right += 1,
        }
        debug!(
            score_left = self.score_left,
            score_right = self.score_right,
            "Point scored"
        );

        // The decorative demo never ends
        if !self.mode.is_background() {
            let winning = match scorer {
                PlayerSide::Left => self.score_left,
                PlayerSide::Right => self.score_right,
            };
            if winning >= self.win_score {
                self.game_over = true;
                self.winner = Some(scorer);
            }
        }

        PointOutcome {
            scorer,
            game_over: self.game_over,
        }
    }

    /// Center the ball and stop it
    pub fn center_ball(&mut self) {
        self.ball.x = (self.width - self.ball.size) / 2.0;
        self.ball.y = (self.height - self.ball.size) / 2.0;
        self.ball.vel_x = 0.0;
        self.ball.vel_y = 0.0;
    }

    /// Serve from the center in a random direction, up to 45 degrees off
    /// horizontal, toward a random side
    pub fn launch_ball(&mut self) {
        self.center_ball();
        if self.started_at.is_none() {
            self.started_at = Some(unix_millis());
        }
        let speed = self.config.ball_speed_frac * self.width;
        let angle = self
            .rng
            .gen_range(-std::f32::consts::FRAC_PI_4..std::f32::consts::FRAC_PI_4);
        let direction: f32 = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.vel_x = direction * speed * angle.cos();
        self.ball.vel_y = speed * angle.sin();
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(
            self.left.x,
            self.left.y,
            self.left.width,
            self.left.height,
            &self.left.color,
        );
        surface.fill_rect(
            self.right.x,
            self.right.y,
            self.right.width,
            self.right.height,
            &self.right.color,
        );
        surface.fill_rect(
            self.ball.x,
            self.ball.y,
            self.ball.size,
            self.ball.size,
            "#ffffff",
        );
        surface.draw_text(
            &format!("{} - {}", self.score_left, self.score_right),
            self.width / 2.0,
            self.height * 0.08,
            "#ffffff",
        );
    }

    /// Raw surface dimension change: updates the scene's notion of its
    /// bounds and refreshes size-derived body constants. Repositioning is
    /// the resize remap's job.
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ball.refresh_constants(&self.config, width, height);
        self.left.refresh_constants(&self.config, width, height);
        self.right.refresh_constants(&self.config, width, height);
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn left_paddle(&self) -> &Paddle {
        &self.left
    }

    pub fn left_paddle_mut(&mut self) -> &mut Paddle {
        &mut self.left
    }

    pub fn right_paddle(&self) -> &Paddle {
        &self.right
    }

    pub fn right_paddle_mut(&mut self) -> &mut Paddle {
        &mut self.right
    }

    pub fn paddle_mut(&mut self, side: PlayerSide) -> &mut Paddle {
        match side {
            PlayerSide::Left => &mut self.left,
            PlayerSide::Right => &mut self.right,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn report(&self) -> MatchReport {
        let duration = self
            .started_at
            .map(|start| ((unix_millis().saturating_sub(start)) / 1000) as u32)
            .unwrap_or(0);
        MatchReport {
            score_left: self.score_left,
            score_right: self.score_right,
            game_over: self.game_over,
            winner: self.winner,
            duration_secs: duration,
        }
    }
}
