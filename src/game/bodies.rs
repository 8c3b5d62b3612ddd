//! Physics bodies: the ball and the two paddles
//!
//! Bodies own absolute pixel position, velocity and size. They are mutated
//! only by the physics step (while playing) or by the geometry remap /
//! snapshot restore paths.

use crate::config::EngineConfig;
use crate::game::PlayerSide;

/// How a paddle is driven each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleControl {
    /// Axis set by the host (keyboard, remote player, ...)
    Human,
    /// Tracks the ball vertically at capped speed (single-player opponent,
    /// background demo)
    Tracking,
}

/// The ball, drawn as a square of side `size`
#[derive(Debug, Clone)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub size: f32,
}

impl Ball {
    pub fn new(config: &EngineConfig, width: f32, height: f32) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
            vel_x: 0.0,
            vel_y: 0.0,
            size: config.ball_size_frac * height,
        }
    }

    /// Advance position by one frame
    pub fn step(&mut self, dt: f32) {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn speed(&self) -> f32 {
        (self.vel_x * self.vel_x + self.vel_y * self.vel_y).sqrt()
    }

    /// Recompute size-derived constants after a surface dimension change.
    /// Position is not touched here; that belongs to the remap.
    pub fn refresh_constants(&mut self, config: &EngineConfig, _width: f32, height: f32) {
        self.size = config.ball_size_frac * height;
    }

    /// Reflect off the top or bottom wall if overlapping it
    pub fn bounce_walls(&mut self, height: f32) {
        if self.y <= 0.0 {
            self.y = 0.0;
            self.vel_y = self.vel_y.abs();
        } else if self.y + self.size >= height {
            self.y = height - self.size;
            self.vel_y = -self.vel_y.abs();
        }
    }

    /// Reflect off a paddle if overlapping it and moving toward it.
    ///
    /// The outgoing vertical angle is derived from where the ball struck
    /// relative to the paddle center, and the speed grows by the configured
    /// factor up to the ceiling. Returns true on a hit.
    pub fn bounce_paddle(&mut self, paddle: &Paddle, config: &EngineConfig, width: f32) -> bool {
        let moving_toward = match paddle.side {
            PlayerSide::Left => self.vel_x < 0.0,
            PlayerSide::Right => self.vel_x > 0.0,
        };
        if !moving_toward || !self.overlaps(paddle) {
            return false;
        }

        let (_, ball_cy) = self.center();
        let offset = ((ball_cy - paddle.center_y()) / (paddle.height / 2.0)).clamp(-1.0, 1.0);

        let max_speed = config.ball_max_speed_frac * width;
        let speed = (self.speed() * config.ball_speedup).min(max_speed);

        // Up to 45 degrees off horizontal, by hit offset
        let angle = offset * std::f32::consts::FRAC_PI_4;
        let direction = match paddle.side {
            PlayerSide::Left => 1.0,
            PlayerSide::Right => -1.0,
        };
        self.vel_x = direction * speed * angle.cos();
        self.vel_y = speed * angle.sin();

        // Eject from the paddle so the next frame cannot re-collide
        match paddle.side {
            PlayerSide::Left => self.x = paddle.x + paddle.width,
            PlayerSide::Right => self.x = paddle.x - self.size,
        }
        true
    }

    fn overlaps(&self, paddle: &Paddle) -> bool {
        self.x < paddle.x + paddle.width
            && self.x + self.size > paddle.x
            && self.y < paddle.y + paddle.height
            && self.y + self.size > paddle.y
    }
}

/// A paddle, anchored a fixed margin from its edge
#[derive(Debug, Clone)]
pub struct Paddle {
    pub side: PlayerSide,
    pub control: PaddleControl,
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per second at full deflection
    pub speed: f32,
    /// Input axis in [-1, 1]; negative is up
    pub axis: f32,
    pub name: String,
    pub color: String,
}

impl Paddle {
    pub fn new(
        side: PlayerSide,
        control: PaddleControl,
        config: &EngineConfig,
        width: f32,
        height: f32,
    ) -> Self {
        let mut paddle = Self {
            side,
            control,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            speed: 0.0,
            axis: 0.0,
            name: match side {
                PlayerSide::Left => "Player 1".to_string(),
                PlayerSide::Right => "Player 2".to_string(),
            },
            color: "#ffffff".to_string(),
        };
        paddle.refresh_constants(config, width, height);
        paddle.y = (height - paddle.height) / 2.0;
        paddle
    }

    /// Vertical center in absolute pixels
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Reposition by vertical center, clamped fully inside the surface
    pub fn set_center_y(&mut self, center_y: f32, surface_height: f32) {
        let y = center_y - self.height / 2.0;
        self.y = y.clamp(0.0, (surface_height - self.height).max(0.0));
    }

    /// Recompute size/speed constants and the horizontal anchor for new
    /// surface dimensions. Vertical position is left to the remap.
    pub fn refresh_constants(&mut self, config: &EngineConfig, width: f32, height: f32) {
        self.width = config.paddle_width_frac * width;
        self.height = config.paddle_height_frac * height;
        self.speed = config.paddle_speed_frac * height;
        let margin = config.paddle_margin_frac * width;
        self.x = match self.side {
            PlayerSide::Left => margin,
            PlayerSide::Right => width - margin - self.width,
        };
    }

    /// Advance by one frame under the current input axis
    pub fn step(&mut self, dt: f32, surface_height: f32) {
        let axis = self.axis.clamp(-1.0, 1.0);
        self.y += axis * self.speed * dt;
        self.y = self.y.clamp(0.0, (surface_height - self.height).max(0.0));
    }

    /// Drive the axis toward the ball's vertical center. Deliberately
    /// capped below full deflection so a sped-up ball can out-run the
    /// paddle and rallies end; the dead zone stops jitter when aligned.
    pub fn track_ball(&mut self, ball: &Ball) {
        let (_, ball_cy) = ball.center();
        let delta = ball_cy - self.center_y();
        self.axis = if delta.abs() < self.height * 0.1 {
            0.0
        } else if delta > 0.0 {
            0.6
        } else {
            -0.6
        };
    }
}
