//! Snapshot capture and restore
//!
//! A snapshot records ball and paddle positions proportionally to the
//! surface size, so restoring after a pause or a resize is a pure scale
//! operation. While a snapshot is current, the live bodies are never
//! advanced by physics, only repositioned to mirror it.

use serde::{Deserialize, Serialize};

use crate::game::scene::Scene;

/// Ball position and velocity, normalized to the surface dimensions
///
/// `x`/`y` are the ball's top-left corner as fractions of width/height;
/// `dx`/`dy` are velocity in surface widths/heights per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Proportional record of the whole scene, taken once per pause (or per
/// resize while playing) and consumed once on resume/remap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub ball: BallState,
    /// Left paddle's vertical center as a fraction of surface height
    pub player1_rel_y: f32,
    /// Right paddle's vertical center as a fraction of surface height
    pub player2_rel_y: f32,
}

impl GameSnapshot {
    /// Record the scene's current geometry relative to its surface size
    pub fn capture(scene: &Scene) -> Self {
        let (width, height) = scene.surface_size();
        let ball = scene.ball();
        Self {
            ball: BallState {
                x: ball.x / width,
                y: ball.y / height,
                dx: ball.vel_x / width,
                dy: ball.vel_y / height,
            },
            player1_rel_y: scene.left_paddle().center_y() / height,
            player2_rel_y: scene.right_paddle().center_y() / height,
        }
    }

    /// Mirror this snapshot back onto the live bodies at the scene's
    /// current surface size, velocity included
    pub fn restore(&self, scene: &mut Scene) {
        self.restore_positions(scene);
        let (width, height) = scene.surface_size();
        let ball = scene.ball_mut();
        ball.vel_x = self.ball.dx * width;
        ball.vel_y = self.ball.dy * height;
    }

    /// Reposition the bodies without re-arming the ball velocity; used by
    /// the resize remap, which must leave a paused ball stationary
    pub fn restore_positions(&self, scene: &mut Scene) {
        let (width, height) = scene.surface_size();

        let p1_center = self.player1_rel_y * height;
        let p2_center = self.player2_rel_y * height;
        scene.left_paddle_mut().set_center_y(p1_center, height);
        scene.right_paddle_mut().set_center_y(p2_center, height);

        let ball = scene.ball_mut();
        ball.x = self.ball.x * width;
        ball.y = self.ball.y * height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game::GameMode;

    fn scene() -> Scene {
        Scene::new(GameMode::MultiPlayer, 800.0, 600.0, 7, &EngineConfig::default())
    }

    #[test]
    fn capture_normalizes_positions() {
        let mut scene = scene();
        scene.ball_mut().x = 400.0;
        scene.ball_mut().y = 300.0;
        scene.ball_mut().vel_x = 200.0;
        scene.ball_mut().vel_y = -60.0;

        let snapshot = GameSnapshot::capture(&scene);
        assert!((snapshot.ball.x - 0.5).abs() < 1e-6);
        assert!((snapshot.ball.y - 0.5).abs() < 1e-6);
        assert!((snapshot.ball.dx - 0.25).abs() < 1e-6);
        assert!((snapshot.ball.dy + 0.1).abs() < 1e-6);
        assert!((snapshot.player1_rel_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn round_trip_survives_arbitrary_resize() {
        let mut scene = scene();
        scene.ball_mut().x = 160.0;
        scene.ball_mut().y = 450.0;
        scene.left_paddle_mut().set_center_y(120.0, 600.0);
        scene.right_paddle_mut().set_center_y(580.0, 600.0);

        let before = GameSnapshot::capture(&scene);

        scene.set_surface_size(1333.0, 977.0);
        before.restore(&mut scene);
        let after = GameSnapshot::capture(&scene);

        assert!((before.ball.x - after.ball.x).abs() < 1e-4);
        assert!((before.ball.y - after.ball.y).abs() < 1e-4);
        assert!((before.player1_rel_y - after.player1_rel_y).abs() < 1e-4);
        // The right paddle was clamped near the bottom edge; its center can
        // only move inward, never off-surface
        let (_, height) = scene.surface_size();
        let paddle = scene.right_paddle();
        assert!(paddle.y >= 0.0 && paddle.y + paddle.height <= height);
    }

    #[test]
    fn normalized_ball_remaps_by_pure_scaling() {
        let mut scene = scene();
        scene.ball_mut().x = 400.0;
        scene.ball_mut().y = 300.0;

        let snapshot = GameSnapshot::capture(&scene);
        scene.set_surface_size(1600.0, 300.0);
        snapshot.restore_positions(&mut scene);

        assert!((scene.ball().x - 800.0).abs() < 1e-3);
        assert!((scene.ball().y - 150.0).abs() < 1e-3);
    }
}
