//! Configuration module - engine constants with environment overrides

use std::env;

/// Simulation engine configuration
///
/// Every timing value is in seconds, every geometry value is a fraction of
/// the current surface width or height so the simulation stays proportional
/// across resizes.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Default surface width in pixels (demo driver / before first resize)
    pub surface_width: f32,
    /// Default surface height in pixels
    pub surface_height: f32,

    /// Countdown start value ("3, 2, 1")
    pub countdown_start: u32,
    /// Interval between countdown decrements, in seconds
    pub countdown_step: f32,
    /// Delay between a scored point and the next countdown, in seconds
    pub score_delay: f32,
    /// Quiet period after the last resize notification before remapping
    pub resize_quiet_period: f32,

    /// Paddle horizontal margin from its edge, as a fraction of width
    pub paddle_margin_frac: f32,
    /// Paddle width as a fraction of surface width
    pub paddle_width_frac: f32,
    /// Paddle height as a fraction of surface height
    pub paddle_height_frac: f32,
    /// Paddle speed in surface heights per second
    pub paddle_speed_frac: f32,

    /// Ball side length as a fraction of surface height
    pub ball_size_frac: f32,
    /// Serve speed in surface widths per second
    pub ball_speed_frac: f32,
    /// Speed multiplier applied on each paddle hit
    pub ball_speedup: f32,
    /// Speed ceiling in surface widths per second
    pub ball_max_speed_frac: f32,

    /// Points needed to win a match
    pub win_score: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            surface_width: 800.0,
            surface_height: 600.0,
            countdown_start: 3,
            countdown_step: 1.0,
            score_delay: 0.6,
            resize_quiet_period: 0.12,
            paddle_margin_frac: 0.02,
            paddle_width_frac: 0.015,
            paddle_height_frac: 0.2,
            paddle_speed_frac: 0.9,
            ball_size_frac: 0.02,
            ball_speed_frac: 0.5,
            ball_speedup: 1.05,
            ball_max_speed_frac: 1.2,
            win_score: 5,
        }
    }
}

impl EngineConfig {
    /// Load configuration, overriding defaults from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.surface_width = parse_var("SURFACE_WIDTH", config.surface_width)?;
        config.surface_height = parse_var("SURFACE_HEIGHT", config.surface_height)?;
        config.countdown_start = parse_var("COUNTDOWN_START", config.countdown_start)?;
        config.countdown_step = parse_var("COUNTDOWN_STEP_SECS", config.countdown_step)?;
        config.score_delay = parse_var("SCORE_DELAY_SECS", config.score_delay)?;
        config.resize_quiet_period =
            parse_var("RESIZE_QUIET_SECS", config.resize_quiet_period)?;
        config.win_score = parse_var("WIN_SCORE", config.win_score)?;

        if config.surface_width <= 0.0 || config.surface_height <= 0.0 {
            return Err(ConfigError::Invalid("SURFACE_WIDTH/SURFACE_HEIGHT"));
        }
        if config.countdown_step <= 0.0 {
            return Err(ConfigError::Invalid("COUNTDOWN_STEP_SECS"));
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert!(config.countdown_start > 0);
        assert!(config.resize_quiet_period > 0.0);
        assert!(config.paddle_height_frac < 1.0);
        assert!(config.ball_speed_frac < config.ball_max_speed_frac);
    }
}
