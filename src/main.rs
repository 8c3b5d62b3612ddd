//! Headless demo driver
//!
//! Runs the background-demo mode at the fixed simulation tick rate without
//! a rendering host, logging the score as it evolves. Mostly useful for
//! watching the engine behave end to end outside a test harness.

use std::time::Duration;

use tokio::time::interval;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pong_sim::config::EngineConfig;
use pong_sim::game::GameEngine;
use pong_sim::render::NullSurface;
use pong_sim::util::time::{SIMULATION_TPS, TICK_DURATION_MICROS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;
    init_tracing(&config.log_level);

    info!("Starting pong simulation demo");
    info!(tps = SIMULATION_TPS, "Tick rate");

    let surface = NullSurface::new(config.surface_width, config.surface_height);
    let mut engine = GameEngine::new(config, Box::new(surface));
    engine.initialize_background_demo(rand::random());
    engine.start_game();

    let mut tick_interval = interval(Duration::from_micros(TICK_DURATION_MICROS));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut last_score = (0, 0);
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                engine.update();
                engine.draw();

                if let Some(report) = engine.match_report() {
                    let score = (report.score_left, report.score_right);
                    if score != last_score {
                        info!(score_left = score.0, score_right = score.1, "Score");
                        last_score = score;
                    }
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    if let Some(report) = engine.match_report() {
        match serde_json::to_string(&report) {
            Ok(json) => info!(report = %json, "Final report"),
            Err(err) => info!(error = %err, "Report serialization failed"),
        }
    }

    engine.cleanup();
    info!("Demo shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
