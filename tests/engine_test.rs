use std::sync::{Arc, Mutex};

use pong_sim::config::EngineConfig;
use pong_sim::game::{GameEngine, GamePhase};
use pong_sim::input::Key;
use pong_sim::render::{NullSurface, Surface};
use pong_sim::util::time::tick_delta;

fn engine() -> GameEngine {
    let config = EngineConfig::default();
    let surface = NullSurface::new(config.surface_width, config.surface_height);
    GameEngine::new(config, Box::new(surface))
}

fn step_secs(engine: &mut GameEngine, secs: f32) {
    let ticks = (secs / tick_delta()).ceil() as u32 + 1;
    for _ in 0..ticks {
        engine.update();
    }
}

#[test]
fn full_start_pause_resume_scenario() {
    let counts: Arc<Mutex<Vec<Option<u32>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = counts.clone();

    let mut engine = engine();
    engine.initialize_multi_player(11);
    engine.set_countdown_callback(Box::new(move |n| sink.lock().unwrap().push(n)));

    assert_eq!(engine.game_phase(), GamePhase::Paused);

    engine.start_game();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);
    assert_eq!(*counts.lock().unwrap(), vec![Some(3), Some(2), Some(1), None]);

    // Let the ball travel, then pause
    step_secs(&mut engine, 0.5);
    engine.request_pause();
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    // Second pause is a no-op
    engine.request_pause();
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    engine.toggle_pause();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);
}

#[test]
fn keyboard_confirm_starts_and_toggles() {
    let mut engine = engine();
    engine.initialize_multi_player(3);
    engine.set_keyboard_enabled(true);
    let keyboard = engine.keyboard().expect("subscription enabled");

    keyboard.press(Key::Confirm);
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);

    keyboard.press(Key::Cancel);
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    // Keys that are neither confirm nor cancel are ignored
    keyboard.press(Key::Other);
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Paused);
}

#[test]
fn enabling_keyboard_twice_keeps_one_subscription() {
    let mut engine = engine();
    engine.initialize_multi_player(3);
    engine.set_keyboard_enabled(true);
    let first = engine.keyboard().unwrap();

    engine.set_keyboard_enabled(true);
    // The original handle still feeds the engine; a single press toggles
    // exactly once
    first.press(Key::Confirm);
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);

    engine.set_keyboard_enabled(false);
    assert!(engine.keyboard().is_none());
    // Presses into the removed subscription go nowhere
    first.press(Key::Confirm);
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);
}

#[test]
fn resize_while_playing_rescales_proportionally() {
    let mut engine = engine();
    engine.initialize_multi_player(17);
    engine.start_game();
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);

    // The resize pauses immediately; the ball freezes until the remap
    engine.resize(1600.0, 300.0);
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    step_secs(&mut engine, 0.3);
    // Remapped and resumed through a fresh countdown
    assert_eq!(engine.game_phase(), GamePhase::Countdown);

    let report = engine.match_report().unwrap();
    assert_eq!(report.score_left, 0);
    assert_eq!(report.score_right, 0);
}

#[test]
fn pause_requests_are_ignored_mid_resize() {
    let mut engine = engine();
    engine.initialize_multi_player(17);
    engine.start_game();
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);

    engine.resize(1024.0, 768.0);
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    // The resize bracket owns the pause/resume pair; a keyboard toggle
    // during the debounce window must not resume early
    engine.toggle_pause();
    assert_eq!(engine.game_phase(), GamePhase::Paused);

    step_secs(&mut engine, 3.6);
    assert_eq!(engine.game_phase(), GamePhase::Playing);
}

#[test]
fn resize_during_countdown_ends_paused() {
    let mut engine = engine();
    engine.initialize_multi_player(17);
    engine.start_game();
    assert_eq!(engine.game_phase(), GamePhase::Countdown);

    engine.resize(640.0, 480.0);
    step_secs(&mut engine, 4.0);
    assert_eq!(engine.game_phase(), GamePhase::Paused);
}

#[test]
fn background_demo_runs_and_scores_without_countdowns() {
    let mut engine = engine();
    engine.initialize_background_demo(99);
    engine.start_game();
    assert_eq!(engine.game_phase(), GamePhase::Playing);

    // The demo plays itself; a few simulated minutes are plenty for
    // points to land, and the match never ends
    step_secs(&mut engine, 180.0);
    let report = engine.match_report().unwrap();
    assert!(report.score_left + report.score_right > 0);
    assert!(!report.game_over);
    assert_eq!(engine.game_phase(), GamePhase::Playing);
}

#[test]
fn draw_is_safe_before_update_and_after_cleanup() {
    let mut engine = engine();
    engine.draw();

    engine.initialize_single_player(1);
    engine.draw();

    engine.cleanup();
    engine.cleanup();
    engine.draw();
    engine.update();
    assert!(engine.match_report().is_none());
}

#[test]
fn cleanup_cancels_outstanding_resize_and_countdown() {
    let mut engine = engine();
    engine.initialize_multi_player(5);
    engine.start_game();
    engine.resize(500.0, 500.0);
    engine.cleanup();

    // Any deferred work must be a guaranteed no-op now
    step_secs(&mut engine, 5.0);
    assert_eq!(engine.game_phase(), GamePhase::Paused);
    assert!(engine.match_report().is_none());
}

#[test]
fn names_and_colors_require_non_empty_values() {
    let mut engine = engine();
    engine.initialize_multi_player(5);
    engine.set_player_names("alice", "");
    engine.update_player_colors("", "#00ff00");
    // Setters forward silently; the observable contract is simply that
    // the engine stays healthy
    engine.update();
    assert_eq!(engine.game_phase(), GamePhase::Paused);
}

#[test]
fn single_player_opponent_tracks_without_input() {
    let mut engine = engine();
    engine.initialize_single_player(23);
    engine.start_game();
    step_secs(&mut engine, 3.2);
    assert_eq!(engine.game_phase(), GamePhase::Playing);

    // Drive the human paddle; the opponent needs no axis to stay alive
    engine.set_paddle_axis(pong_sim::game::PlayerSide::Left, 1.0);
    step_secs(&mut engine, 10.0);
    assert!(engine.match_report().is_some());
}

#[test]
fn null_surface_tracks_dimensions() {
    let mut surface = NullSurface::new(800.0, 600.0);
    surface.set_size(1024.0, 768.0);
    assert_eq!(surface.width(), 1024.0);
    assert_eq!(surface.height(), 768.0);
}
