//! Artillery Duel headless runner
//!
//! Plays AI-vs-AI rounds across every landscape and prints the scores.
//! Usage: artillery-duel [seed] [rounds]

use artillery_duel::consts::FRAME_MS;
use artillery_duel::sim::{ControlMode, GameEvent, LandscapeKind};
use artillery_duel::{Game, MatchConfig};

/// Frames before a round is abandoned as a stalemate
const MAX_FRAMES_PER_ROUND: u32 = 60 * 60 * 5;

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        // Already initialised is fine
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

fn main() {
    init_logging();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(1);
    let rounds = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(3);
    log::info!("Artillery Duel (headless) seed {seed}, {rounds} rounds per landscape");

    let config = MatchConfig {
        seed,
        ..MatchConfig::with_players(&[ControlMode::Hard, ControlMode::Medium])
    };
    let mut game = Game::new(&config);

    for landscape in LandscapeKind::ALL {
        game.set_landscape(landscape);
        for round in 0..rounds {
            if round > 0 {
                game.new_round();
            }
            play_round(&mut game);
        }
    }

    println!("Final scores:");
    for (i, tank) in game.tanks().iter().enumerate() {
        println!("  tank {} ({}): {}", i, tank.control.as_str(), tank.score);
    }
}

fn play_round(game: &mut Game) {
    let mut shots = 0;
    for _ in 0..MAX_FRAMES_PER_ROUND {
        game.update(FRAME_MS);
        for event in game.drain_events() {
            match event {
                GameEvent::ShotFired { .. } => shots += 1,
                GameEvent::TankDestroyed { tank } => log::info!("Tank {tank} destroyed"),
                _ => {}
            }
        }
        if game.is_round_over() {
            break;
        }
    }

    match game.winner() {
        Some(winner) if game.is_round_over() => println!(
            "Round {} on {}: tank {} wins after {} shots",
            game.round(),
            game.landscape().as_str(),
            winner,
            shots
        ),
        _ => println!(
            "Round {} on {}: no winner after {} shots",
            game.round(),
            game.landscape().as_str(),
            shots
        ),
    }
}
