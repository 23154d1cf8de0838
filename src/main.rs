//! Headless runner
//!
//! Plays one round with a scripted pilot at 60 Hz, records the score on the
//! leaderboard and prints the top ten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asteroids_sim::consts::HIGHSCORES_PATH;
use asteroids_sim::{GameEvent, GameState, Leaderboard, Settings, TickInput, tick};
use clap::Parser;

const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "asteroids-sim")]
#[command(about = "Run a headless Asteroids round and record the score")]
struct Cli {
    /// RNG seed for the round
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Stop after this many frames if the ship survives
    #[arg(long, default_value_t = 18_000)]
    ticks: u32,
    /// JSON settings file (defaults when missing or invalid)
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value = HIGHSCORES_PATH)]
    leaderboard: PathBuf,
    /// Name to record the score under
    #[arg(long, default_value = "PILOT")]
    name: String,
    /// Replace the stored score instead of keeping the best
    #[arg(long)]
    overwrite: bool,
}

/// Spins in place firing, with short thrust bursts
fn scripted_input(frame: u32) -> TickInput {
    TickInput {
        rotate_right: true,
        thrust: frame % 90 < 12,
        fire: true,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let max_name_len = settings.max_name_len;

    let mut state = GameState::new(cli.seed, settings).context("invalid settings")?;
    let mut frames = 0;
    let mut shields_used = 0;
    let mut chains = 0;

    while frames < cli.ticks && !state.is_round_over() {
        for event in tick(&mut state, &scripted_input(frames), FRAME_DT) {
            match event {
                GameEvent::ShieldAbsorbed { .. } => shields_used += 1,
                GameEvent::ChainBonus { .. } => chains += 1,
                _ => {}
            }
        }
        frames += 1;
    }

    let score = state.score.score();
    println!(
        "Seed {}: score {} after {:.1}s ({} frames, {} chain bonuses, {} shield saves)",
        cli.seed, score, state.time, frames, chains, shields_used
    );

    let mut board = Leaderboard::load(&cli.leaderboard).with_max_name_len(max_name_len);
    let name = board
        .submit(&cli.name, score, cli.overwrite)
        .with_context(|| format!("saving leaderboard to {}", cli.leaderboard.display()))?;
    println!("Recorded as {name} (rank {})", board.rank_of(score));

    println!();
    println!("=== HIGH SCORES ===");
    for (i, (name, best)) in board.top(10).into_iter().enumerate() {
        println!("{:2}. {:<12} {:>6}", i + 1, name, best);
    }

    Ok(())
}
