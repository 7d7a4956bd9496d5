use std::path::PathBuf;

use anyhow::Context;
use auto_2048::agent::HeuristicAgent;
use auto_2048::config::GameConfig;
use auto_2048::game::{Game, HighScore, StepOutcome};
use auto_2048::spawn::RandomSpawner;
use clap::Parser;
use env_logger::Env;

#[derive(Debug, Parser)]
#[command(name = "auto-2048", about = "Watch the heuristic agent play one game of 2048")]
struct Args {
    /// TOML config with agent weights and game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for tile spawns (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves (overrides the config)
    #[arg(long)]
    max_moves: Option<u64>,

    /// Only print the final board and totals
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => GameConfig::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    let seed = args.seed.or(cfg.seed);
    let max_moves = args.max_moves.or(cfg.max_moves);

    let spawner = match seed {
        Some(seed) => RandomSpawner::seeded(seed),
        None => RandomSpawner::from_entropy(),
    };
    let mut agent = HeuristicAgent::with_config(cfg.agent);
    let mut scores = HighScore::default();
    let mut game = Game::new(spawner);
    if !args.quiet {
        println!("{}", game.board());
    }

    let mut game_over = false;
    while max_moves.map_or(true, |cap| game.moves() < cap) {
        match game.step(&mut agent, &mut scores) {
            StepOutcome::Moved { dir, points } => {
                if !args.quiet {
                    println!("move {}: {} (+{})\n{}", game.moves(), dir, points, game.board());
                }
            }
            StepOutcome::GameOver => {
                game_over = true;
                break;
            }
        }
    }

    if args.quiet {
        println!("{}", game.board());
    }
    let summary = game.summary(game_over);
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, Game over: {}",
        summary.moves, summary.score, summary.highest_tile, summary.game_over
    );
    Ok(())
}
