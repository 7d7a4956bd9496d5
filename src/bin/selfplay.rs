use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use auto_2048::agent::HeuristicAgent;
use auto_2048::config::{AgentConfig, GameConfig};
use auto_2048::game::{Game, GameSummary, HighScore};
use auto_2048::spawn::RandomSpawner;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Play many seeded 2048 games in parallel and report totals")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 64)]
    games: u64,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// TOML config with agent weights (its seed is ignored)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-game move cap
    #[arg(long)]
    max_moves: Option<u64>,

    /// Write one JSON summary per game to this path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct GameRecord {
    seed: u64,
    #[serde(flatten)]
    summary: GameSummary,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => GameConfig::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    let max_moves = args.max_moves.or(cfg.max_moves);
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games | {msg}")?
                .progress_chars("=> ")
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let records: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let seed = args.seed.wrapping_add(i);
            let record = play_one(seed, &cfg.agent, max_moves);
            pb.inc(1);
            pb.set_message(format!("last: {} (tile {})", record.summary.score, record.summary.highest_tile));
            record
        })
        .collect();
    pb.finish_and_clear();
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);

    print_totals(&records, elapsed);

    if let Some(path) = &args.out {
        write_records(path, &records).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} game summaries to {}", records.len(), path.display());
    }
    Ok(())
}

fn play_one(seed: u64, agent_cfg: &AgentConfig, max_moves: Option<u64>) -> GameRecord {
    let mut agent = HeuristicAgent::with_config(agent_cfg.clone());
    let mut game = Game::new(RandomSpawner::seeded(seed));
    let summary = game.play(&mut agent, &mut HighScore::default(), max_moves);
    GameRecord { seed, summary }
}

fn print_totals(records: &[GameRecord], elapsed: f64) {
    if records.is_empty() {
        println!("No games played");
        return;
    }
    let total_moves: u64 = records.iter().map(|r| r.summary.moves).sum();
    let total_score: u64 = records.iter().map(|r| r.summary.score).sum();
    let best = records.iter().map(|r| r.summary.score).max().unwrap_or(0);
    let mut tiles: BTreeMap<u32, usize> = BTreeMap::new();
    for r in records {
        *tiles.entry(r.summary.highest_tile).or_default() += 1;
    }

    println!(
        "Games: {} | moves/sec: {:.1} | mean score: {:.1} | best score: {}",
        records.len(),
        total_moves as f64 / elapsed,
        total_score as f64 / records.len() as f64,
        best
    );
    for (tile, count) in tiles.iter().rev() {
        println!(
            "  highest tile {:>6}: {:>5} games ({:.1}%)",
            tile,
            count,
            100.0 * *count as f64 / records.len() as f64
        );
    }
}

fn write_records(path: &PathBuf, records: &[GameRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
