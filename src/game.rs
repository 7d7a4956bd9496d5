//! Turn driver: asks the agent for a direction, applies it, spawns a tile.
//!
//! Each [`Game::step`] is one fully settled cycle, so the agent always sees
//! the board after the previous move and its spawn.
//!
//! Full loop (simplest possible)
//! ```
//! use auto_2048::agent::HeuristicAgent;
//! use auto_2048::game::{Game, HighScore};
//! use auto_2048::spawn::RandomSpawner;
//!
//! let mut agent = HeuristicAgent::new();
//! let mut scores = HighScore::default();
//! let mut game = Game::new(RandomSpawner::seeded(123));
//! let summary = game.play(&mut agent, &mut scores, Some(25));
//! assert!(summary.moves > 0);
//! assert_eq!(scores.current(), summary.score);
//! ```

use log::{debug, info};
use serde::Serialize;

use crate::agent::HeuristicAgent;
use crate::engine::{Board, Move};
use crate::spawn::TileSpawner;

/// Tiles placed on an empty board at the start of a game.
pub const START_TILES: usize = 2;

/// Score updates emitted whenever a move changes the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    Add(u64),
    Set(u64),
}

/// Receives score updates from the driver.
pub trait ScoreReporter {
    fn report(&mut self, event: ScoreEvent);
}

impl<F: FnMut(ScoreEvent)> ScoreReporter for F {
    fn report(&mut self, event: ScoreEvent) {
        self(event)
    }
}

/// Tracks the current score and the best seen this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    current: u64,
    best: u64,
}

impl HighScore {
    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn best(&self) -> u64 {
        self.best
    }
}

impl ScoreReporter for HighScore {
    fn report(&mut self, event: ScoreEvent) {
        match event {
            ScoreEvent::Add(points) => self.current += points,
            ScoreEvent::Set(score) => self.current = score,
        }
        self.best = self.best.max(self.current);
    }
}

/// Result of one driver cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// `dir` was played and earned `points` of merged value.
    Moved { dir: Move, points: u64 },
    GameOver,
}

/// End-of-game report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u32,
    pub game_over: bool,
    pub final_board: [[u32; 4]; 4],
}

/// Owns the authoritative board; the agent only ever sees copies of it.
#[derive(Debug, Clone)]
pub struct Game<S> {
    board: Board,
    spawner: S,
    score: u64,
    moves: u64,
}

impl<S: TileSpawner> Game<S> {
    /// Start a game with [`START_TILES`] spawned tiles.
    pub fn new(mut spawner: S) -> Self {
        let mut board = Board::EMPTY;
        for _ in 0..START_TILES {
            if let Some(next) = spawner.spawn(board) {
                board = next;
            }
        }
        Self::from_board(board, spawner)
    }

    /// Resume from an existing board with a zero score.
    pub fn from_board(board: Board, spawner: S) -> Self {
        Self { board, spawner, score: 0, moves: 0 }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Run one select, apply, spawn cycle.
    pub fn step<R: ScoreReporter + ?Sized>(&mut self, agent: &mut HeuristicAgent, reporter: &mut R) -> StepOutcome {
        let Ok(dir) = agent.select_move(self.board) else {
            return StepOutcome::GameOver;
        };
        let result = self.board.apply(dir);
        if !result.changed {
            return StepOutcome::GameOver;
        }
        let points = result.board.score() - self.board.score();
        self.board = self.spawner.spawn(result.board).unwrap_or(result.board);
        self.moves += 1;
        self.score += points;
        reporter.report(ScoreEvent::Add(points));
        debug!("move {} {dir}: +{points}", self.moves);
        StepOutcome::Moved { dir, points }
    }

    /// Step until game over or `max_moves` moves have been played.
    pub fn play<R: ScoreReporter + ?Sized>(
        &mut self,
        agent: &mut HeuristicAgent,
        reporter: &mut R,
        max_moves: Option<u64>,
    ) -> GameSummary {
        reporter.report(ScoreEvent::Set(self.score));
        let mut game_over = false;
        while max_moves.map_or(true, |cap| self.moves < cap) {
            if self.step(agent, reporter) == StepOutcome::GameOver {
                game_over = true;
                break;
            }
        }
        let summary = self.summary(game_over);
        info!(
            "game finished: moves={} score={} highest_tile={} game_over={}",
            summary.moves, summary.score, summary.highest_tile, summary.game_over
        );
        summary
    }

    pub fn summary(&self, game_over: bool) -> GameSummary {
        GameSummary {
            moves: self.moves,
            score: self.score,
            highest_tile: self.board.highest_tile(),
            game_over,
            final_board: self.board.to_rows(),
        }
    }
}
