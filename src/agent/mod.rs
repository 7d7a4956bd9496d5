//! Heuristic move-selection agent for 2048.
//!
//! [`HeuristicAgent`] scores each direction with two terms:
//! - a positional term that rewards boards whose values fall off monotonically
//!   along a fixed snake path from the bottom-right corner ([`SNAKE_ORDER`]),
//!   with a heavy penalty when the largest tile leaves that corner;
//! - a merge term that counts how many tiles the move plus the best follow-up
//!   move would consolidate.
//!
//! The agent is deterministic and never touches the caller's board; every
//! candidate is simulated on a copy.
//!
//! Quick start
//! ```
//! use auto_2048::engine::{Board, Move};
//! use auto_2048::agent::HeuristicAgent;
//!
//! let b = Board::from_rows([[0; 4], [0; 4], [0; 4], [2, 0, 0, 8]]).unwrap();
//! let mut agent = HeuristicAgent::new();
//! // Right keeps the 8 in the corner; Left would evict it.
//! assert_eq!(agent.select_move(b), Ok(Move::Right));
//! ```

use crate::engine::Move;

mod greedy;
mod heuristic;

pub use greedy::HeuristicAgent;
pub use heuristic::{ANCHOR, SNAKE_ORDER};

/// Order in which candidates are evaluated; index 0 is the default pick and
/// earlier entries win ties.
pub const SCAN_ORDER: [Move; 4] = [Move::Down, Move::Right, Move::Left, Move::Up];

/// Returned by [`HeuristicAgent::select_move`] when no direction changes the board.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("game over: no direction changes the board")]
pub struct GameOver;

/// Per-direction evaluation at the root.
///
/// - `legal` is false when the move is a no-op for the current board.
/// - `total` is `merge_score * merge_weight + position_score / position_divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub legal: bool,
    pub merge_score: u32,
    pub position_score: f64,
    pub total: f64,
}

/// Basic counters for the agent's work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Plies simulated during the last evaluation.
    pub plies: u64,
    /// Decisions made since construction or the last reset.
    pub decisions: u64,
}
