use crate::engine::{Board, Move};

/// Cell priority ranking, highest priority first, as `(row, col)`.
///
/// The path starts in the bottom-right corner, snakes through the right three
/// columns of the bottom three rows, climbs the left column and finishes along
/// the top row from right to left.
#[rustfmt::skip]
pub const SNAKE_ORDER: [(usize, usize); 16] = [
    (3, 3), (3, 2), (3, 1), (2, 1),
    (2, 2), (2, 3), (1, 3), (1, 2),
    (1, 1), (3, 0), (2, 0), (1, 0),
    (0, 3), (0, 2), (0, 1), (0, 0),
];

/// The corner the largest tile should occupy.
pub const ANCHOR: (usize, usize) = SNAKE_ORDER[0];

/// Monotonicity along [`SNAKE_ORDER`] plus the anchor-corner penalty.
///
/// Every pair where a higher-priority cell holds less than a lower-priority
/// cell costs 1. If the anchor holds less than the board's largest tile the
/// score also drops by `corner_penalty * max_tile`.
pub(crate) fn position_score(board: Board, corner_penalty: f64) -> f64 {
    let values = SNAKE_ORDER.map(|(row, col)| board.cell(row, col));
    let mut score = 0.0;
    for (i, &earlier) in values.iter().enumerate() {
        score -= values[i + 1..].iter().filter(|&&later| earlier < later).count() as f64;
    }
    let max_tile = board.highest_tile();
    if values[0] < max_tile {
        score -= corner_penalty * f64::from(max_tile);
    }
    score
}

/// Largest drop in occupied cells from `reference` tiles after one more move from `board`.
pub(crate) fn merge_score(reference: u32, board: Board) -> u32 {
    Move::ALL
        .iter()
        .map(|&dir| reference.saturating_sub(board.shift(dir).count_occupied()))
        .max()
        .unwrap_or(0)
}
