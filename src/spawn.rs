//! Random tile placement between moves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::Board;

/// Places a new tile after a move that changed the board.
pub trait TileSpawner {
    /// Return `board` with one empty cell filled, or `None` if it is full.
    fn spawn(&mut self, board: Board) -> Option<Board>;
}

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly random empty cell.
///
/// Deterministic example using a seeded RNG:
/// ```
/// use auto_2048::engine::Board;
/// use auto_2048::spawn::{RandomSpawner, TileSpawner};
/// let mut spawner = RandomSpawner::seeded(123);
/// let b = spawner.spawn(Board::EMPTY).and_then(|b| spawner.spawn(b)).unwrap();
/// assert_eq!(b.count_occupied(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSpawner<R = StdRng> {
    rng: R,
}

impl RandomSpawner<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl<R: Rng> RandomSpawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TileSpawner for RandomSpawner<R> {
    fn spawn(&mut self, board: Board) -> Option<Board> {
        let empty = board.count_empty() as usize;
        if empty == 0 {
            return None;
        }
        let index = self.rng.gen_range(0..empty);
        let (row, col) = board.empty_cells().nth(index)?;
        let value = generate_random_tile(&mut self.rng);
        board.with_tile(row, col, value).ok()
    }
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
