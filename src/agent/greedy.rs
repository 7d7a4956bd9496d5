use log::debug;

use crate::config::AgentConfig;
use crate::engine::Board;
use crate::engine::Move;

use super::heuristic::{merge_score, position_score};
use super::{BranchEval, GameOver, SearchStats, SCAN_ORDER};

/// One-ply greedy agent with a snake-order positional heuristic and a
/// two-ply merge count.
///
/// Constructors warm the engine's line table.
#[derive(Debug, Clone)]
pub struct HeuristicAgent {
    cfg: AgentConfig,
    stats: SearchStats,
}

impl HeuristicAgent {
    pub fn new() -> Self {
        Self::with_config(AgentConfig::default())
    }

    pub fn with_config(cfg: AgentConfig) -> Self {
        crate::engine::warm();
        Self { cfg, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.cfg
    }

    /// Pick the direction to play, or [`GameOver`] if none changes the board.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// use auto_2048::agent::{GameOver, HeuristicAgent};
    ///
    /// let mut agent = HeuristicAgent::new();
    /// let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
    /// assert_eq!(agent.select_move(stuck), Err(GameOver));
    /// ```
    pub fn select_move(&mut self, board: Board) -> Result<Move, GameOver> {
        let branches = self.branch_evals(board);
        self.stats.decisions += 1;
        debug!(
            "merge: {:?} position: {:?} total: {:?} legal: {:?}",
            branches.map(|b| b.merge_score),
            branches.map(|b| b.position_score),
            branches.map(|b| b.total),
            branches.map(|b| b.legal),
        );
        let picked = pick_branch(&branches).ok_or(GameOver)?;
        debug!("selected {}", picked.dir);
        Ok(picked.dir)
    }

    /// Evaluate every direction without committing any of them.
    ///
    /// Returns a fixed array in [`SCAN_ORDER`]: `[Down, Right, Left, Up]`.
    /// Illegal moves are still scored on their (unchanged) board and marked
    /// `legal = false`.
    ///
    /// ```
    /// use auto_2048::engine::{Board, Move};
    /// use auto_2048::agent::HeuristicAgent;
    ///
    /// let b = Board::from_rows([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]).unwrap();
    /// let branches = HeuristicAgent::new().branch_evals(b);
    /// assert_eq!(branches[0].dir, Move::Down);
    /// assert!(!branches[0].legal);
    /// assert_eq!(branches[1].merge_score, 1);
    /// ```
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        let reference = board.count_occupied();
        let mut plies = 0u64;
        let out = SCAN_ORDER.map(|dir| {
            let result = board.apply(dir);
            // One ply for the candidate, four for its follow-ups.
            plies += 5;
            let merge = merge_score(reference, result.board);
            let position = position_score(result.board, self.cfg.corner_penalty);
            BranchEval {
                dir,
                legal: result.changed,
                merge_score: merge,
                position_score: position,
                total: f64::from(merge) * self.cfg.merge_weight + position / self.cfg.position_divisor,
            }
        });
        self.stats.plies = plies;
        out
    }

    /// Statistics collected so far; `plies` covers the last evaluation only.
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan-and-replace selection over branches in scan order.
///
/// An illegal pick is always replaced by the next candidate; a legal candidate
/// replaces the pick only with a strictly higher total. Returns `None` when
/// every branch is illegal.
fn pick_branch(branches: &[BranchEval; 4]) -> Option<&BranchEval> {
    let mut pick = 0;
    for (j, candidate) in branches.iter().enumerate() {
        if !branches[pick].legal {
            pick = j;
        }
        if candidate.legal && candidate.total > branches[pick].total {
            pick = j;
        }
    }
    Some(&branches[pick]).filter(|b| b.legal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn branch(dir: Move, legal: bool, total: f64) -> BranchEval {
        BranchEval { dir, legal, merge_score: 0, position_score: 0.0, total }
    }

    fn random_board(rng: &mut StdRng) -> Board {
        let rows = std::array::from_fn(|_| {
            std::array::from_fn(|_| if rng.gen_bool(0.6) { 1 << rng.gen_range(1..=7u32) } else { 0 })
        });
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn first_candidate_wins_ties() {
        let branches = SCAN_ORDER.map(|dir| branch(dir, true, 1.0));
        assert_eq!(pick_branch(&branches).map(|b| b.dir), Some(Move::Down));
    }

    #[test]
    fn strictly_higher_total_replaces_pick() {
        let branches = [
            branch(Move::Down, true, 1.0),
            branch(Move::Right, true, 3.0),
            branch(Move::Left, true, 3.0),
            branch(Move::Up, true, 2.0),
        ];
        assert_eq!(pick_branch(&branches).map(|b| b.dir), Some(Move::Right));
    }

    #[test]
    fn illegal_default_is_skipped_even_with_best_total() {
        let branches = [
            branch(Move::Down, false, 100.0),
            branch(Move::Right, false, 50.0),
            branch(Move::Left, true, -10.0),
            branch(Move::Up, true, -20.0),
        ];
        assert_eq!(pick_branch(&branches).map(|b| b.dir), Some(Move::Left));
    }

    #[test]
    fn illegal_candidates_never_replace_a_legal_pick() {
        let branches = [
            branch(Move::Down, true, 0.0),
            branch(Move::Right, false, 9.0),
            branch(Move::Left, true, -1.0),
            branch(Move::Up, false, 9.0),
        ];
        assert_eq!(pick_branch(&branches).map(|b| b.dir), Some(Move::Down));
    }

    #[test]
    fn all_illegal_is_none() {
        let branches = SCAN_ORDER.map(|dir| branch(dir, false, 0.0));
        assert!(pick_branch(&branches).is_none());
    }

    #[test]
    fn full_board_is_game_over() {
        let b = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        let mut agent = HeuristicAgent::new();
        assert_eq!(agent.select_move(b), Err(GameOver));
        assert!(agent.branch_evals(b).iter().all(|br| !br.legal));
    }

    #[test]
    fn keeps_max_tile_in_anchor_corner() {
        let b = Board::from_rows([[0; 4], [0; 4], [0; 4], [2, 0, 0, 8]]).unwrap();
        let mut agent = HeuristicAgent::new();
        let branches = agent.branch_evals(b);
        let right = branches[1];
        let left = branches[2];
        assert!(right.legal && left.legal);
        assert_eq!(right.merge_score, left.merge_score);
        // Left pushes the 8 out of the corner and pays 10 * 8 on top.
        assert_eq!(right.position_score, 0.0);
        assert_eq!(left.position_score, -10.0 - 80.0);
        assert_eq!(agent.select_move(b), Ok(Move::Right));
    }

    #[test]
    fn corner_penalty_breaks_an_otherwise_even_race() {
        // Down and Up each merge the 4s; Up lifts the 32 out of the corner.
        let b = Board::from_rows([[0; 4], [0, 0, 0, 4], [0, 0, 0, 4], [0, 0, 0, 32]]).unwrap();
        let mut agent = HeuristicAgent::new();
        let branches = agent.branch_evals(b);
        let down = branches[0];
        let up = branches[3];
        assert_eq!(down.merge_score, up.merge_score);
        assert!(up.position_score <= down.position_score - 10.0 * 32.0);
        assert_eq!(agent.select_move(b), Ok(Move::Down));
    }

    #[test]
    fn total_combines_both_terms() {
        let b = Board::from_rows([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]).unwrap();
        let agent_default = HeuristicAgent::new().branch_evals(b);
        for br in agent_default {
            assert_eq!(br.total, f64::from(br.merge_score) * 2.0 + br.position_score / 5.0);
        }
    }

    #[test]
    fn selection_is_deterministic_and_legal() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut agent = HeuristicAgent::new();
        for _ in 0..300 {
            let b = random_board(&mut rng);
            let first = agent.select_move(b);
            assert_eq!(first, agent.select_move(b));
            match first {
                Ok(dir) => assert!(b.apply(dir).changed),
                Err(GameOver) => assert!(b.is_game_over()),
            }
        }
    }

    #[test]
    fn stats_track_decisions() {
        let b = Board::from_rows([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]).unwrap();
        let mut agent = HeuristicAgent::new();
        agent.select_move(b).unwrap();
        agent.select_move(b).unwrap();
        assert_eq!(agent.last_stats(), SearchStats { plies: 20, decisions: 2 });
        agent.reset_stats();
        assert_eq!(agent.last_stats(), SearchStats::default());
    }
}
