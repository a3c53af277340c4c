//! Iterative-deepening search driver.
//!
//! The driver owns the time control and the depth loop; the negamax core
//! lives in [`negamax`]. Each completed depth replaces the previous best
//! move; a depth aborted by the clock is discarded wholesale, so the
//! returned move always comes from a fully finished iteration.

mod negamax;

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::types::FLAG_CHECKMATE;
use super::{Board, Move};
use crate::tt::TranspositionTable;
use negamax::Searcher;

/// Checkmate magnitude; actual mate scores are offset toward zero by the
/// ply at which the mate is delivered, so nearer mates score higher.
pub(crate) const MATE_SCORE: i32 = 30_000;
pub(crate) const INFINITY: i32 = 32_000;

const MAX_SEARCH_DEPTH: u8 = 64;

/// Shared stop signal for a running search. The deadline lives behind a
/// mutex so another thread can arm it or cut a search short.
#[derive(Default)]
pub struct SearchClock {
    deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new() -> Self {
        SearchClock::default()
    }

    /// Arm the clock `budget` from now.
    pub fn arm(&self, budget: Duration) {
        *self.deadline.lock() = Some(Instant::now() + budget);
    }

    /// Remove any deadline; the search runs until its depth limit.
    pub fn disarm(&self) {
        *self.deadline.lock() = None;
    }

    /// Force the next expiry check to trip.
    pub fn stop(&self) {
        *self.deadline.lock() = Some(Instant::now());
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        match *self.deadline.lock() {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// Counters describing a finished search.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Nodes entered across all completed and aborted iterations.
    pub nodes: u64,
    /// Deepest fully completed iteration.
    pub depth_reached: u8,
}

/// The outcome of a search: the chosen move (if any legal move exists),
/// its score from the mover's perspective, and counters.
#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub stats: SearchStats,
}

/// Search `board` for at most `time_budget` of wall clock.
///
/// Returns `best_move: None` only when the side to move has no legal move.
/// At least depth 1 is always completed, so a legal move is returned even
/// on an already-expired budget.
pub fn find_best_move(
    board: &mut Board,
    tt: &mut TranspositionTable,
    time_budget: Duration,
) -> SearchResult {
    let clock = SearchClock::new();
    clock.arm(time_budget);
    search(board, tt, &clock, MAX_SEARCH_DEPTH)
}

/// Search to a fixed depth with no time limit.
pub fn find_best_move_depth(
    board: &mut Board,
    tt: &mut TranspositionTable,
    depth: u8,
) -> SearchResult {
    let clock = SearchClock::new();
    search(board, tt, &clock, depth.clamp(1, MAX_SEARCH_DEPTH))
}

fn search(
    board: &mut Board,
    tt: &mut TranspositionTable,
    clock: &SearchClock,
    max_depth: u8,
) -> SearchResult {
    tt.new_search();

    let mut stats = SearchStats::default();
    let mut best_move = None;
    let mut best_score = -INFINITY;

    for depth in 1..=max_depth {
        let mut searcher = Searcher::new(board, tt, clock);
        // Depth 1 ignores the clock so a legal move is always found.
        let outcome = searcher.root(depth, depth > 1);
        stats.nodes += searcher.nodes();

        match outcome {
            Some((m, score)) => {
                best_move = Some(m);
                best_score = score;
                stats.depth_reached = depth;
                log::debug!(
                    "depth {depth}: best {m} score {score} ({} nodes total)",
                    stats.nodes
                );
            }
            None if searcher.aborted() => {
                log::debug!("depth {depth} aborted by clock, keeping depth {}", stats.depth_reached);
                break;
            }
            None => {
                // No legal moves at the root; mate or stalemate.
                best_score = if board.is_in_check(board.current_color()) {
                    -MATE_SCORE
                } else {
                    0
                };
                break;
            }
        }

        if clock.expired() {
            break;
        }
        // A proven mate cannot improve with more depth.
        if best_score.abs() >= MATE_SCORE - MAX_SEARCH_DEPTH as i32 {
            break;
        }
    }

    let best_move = best_move.map(|m| annotate_checkmate(board, m));
    SearchResult {
        best_move,
        score: best_score,
        stats,
    }
}

/// Mark the chosen move if playing it checkmates the opponent.
fn annotate_checkmate(board: &mut Board, m: Move) -> Move {
    let info = board.make_move(m);
    let mates = board.is_checkmate();
    board.unmake_move(m, &info);
    let mut annotated = m;
    if mates {
        annotated.flags |= FLAG_CHECKMATE;
    }
    annotated
}
