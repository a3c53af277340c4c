//! Negamax core with alpha-beta, null-move pruning, and transposition
//! table integration.

use super::{SearchClock, INFINITY, MATE_SCORE};
use crate::board::{Board, Color, Move, MoveList, Piece, Square};
use crate::tt::{Bound, TranspositionTable};

type MoveHint = (Square, Square, Option<Piece>);

/// Null-move depth reduction.
const NULL_MOVE_REDUCTION: u8 = 2;

/// Check the clock once per this many nodes (power of two).
const CLOCK_CHECK_MASK: u64 = 2048 - 1;

pub(super) struct Searcher<'a> {
    board: &'a mut Board,
    tt: &'a TranspositionTable,
    clock: &'a SearchClock,
    use_clock: bool,
    nodes: u64,
    aborted: bool,
}

impl<'a> Searcher<'a> {
    pub(super) fn new(
        board: &'a mut Board,
        tt: &'a TranspositionTable,
        clock: &'a SearchClock,
    ) -> Self {
        Searcher {
            board,
            tt,
            clock,
            use_clock: true,
            nodes: 0,
            aborted: false,
        }
    }

    pub(super) fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(super) fn aborted(&self) -> bool {
        self.aborted
    }

    /// Search the root to `depth`. Returns the best move and score, or
    /// `None` when there is no legal move or the iteration was aborted;
    /// aborted iterations report partial work through [`Self::aborted`].
    pub(super) fn root(&mut self, depth: u8, use_clock: bool) -> Option<(Move, i32)> {
        self.use_clock = use_clock;

        let hint = self.tt.probe(self.board.hash()).and_then(|e| e.best);
        let mut moves = self.board.generate_moves();
        order_moves(&mut moves, hint);
        if moves.is_empty() {
            return None;
        }

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for &m in &moves {
            let info = self.board.make_move(m);
            let score = -self.negamax(depth - 1, 1, -beta, -alpha, true);
            self.board.unmake_move(m, &info);
            if self.aborted {
                return None;
            }
            if best.is_none() || score > alpha {
                alpha = alpha.max(score);
                best = Some((m, score));
            }
        }

        if let Some((m, score)) = best {
            let clamped = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
            self.tt
                .store(self.board.hash(), Some(m), clamped, depth, Bound::Exact);
        }
        best
    }

    fn negamax(&mut self, depth: u8, ply: u8, mut alpha: i32, beta: i32, allow_null: bool) -> i32 {
        if self.use_clock && self.nodes & CLOCK_CHECK_MASK == 0 && self.clock.expired() {
            self.aborted = true;
            return 0;
        }
        self.nodes += 1;

        if self.board.is_draw() {
            return 0;
        }

        // Transposition table probe. The stored move seeds ordering even
        // when the entry is too shallow to cut off.
        let mut hint = None;
        if let Some(entry) = self.tt.probe(self.board.hash()) {
            hint = entry.best;
            if let Some(score) = entry.cutoff(depth, alpha, beta) {
                return score;
            }
        }

        if depth == 0 {
            return self.evaluate();
        }

        let us = self.board.current_color();
        let in_check = self.board.is_in_check(us);

        // Null-move pruning: hand the opponent a free move; if the reduced
        // search still fails high the real position almost surely would
        // too. Skipped in check (passing would be illegal there) and when
        // the mover has only pawns, where zugzwang breaks the reasoning.
        // `allow_null` forbids two consecutive null moves.
        if allow_null
            && !in_check
            && depth > NULL_MOVE_REDUCTION
            && self.has_non_pawn_material(us)
        {
            let info = self.board.make_null_move();
            let score = -self.negamax(
                depth - 1 - NULL_MOVE_REDUCTION,
                ply + 1,
                -beta,
                -beta + 1,
                false,
            );
            self.board.unmake_null_move(info);
            if self.aborted {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut moves = self.board.generate_moves();
        if moves.is_empty() {
            // Mate scores shrink with ply so the search prefers the
            // shortest mate it can find.
            return if in_check { -(MATE_SCORE - i32::from(ply)) } else { 0 };
        }
        order_moves(&mut moves, hint);

        let alpha_original = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for &m in &moves {
            let info = self.board.make_move(m);
            let score = -self.negamax(depth - 1, ply + 1, -beta, -alpha, true);
            self.board.unmake_move(m, &info);
            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(m);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score <= alpha_original {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let clamped = best_score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        self.tt
            .store(self.board.hash(), best_move, clamped, depth, bound);

        best_score
    }

    /// Static evaluation: material balance from the mover's perspective.
    fn evaluate(&self) -> i32 {
        if self.board.white_to_move() {
            self.board.material()
        } else {
            -self.board.material()
        }
    }

    fn has_non_pawn_material(&self, color: Color) -> bool {
        let pieces = &self.board.pieces[color.index()];
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .any(|p| pieces[p.index()].0 != 0)
    }
}

/// Deterministic move ordering: the table hint first, then captures, then
/// quiet moves, each group keeping generation order.
fn order_moves(moves: &mut MoveList, hint: Option<MoveHint>) {
    let slice = moves.as_mut_slice();
    slice.sort_by_key(|m| {
        let is_hint = hint.is_some_and(|(from, to, promo)| m.same_action(from, to, promo));
        if is_hint {
            0
        } else if m.is_capture() {
            1
        } else {
            2
        }
    });
}
