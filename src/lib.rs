//! A chess engine core: bitboard position state with incremental Zobrist
//! hashing, magic-bitboard move generation, and a time-bounded
//! iterative-deepening alpha-beta search backed by a generation-aged
//! transposition table.
//!
//! ```
//! use std::time::Duration;
//! use tempo::{find_best_move, Board, TranspositionTable};
//!
//! let mut board = Board::new();
//! let mut tt = TranspositionTable::new(16);
//! let result = find_best_move(&mut board, &mut tt, Duration::from_millis(100));
//! let best = result.best_move.expect("the initial position has moves");
//! board.play_move(best);
//! ```

pub mod board;
pub mod tt;
mod zobrist;

pub use board::{
    find_best_move, find_best_move_depth, init_tables, Bitboard, Board, Color, FenError, Move,
    MoveList, Piece, SearchClock, SearchResult, SearchStats, Square, SquareError, UnmakeInfo,
};
pub use tt::{Bound, TranspositionTable, TtEntry};
