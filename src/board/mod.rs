//! Board representation, move generation, and search.

mod attack_tables;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::init_tables;
pub use error::{FenError, SquareError};
pub use search::{
    find_best_move, find_best_move_depth, SearchClock, SearchResult, SearchStats,
};
pub use state::{Board, UnmakeInfo};
pub use types::{Bitboard, Color, Move, MoveList, Piece, Square};

pub(crate) use types::{CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q};
