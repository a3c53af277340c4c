//! Zobrist hashing for positions.
//!
//! Provides incrementally-updatable 64-bit position hashes: one key per
//! (piece, color, square), a side-to-move key, one key per castling right,
//! and one key per en-passant file.

use rand::prelude::*;

use crate::board::{Color, Piece, Square};

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    // castling_keys[color][side] : 0=White, 1=Black; 0=Kingside, 1=Queenside
    pub(crate) castling_keys: [[u64; 2]; 2],
    // en_passant_keys[file_index] (only the file matters for the EP target)
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed so hashes are reproducible across runs and tests.
        let mut rng = StdRng::seed_from_u64(0x7A6F_6272_6973_74_u64);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [[0; 2]; 2];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

pub(crate) static ZOBRIST: std::sync::LazyLock<ZobristKeys> =
    std::sync::LazyLock::new(ZobristKeys::new);

#[inline]
pub(crate) fn piece_key(piece: Piece, color: Color, sq: Square) -> u64 {
    ZOBRIST.piece_keys[piece.index()][color.index()][sq.as_index()]
}

#[inline]
pub(crate) fn en_passant_key(sq: Square) -> u64 {
    ZOBRIST.en_passant_keys[sq.file()]
}
