//! Reversible move application.
//!
//! [`Board::make_move`] applies a move and returns the minimal
//! [`UnmakeInfo`] delta needed to reverse it; [`Board::unmake_move`]
//! restores the prior position exactly, including hash and material.
//! Search drives these directly; played game moves go through
//! `play_move`/`take_back`, which layer a snapshot stack on top.

use super::state::{NullMoveInfo, UnmakeInfo, PIECE_VALUES};
use super::types::{bit_for_square, castle_bit};
use super::{
    Board, Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};
use crate::zobrist::{en_passant_key, piece_key, ZOBRIST};

/// +1 for White pieces, -1 for Black, the sign a piece of that color
/// contributes to the material balance.
#[inline]
fn material_sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// XOR-difference of the castling keys for every right present in exactly
/// one of the two masks.
fn castle_hash_diff(old_rights: u8, new_rights: u8) -> u64 {
    let changed = old_rights ^ new_rights;
    let mut diff = 0u64;
    for (bit, color, side) in [
        (CASTLE_WHITE_K, 0usize, 0usize),
        (CASTLE_WHITE_Q, 0, 1),
        (CASTLE_BLACK_K, 1, 0),
        (CASTLE_BLACK_Q, 1, 1),
    ] {
        if changed & bit != 0 {
            diff ^= ZOBRIST.castling_keys[color][side];
        }
    }
    diff
}

/// The castling right revoked when a rook leaves (or is captured on) this
/// square, if it is a starting corner.
fn rook_corner_bit(sq: Square) -> u8 {
    match (sq.rank(), sq.file()) {
        (0, 7) => CASTLE_WHITE_K,
        (0, 0) => CASTLE_WHITE_Q,
        (7, 7) => CASTLE_BLACK_K,
        (7, 0) => CASTLE_BLACK_Q,
        _ => 0,
    }
}

impl Board {
    /// The side to move.
    #[inline]
    #[must_use]
    pub fn current_color(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = bit_for_square(sq).0;
        if self.all_occupied.0 & bit == 0 {
            return None;
        }
        let color = if self.occupied[0].0 & bit != 0 {
            Color::White
        } else {
            Color::Black
        };
        for p_idx in 0..6 {
            if self.pieces[color.index()][p_idx].0 & bit != 0 {
                return Some((color, Piece::from_index(p_idx)));
            }
        }
        unreachable!("occupancy bit set but no piece mask matches");
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.all_occupied.0 & bit_for_square(sq).0 == 0
    }

    #[inline]
    pub(crate) fn has_castling_right(&self, bit: u8) -> bool {
        self.castling_rights & bit != 0
    }

    /// Set a bit in one piece mask. Does not touch occupancy, hash, or
    /// material; callers recompute or update those themselves.
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].0 |= bit_for_square(sq).0;
    }

    /// Clear a bit in one piece mask. Same caveats as [`Board::set_piece`].
    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].0 &= !bit_for_square(sq).0;
    }

    /// Full hash recomputation from scratch. The incremental hash must
    /// always equal this; tests and debug assertions lean on it.
    pub(crate) fn recompute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for c_idx in 0..2 {
            let color = if c_idx == 0 { Color::White } else { Color::Black };
            for p_idx in 0..6 {
                let mut bb = self.pieces[c_idx][p_idx];
                while bb.0 != 0 {
                    let sq_idx = super::types::pop_lsb(&mut bb);
                    hash ^= piece_key(Piece::from_index(p_idx), color, Square::from_index(sq_idx));
                }
            }
        }
        if !self.white_to_move {
            hash ^= ZOBRIST.black_to_move_key;
        }
        hash ^= castle_hash_diff(0, self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= en_passant_key(ep);
        }
        hash
    }

    /// Apply `m` for the side to move. The move must have come from move
    /// generation on this exact position; nothing is validated here.
    ///
    /// Returns the delta [`Board::unmake_move`] needs to reverse it.
    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        let info = UnmakeInfo {
            previous_en_passant_target: self.en_passant_target,
            previous_castling_rights: self.castling_rights,
            previous_hash: self.hash,
            previous_halfmove_clock: self.halfmove_clock,
            previous_fullmove_number: self.fullmove_number,
            previous_material: self.material,
        };

        let us = self.current_color();
        let them = us.opponent();

        // The en passant window closes every move; a double push reopens it.
        if let Some(ep) = self.en_passant_target.take() {
            self.hash ^= en_passant_key(ep);
        }

        // Lift the moving piece.
        self.remove_piece(m.from, us, m.piece);
        self.hash ^= piece_key(m.piece, us, m.from);

        // Remove whatever is captured. For en passant the victim pawn sits
        // on the origin rank, not the destination square.
        if m.is_en_passant() {
            let victim = Square(m.from.rank(), m.to.file());
            self.remove_piece(victim, them, Piece::Pawn);
            self.hash ^= piece_key(Piece::Pawn, them, victim);
            self.material -= material_sign(them) * PIECE_VALUES[Piece::Pawn.index()];
        } else if let Some(captured) = m.captured {
            self.remove_piece(m.to, them, captured);
            self.hash ^= piece_key(captured, them, m.to);
            self.material -= material_sign(them) * PIECE_VALUES[captured.index()];
        }

        // Drop the piece on its destination, promoted if requested.
        let placed = m.promotion.unwrap_or(m.piece);
        self.set_piece(m.to, us, placed);
        self.hash ^= piece_key(placed, us, m.to);
        if let Some(promo) = m.promotion {
            self.material += material_sign(us)
                * (PIECE_VALUES[promo.index()] - PIECE_VALUES[Piece::Pawn.index()]);
        }

        // Castling moves the rook as well.
        if m.is_castling() {
            let (rook_from, rook_to) = rook_relocation(us, m.to);
            self.remove_piece(rook_from, us, Piece::Rook);
            self.set_piece(rook_to, us, Piece::Rook);
            self.hash ^= piece_key(Piece::Rook, us, rook_from);
            self.hash ^= piece_key(Piece::Rook, us, rook_to);
        }

        // A double pawn push opens an en passant window on the skipped square.
        if m.is_double_pawn_push() {
            let ep = Square((m.from.rank() + m.to.rank()) / 2, m.from.file());
            self.en_passant_target = Some(ep);
            self.hash ^= en_passant_key(ep);
        }

        // Revoke castling rights on king moves, rook moves off a starting
        // corner, and captures of a rook on a starting corner.
        let mut new_rights = self.castling_rights;
        if m.piece == Piece::King {
            new_rights &= !(castle_bit(us, 'K') | castle_bit(us, 'Q'));
        } else if m.piece == Piece::Rook {
            new_rights &= !rook_corner_bit(m.from);
        }
        if m.captured == Some(Piece::Rook) {
            new_rights &= !rook_corner_bit(m.to);
        }
        if new_rights != self.castling_rights {
            self.hash ^= castle_hash_diff(self.castling_rights, new_rights);
            self.castling_rights = new_rights;
        }

        // Clocks.
        if m.piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.white_to_move = !self.white_to_move;
        self.hash ^= ZOBRIST.black_to_move_key;

        self.update_occupancy();

        #[cfg(debug_assertions)]
        self.assert_consistent();

        info
    }

    /// Reverse a move applied by [`Board::make_move`]. `m` and `info` must
    /// be the exact pair from that call, with no interleaved mutation.
    pub fn unmake_move(&mut self, m: Move, info: &UnmakeInfo) {
        // The side that made the move is the one not on move now.
        self.white_to_move = !self.white_to_move;
        let us = self.current_color();
        let them = us.opponent();

        let placed = m.promotion.unwrap_or(m.piece);
        self.remove_piece(m.to, us, placed);
        self.set_piece(m.from, us, m.piece);

        if m.is_en_passant() {
            let victim = Square(m.from.rank(), m.to.file());
            self.set_piece(victim, them, Piece::Pawn);
        } else if let Some(captured) = m.captured {
            self.set_piece(m.to, them, captured);
        }

        if m.is_castling() {
            let (rook_from, rook_to) = rook_relocation(us, m.to);
            self.remove_piece(rook_to, us, Piece::Rook);
            self.set_piece(rook_from, us, Piece::Rook);
        }

        self.en_passant_target = info.previous_en_passant_target;
        self.castling_rights = info.previous_castling_rights;
        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;
        self.material = info.previous_material;

        self.update_occupancy();

        #[cfg(debug_assertions)]
        self.assert_consistent();
    }

    /// Pass the turn without moving. Used by null-move pruning; illegal as
    /// a game move, so it never goes through the play/take-back stack.
    pub(crate) fn make_null_move(&mut self) -> NullMoveInfo {
        let info = NullMoveInfo {
            previous_en_passant_target: self.en_passant_target,
            previous_hash: self.hash,
        };
        if let Some(ep) = self.en_passant_target.take() {
            self.hash ^= en_passant_key(ep);
        }
        self.white_to_move = !self.white_to_move;
        self.hash ^= ZOBRIST.black_to_move_key;
        info
    }

    pub(crate) fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.previous_en_passant_target;
        self.hash = info.previous_hash;
    }
}

/// Rook start and end squares for a castling move whose king lands on
/// `king_to` (file 6 kingside, file 2 queenside).
fn rook_relocation(color: Color, king_to: Square) -> (Square, Square) {
    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    if king_to.file() == 6 {
        (Square(rank, 7), Square(rank, 5))
    } else {
        (Square(rank, 0), Square(rank, 3))
    }
}
