//! FEN import and export.

use std::str::FromStr;

use super::error::FenError;
use super::types::castle_bit;
use super::{Board, Color, Piece, Square};

impl Board {
    /// Parse a FEN string. The first four fields are required; the halfmove
    /// clock and fullmove number default to 0 and 1 when absent.
    pub fn try_from_fen(fen: &str) -> Result<Board, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first.
            let rank = 7 - i;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank, files: file + 1 });
                    }
                    board.set_piece(Square(rank, file), color, piece);
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::TooManyFiles { rank, files: file });
            }
        }

        board.white_to_move = match parts[1] {
            "w" => true,
            "b" => false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let bit = castle_bit(color, c.to_ascii_uppercase());
                if bit == 0 {
                    return Err(FenError::InvalidCastling { char: c });
                }
                board.castling_rights |= bit;
            }
        }

        if parts[3] != "-" {
            let sq = Square::from_str(parts[3]).map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            board.en_passant_target = Some(sq);
        }

        board.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        board.update_occupancy();
        board.hash = board.recompute_hash();
        board.material = board.recompute_material();
        Ok(board)
    }

    /// Parse a FEN string known to be well formed.
    ///
    /// # Panics
    /// Panics on malformed input; [`Board::try_from_fen`] reports the
    /// error instead.
    #[must_use]
    pub fn from_fen(fen: &str) -> Board {
        Board::try_from_fen(fen).expect("malformed FEN")
    }

    /// Serialize to a full six-field FEN string; parsing it back yields an
    /// identical position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.piece_at(Square(rank, file)) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
                            empty_run = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (bit, c) in [
                (castle_bit(Color::White, 'K'), 'K'),
                (castle_bit(Color::White, 'Q'), 'Q'),
                (castle_bit(Color::Black, 'K'), 'k'),
                (castle_bit(Color::Black, 'Q'), 'q'),
            ] {
                if self.castling_rights & bit != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_target {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
