//! Move generation.
//!
//! Pseudo-legal moves come straight off the attack tables; the legal
//! generator filters them by making each move and rejecting any that leave
//! the mover's king attacked. Moves that survive are annotated with whether
//! they give check, so callers never re-derive it.

use super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::types::{
    bit_for_square, castle_bit, pop_lsb, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN,
    FLAG_EN_PASSANT, FLAG_GIVES_CHECK,
};
use super::{Board, Color, Move, MoveList, Piece, Square};

/// Promotion choices in the order they are generated.
const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

impl Board {
    /// The king square for `color`.
    ///
    /// # Panics
    /// Panics if `color` has no king; every reachable position has both.
    #[must_use]
    pub fn find_king(&self, color: Color) -> Square {
        let bb = self.pieces[color.index()][Piece::King.index()];
        assert!(bb.0 != 0, "no {color:?} king on the board");
        Square::from_index(bb.0.trailing_zeros() as usize)
    }

    /// Whether any piece of `attacker` attacks `sq`. Works backwards from
    /// the target square: the pieces that attack `sq` are exactly the ones
    /// a like piece standing on `sq` would attack.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, attacker: Color) -> bool {
        let idx = sq.as_index();
        let their = &self.pieces[attacker.index()];
        let occ = self.all_occupied.0;

        // A pawn of the defending color on `sq` attacks exactly the squares
        // an attacking pawn must stand on to hit `sq`.
        if PAWN_ATTACKS[attacker.opponent().index()][idx] & their[Piece::Pawn.index()].0 != 0 {
            return true;
        }
        if KNIGHT_ATTACKS[idx] & their[Piece::Knight.index()].0 != 0 {
            return true;
        }
        if KING_ATTACKS[idx] & their[Piece::King.index()].0 != 0 {
            return true;
        }
        let queens = their[Piece::Queen.index()].0;
        if rook_attacks(idx, occ) & (their[Piece::Rook.index()].0 | queens) != 0 {
            return true;
        }
        bishop_attacks(idx, occ) & (their[Piece::Bishop.index()].0 | queens) != 0
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.find_king(color), color.opponent())
    }

    /// All pseudo-legal moves for the side to move: piece rules and board
    /// occupancy are respected, but the mover's king may be left attacked.
    #[must_use]
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let us = self.current_color();
        let them = us.opponent();
        let own = self.occupied[us.index()].0;
        let enemy = self.occupied[them.index()].0;
        let occ = self.all_occupied.0;
        let mut moves = MoveList::new();

        self.generate_pawn_moves(us, enemy, occ, &mut moves);

        let mut knights = self.pieces[us.index()][Piece::Knight.index()];
        while knights.0 != 0 {
            let from = pop_lsb(&mut knights);
            self.push_attack_moves(Piece::Knight, from, KNIGHT_ATTACKS[from] & !own, enemy, &mut moves);
        }

        let mut bishops = self.pieces[us.index()][Piece::Bishop.index()];
        while bishops.0 != 0 {
            let from = pop_lsb(&mut bishops);
            self.push_attack_moves(Piece::Bishop, from, bishop_attacks(from, occ) & !own, enemy, &mut moves);
        }

        let mut rooks = self.pieces[us.index()][Piece::Rook.index()];
        while rooks.0 != 0 {
            let from = pop_lsb(&mut rooks);
            self.push_attack_moves(Piece::Rook, from, rook_attacks(from, occ) & !own, enemy, &mut moves);
        }

        let mut queens = self.pieces[us.index()][Piece::Queen.index()];
        while queens.0 != 0 {
            let from = pop_lsb(&mut queens);
            self.push_attack_moves(Piece::Queen, from, queen_attacks(from, occ) & !own, enemy, &mut moves);
        }

        let king = self.find_king(us);
        self.push_attack_moves(Piece::King, king.as_index(), KING_ATTACKS[king.as_index()] & !own, enemy, &mut moves);
        self.generate_castling_moves(us, &mut moves);

        moves
    }

    /// Non-pawn moves from a destination mask.
    fn push_attack_moves(
        &self,
        piece: Piece,
        from: usize,
        mut targets: u64,
        enemy: u64,
        moves: &mut MoveList,
    ) {
        let from_sq = Square::from_index(from);
        while targets != 0 {
            let to = targets.trailing_zeros() as usize;
            targets &= targets - 1;
            let to_sq = Square::from_index(to);
            let (captured, flags) = if enemy & (1u64 << to) != 0 {
                (self.piece_at(to_sq).map(|(_, p)| p), FLAG_CAPTURE)
            } else {
                (None, 0)
            };
            moves.push(Move {
                from: from_sq,
                to: to_sq,
                piece,
                captured,
                promotion: None,
                flags,
            });
        }
    }

    fn generate_pawn_moves(&self, us: Color, enemy: u64, occ: u64, moves: &mut MoveList) {
        let (forward, start_rank, promo_rank): (isize, usize, usize) = match us {
            Color::White => (1, 1, 7),
            Color::Black => (-1, 6, 0),
        };

        let mut pawns = self.pieces[us.index()][Piece::Pawn.index()];
        while pawns.0 != 0 {
            let from = pop_lsb(&mut pawns);
            let from_sq = Square::from_index(from);
            let rank = from_sq.rank();
            let file = from_sq.file();

            // Pushes. A pawn on its last rank cannot exist, so the single
            // push target is always on the board.
            let push_rank = (rank as isize + forward) as usize;
            let push_sq = Square(push_rank, file);
            if occ & bit_for_square(push_sq).0 == 0 {
                if push_rank == promo_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move {
                            from: from_sq,
                            to: push_sq,
                            piece: Piece::Pawn,
                            captured: None,
                            promotion: Some(promo),
                            flags: 0,
                        });
                    }
                } else {
                    moves.push(Move {
                        from: from_sq,
                        to: push_sq,
                        piece: Piece::Pawn,
                        captured: None,
                        promotion: None,
                        flags: 0,
                    });
                    if rank == start_rank {
                        let double_sq = Square((rank as isize + 2 * forward) as usize, file);
                        if occ & bit_for_square(double_sq).0 == 0 {
                            moves.push(Move {
                                from: from_sq,
                                to: double_sq,
                                piece: Piece::Pawn,
                                captured: None,
                                promotion: None,
                                flags: FLAG_DOUBLE_PAWN,
                            });
                        }
                    }
                }
            }

            // Captures, including en passant.
            let mut attacks = PAWN_ATTACKS[us.index()][from];
            while attacks != 0 {
                let to = attacks.trailing_zeros() as usize;
                attacks &= attacks - 1;
                let to_sq = Square::from_index(to);
                if enemy & (1u64 << to) != 0 {
                    let captured = self.piece_at(to_sq).map(|(_, p)| p);
                    if to_sq.rank() == promo_rank {
                        for promo in PROMOTION_PIECES {
                            moves.push(Move {
                                from: from_sq,
                                to: to_sq,
                                piece: Piece::Pawn,
                                captured,
                                promotion: Some(promo),
                                flags: FLAG_CAPTURE,
                            });
                        }
                    } else {
                        moves.push(Move {
                            from: from_sq,
                            to: to_sq,
                            piece: Piece::Pawn,
                            captured,
                            promotion: None,
                            flags: FLAG_CAPTURE,
                        });
                    }
                } else if self.en_passant_target == Some(to_sq) {
                    moves.push(Move {
                        from: from_sq,
                        to: to_sq,
                        piece: Piece::Pawn,
                        captured: Some(Piece::Pawn),
                        promotion: None,
                        flags: FLAG_EN_PASSANT,
                    });
                }
            }
        }
    }

    /// Castling candidates: the right must be intact, the squares between
    /// king and rook empty, and the king's start, transit, and landing
    /// squares unattacked.
    fn generate_castling_moves(&self, us: Color, moves: &mut MoveList) {
        let them = us.opponent();
        let rank = match us {
            Color::White => 0,
            Color::Black => 7,
        };
        let king_sq = Square(rank, 4);
        if self.pieces[us.index()][Piece::King.index()].0 & bit_for_square(king_sq).0 == 0 {
            return;
        }

        // (side, empty files, files the king crosses)
        let lines: [(char, &[usize], [usize; 3]); 2] =
            [('K', &[5, 6], [4, 5, 6]), ('Q', &[1, 2, 3], [4, 3, 2])];
        for (side, empty_files, king_path) in lines {
            if !self.has_castling_right(castle_bit(us, side)) {
                continue;
            }
            // Rights from FEN input may be stale; insist on the rook too.
            let rook_home = Square(rank, if side == 'K' { 7 } else { 0 });
            if self.pieces[us.index()][Piece::Rook.index()].0 & bit_for_square(rook_home).0 == 0 {
                continue;
            }
            if empty_files.iter().any(|&f| !self.is_empty(Square(rank, f))) {
                continue;
            }
            if king_path
                .iter()
                .any(|&f| self.is_square_attacked(Square(rank, f), them))
            {
                continue;
            }
            let to_file = if side == 'K' { 6 } else { 2 };
            moves.push(Move {
                from: king_sq,
                to: Square(rank, to_file),
                piece: Piece::King,
                captured: None,
                promotion: None,
                flags: FLAG_CASTLING,
            });
        }
    }

    /// All fully legal moves for the side to move, each annotated with
    /// whether it gives check.
    #[must_use]
    pub fn generate_moves(&mut self) -> MoveList {
        let us = self.current_color();
        let them = us.opponent();
        let pseudo = self.generate_pseudo_moves();
        let mut legal = MoveList::new();
        for &m in &pseudo {
            let info = self.make_move(m);
            if !self.is_in_check(us) {
                let mut annotated = m;
                if self.is_in_check(them) {
                    annotated.flags |= FLAG_GIVES_CHECK;
                }
                legal.push(annotated);
            }
            self.unmake_move(m, &info);
        }
        legal
    }

    /// The side to move is checkmated: in check with no legal moves.
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check(self.current_color()) && self.generate_moves().is_empty()
    }

    /// The side to move is stalemated: not in check, yet no legal moves.
    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check(self.current_color()) && self.generate_moves().is_empty()
    }

    /// Look up the legal move matching an origin, destination, and
    /// promotion choice, if one exists in this position.
    #[must_use]
    pub fn find_move(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        self.generate_moves()
            .iter()
            .copied()
            .find(|m| m.same_action(from, to, promotion))
    }

    /// Whether `m` describes a legal move in this position. Used to vet
    /// externally supplied moves (table hints, user input) before play.
    #[must_use]
    pub fn is_legal_move(&mut self, m: Move) -> bool {
        self.find_move(m.from, m.to, m.promotion).is_some()
    }

    /// Legal-move-tree leaf count to `depth`; the standard move generator
    /// correctness harness.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0u64;
        for &m in &moves {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, &info);
        }
        nodes
    }
}
