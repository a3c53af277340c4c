use super::{
    Bitboard, Color, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

/// Piece values in centipawns, indexed by [`Piece::index`]. The king carries
/// no material value; it is never captured.
pub(crate) const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Minimal delta returned by [`Board::make_move`]; everything the move
/// overwrote that cannot be re-derived from the move itself.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_castling_rights: u8,
    pub(crate) previous_hash: u64,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
    pub(crate) previous_material: i32,
}

/// Delta for a null move: only side to move, hash, and en passant change.
pub struct NullMoveInfo {
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_hash: u64,
}

/// Full snapshot pushed by [`Board::play_move`]; restored verbatim by
/// [`Board::take_back`] with no recomputation.
#[derive(Clone, Debug)]
pub(crate) struct HistoryEntry {
    pieces: [[Bitboard; 6]; 2],
    occupied: [Bitboard; 2],
    all_occupied: Bitboard,
    white_to_move: bool,
    en_passant_target: Option<Square>,
    castling_rights: u8,
    hash: u64,
    halfmove_clock: u32,
    fullmove_number: u32,
    material: i32,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) white_to_move: bool,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: u8, // bitmask
    pub(crate) hash: u64,           // Zobrist hash, maintained incrementally
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Signed material balance in centipawns; positive favors White.
    pub(crate) material: i32,
    /// Stack of full snapshots for moves applied with `play_move`.
    pub(crate) history: Vec<HistoryEntry>,
}

impl Board {
    /// The standard initial position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (i, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square(0, i), Color::White, *piece);
            board.set_piece(Square(7, i), Color::Black, *piece);
            board.set_piece(Square(1, i), Color::White, Piece::Pawn);
            board.set_piece(Square(6, i), Color::Black, Piece::Pawn);
        }

        board.castling_rights = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;
        board.white_to_move = true;
        board.fullmove_number = 1;
        board.update_occupancy();
        board.hash = board.recompute_hash();
        board.material = board.recompute_material();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard(0); 6]; 2],
            occupied: [Bitboard(0); 2],
            all_occupied: Bitboard(0),
            white_to_move: true,
            en_passant_target: None,
            castling_rights: 0,
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            material: 0,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn castling_rights(&self) -> u8 {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Material balance in centipawns, positive favors White.
    #[must_use]
    pub fn material(&self) -> i32 {
        self.material
    }

    /// Fifty-move-rule draw.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Rebuild the derived occupancy masks by OR-reducing the twelve piece
    /// masks. Done unconditionally after every mutation; keeping occupancy
    /// incremental invites desync bugs for no measurable win.
    pub(crate) fn update_occupancy(&mut self) {
        for c_idx in 0..2 {
            let mut occ = 0u64;
            for p_idx in 0..6 {
                occ |= self.pieces[c_idx][p_idx].0;
            }
            self.occupied[c_idx] = Bitboard(occ);
        }
        self.all_occupied = Bitboard(self.occupied[0].0 | self.occupied[1].0);
    }

    /// Material recount from scratch; the incremental balance must always
    /// equal this.
    pub(crate) fn recompute_material(&self) -> i32 {
        let mut material = 0i32;
        for (c_idx, sign) in [(0usize, 1i32), (1, -1)] {
            for p_idx in 0..6 {
                let count = self.pieces[c_idx][p_idx].0.count_ones() as i32;
                material += sign * count * PIECE_VALUES[p_idx];
            }
        }
        material
    }

    pub(crate) fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            pieces: self.pieces,
            occupied: self.occupied,
            all_occupied: self.all_occupied,
            white_to_move: self.white_to_move,
            en_passant_target: self.en_passant_target,
            castling_rights: self.castling_rights,
            hash: self.hash,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            material: self.material,
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.pieces = entry.pieces;
        self.occupied = entry.occupied;
        self.all_occupied = entry.all_occupied;
        self.white_to_move = entry.white_to_move;
        self.en_passant_target = entry.en_passant_target;
        self.castling_rights = entry.castling_rights;
        self.hash = entry.hash;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_number = entry.fullmove_number;
        self.material = entry.material;
    }

    /// Apply a move as a played game move: a full snapshot is pushed so the
    /// move can be taken back later by an explicit [`Board::take_back`].
    /// Unlike [`Board::make_move`] the caller holds no undo token.
    pub fn play_move(&mut self, m: super::Move) {
        self.history.push(self.snapshot());
        let _ = self.make_move(m);
    }

    /// Take back the most recently played game move.
    ///
    /// # Panics
    /// Panics if no move has been played; popping past the bottom of the
    /// history is a programming error, never silently ignored.
    pub fn take_back(&mut self) {
        let entry = self
            .history
            .pop()
            .expect("take_back without a matching play_move");
        self.restore(entry);
    }

    /// Number of played (not yet taken back) game moves.
    #[must_use]
    pub fn played_moves(&self) -> usize {
        self.history.len()
    }

    /// Debug-build consistency check: piece masks must be pairwise disjoint
    /// and OR-reduce to the occupancy masks, and the incremental hash and
    /// material must match recomputation.
    #[cfg(debug_assertions)]
    pub(crate) fn assert_consistent(&self) {
        let mut seen = 0u64;
        for c_idx in 0..2 {
            let mut occ = 0u64;
            for p_idx in 0..6 {
                let mask = self.pieces[c_idx][p_idx].0;
                assert_eq!(seen & mask, 0, "square set in two piece masks");
                seen |= mask;
                occ |= mask;
            }
            assert_eq!(occ, self.occupied[c_idx].0, "occupancy desync");
        }
        assert_eq!(seen, self.all_occupied.0, "all-occupancy desync");
        assert_eq!(self.hash, self.recompute_hash(), "hash desync");
        assert_eq!(self.material, self.recompute_material(), "material desync");
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
