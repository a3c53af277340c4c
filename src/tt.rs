//! Transposition table.
//!
//! Fixed-size, power-of-two slot count, one packed 64-bit entry per slot.
//! Slots are `AtomicU64` pairs verified with the XOR trick: the key word
//! stores `hash ^ data`, so a torn or foreign entry fails verification and
//! probes simply miss. Entries carry a 6-bit generation; the table prefers
//! evicting entries from earlier searches.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::{Move, Piece, Square};

/// How the stored score bounds the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact: the search completed inside the window.
    Exact,
    /// Score is a lower bound: the search failed high (score >= beta).
    Lower,
    /// Score is an upper bound: the search failed low (score <= alpha).
    Upper,
}

impl Bound {
    fn to_bits(self) -> u64 {
        match self {
            Bound::Exact => 0,
            Bound::Lower => 1,
            Bound::Upper => 2,
        }
    }

    fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// A decoded table entry. The move hint is origin, destination, and
/// promotion choice; the prober matches it against freshly generated moves
/// rather than trusting it blindly.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub best: Option<(Square, Square, Option<Piece>)>,
    pub score: i16,
    pub depth: u8,
    pub bound: Bound,
}

impl TtEntry {
    /// Whether this entry alone answers a search of `depth` with window
    /// `(alpha, beta)`. Exact scores always do; bounds only when they fall
    /// outside the window on the right side.
    #[must_use]
    pub fn cutoff(&self, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        let score = i32::from(self.score);
        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

// Packed entry layout:
//   bits  0-15  move hint (from 6 | to 6 | promotion code 3), 0 = none
//   bits 16-31  score as i16
//   bits 32-39  depth
//   bits 40-41  bound
//   bits 42-47  generation
const GENERATION_MASK: u8 = 0x3F;

fn promo_code(promo: Option<Piece>) -> u64 {
    match promo {
        None => 0,
        Some(Piece::Knight) => 1,
        Some(Piece::Bishop) => 2,
        Some(Piece::Rook) => 3,
        _ => 4, // queen; pawn/king promotions never occur
    }
}

fn decode_promo(code: u64) -> Option<Piece> {
    match code & 0b111 {
        0 => None,
        1 => Some(Piece::Knight),
        2 => Some(Piece::Bishop),
        3 => Some(Piece::Rook),
        _ => Some(Piece::Queen),
    }
}

fn pack_move(m: Option<Move>) -> u64 {
    match m {
        None => 0,
        Some(m) => {
            (m.from.as_index() as u64)
                | ((m.to.as_index() as u64) << 6)
                | (promo_code(m.promotion) << 12)
        }
    }
}

fn pack(m: Option<Move>, score: i16, depth: u8, bound: Bound, generation: u8) -> u64 {
    pack_move(m)
        | ((score as u16 as u64) << 16)
        | ((depth as u64) << 32)
        | (bound.to_bits() << 40)
        | ((generation as u64) << 42)
}

fn unpack_generation(data: u64) -> u8 {
    ((data >> 42) as u8) & GENERATION_MASK
}

fn unpack_depth(data: u64) -> u8 {
    (data >> 32) as u8
}

fn unpack(data: u64) -> TtEntry {
    let move_bits = data & 0xFFFF;
    let best = if move_bits == 0 {
        None
    } else {
        let from = Square::from_index((move_bits & 0x3F) as usize);
        let to = Square::from_index(((move_bits >> 6) & 0x3F) as usize);
        Some((from, to, decode_promo(move_bits >> 12)))
    };
    TtEntry {
        best,
        score: (data >> 16) as u16 as i16,
        depth: unpack_depth(data),
        bound: Bound::from_bits(data >> 40),
    }
}

struct TtSlot {
    /// `hash ^ data` of the stored entry; 0/0 means empty.
    key_xor: AtomicU64,
    data: AtomicU64,
}

pub struct TranspositionTable {
    slots: Vec<TtSlot>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table using at most `size_mb` megabytes, rounded down to a
    /// power-of-two slot count (at least one slot).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let want = bytes / std::mem::size_of::<TtSlot>();
        let count = want.next_power_of_two() / if want.is_power_of_two() { 1 } else { 2 };
        let count = count.max(1);
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, || TtSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        });
        log::debug!("transposition table: {count} slots");
        TranspositionTable {
            slots,
            mask: count - 1,
            generation: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Advance the generation counter. Called once at the start of each
    /// search; entries from earlier generations become preferred evictees.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1) & GENERATION_MASK;
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        for slot in &self.slots {
            slot.key_xor.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
    }

    #[inline]
    fn slot_for(&self, hash: u64) -> &TtSlot {
        &self.slots[(hash as usize) & self.mask]
    }

    /// Look up `hash`. Returns `None` on an empty slot or key mismatch.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        let slot = self.slot_for(hash);
        let data = slot.data.load(Ordering::Relaxed);
        let key_xor = slot.key_xor.load(Ordering::Relaxed);
        if data == 0 && key_xor == 0 {
            return None;
        }
        if key_xor ^ data != hash {
            return None;
        }
        Some(unpack(data))
    }

    /// Store an entry for `hash`, evicting per the replacement policy:
    /// empty slots and same-position entries always lose, then entries from
    /// older generations, then shallower depths. A deeper entry from the
    /// current generation for a different position is kept instead.
    pub fn store(&self, hash: u64, m: Option<Move>, score: i16, depth: u8, bound: Bound) {
        let slot = self.slot_for(hash);
        let old_data = slot.data.load(Ordering::Relaxed);
        let old_key = slot.key_xor.load(Ordering::Relaxed);

        let occupied = old_data != 0 || old_key != 0;
        if occupied {
            let same_position = old_key ^ old_data == hash;
            let current_generation = unpack_generation(old_data) == self.generation;
            if !same_position && current_generation && unpack_depth(old_data) > depth {
                return;
            }
        }

        let data = pack(m, score, depth, bound, self.generation);
        slot.key_xor.store(hash ^ data, Ordering::Relaxed);
        slot.data.store(data, Ordering::Relaxed);
    }
}
