//! Precomputed attack tables for move generation.
//!
//! Leaper pieces (knight, king, pawn) use flat per-square tables. Sliding
//! pieces (bishop, rook, queen as their union) use magic bitboards: for each
//! square a relevant-occupancy mask, a multiplicative hash factor, and a
//! table of size 2^popcount(mask). The factors are found deterministically
//! at construction time from a fixed-seed RNG and verified exhaustively over
//! every occupancy subset; a square whose factor cannot be verified aborts
//! construction. All tables are immutable after the first access.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates

use once_cell::sync::Lazy;
use rand::prelude::*;

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let deltas = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    leaper_table(&deltas)
});

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let deltas = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    leaper_table(&deltas)
});

/// `PAWN_ATTACKS[color][square]`: squares a pawn of that color attacks.
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    let white = leaper_table(&[(1, -1), (1, 1)]);
    let black = leaper_table(&[(-1, -1), (-1, 1)]);
    [white, black]
});

fn leaper_table(deltas: &[(isize, isize)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            }
        }
        *slot = mask;
    }
    attacks
}

const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Ray-walk slider attacks; the construction-time reference the magic
/// tables are filled from and verified against.
fn slider_attacks_slow(sq: usize, occupancy: u64, bishop: bool) -> u64 {
    let dirs = if bishop { &BISHOP_DIRS } else { &ROOK_DIRS };
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut nr = r + dr;
        let mut nf = f + df;
        while (0..8).contains(&nr) && (0..8).contains(&nf) {
            let bit = 1u64 << ((nr as usize) * 8 + (nf as usize));
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            nr += dr;
            nf += df;
        }
    }
    attacks
}

/// Squares whose occupancy can change this slider's attack set from `sq`.
/// Board-edge squares are excluded: a blocker on the edge never shortens
/// the ray further.
fn relevant_mask(sq: usize, bishop: bool) -> u64 {
    let dirs = if bishop { &BISHOP_DIRS } else { &ROOK_DIRS };
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let mut nr = r + dr;
        let mut nf = f + df;
        while (0..8).contains(&(nr + dr)) && (0..8).contains(&(nf + df)) {
            mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            nr += dr;
            nf += df;
        }
    }
    mask
}

/// Spread the low bits of `index` over the set bits of `mask`, enumerating
/// one occupancy subset per index value.
fn occupancy_subset(mut index: usize, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut m = mask;
    while m != 0 {
        let sq = m.trailing_zeros() as usize;
        m &= m - 1;
        if index & 1 != 0 {
            result |= 1u64 << sq;
        }
        index >>= 1;
    }
    result
}

struct SquareMagic {
    mask: u64,
    factor: u64,
    shift: u32,
    table: Vec<u64>,
}

impl SquareMagic {
    #[inline]
    fn lookup(&self, occupancy: u64) -> u64 {
        let idx = ((occupancy & self.mask).wrapping_mul(self.factor) >> self.shift) as usize;
        self.table[idx]
    }
}

const MAGIC_ATTEMPTS: usize = 100_000_000;

/// Search for a collision-free multiplicative factor for one square.
///
/// Candidates are sparse random numbers; each is verified over every subset
/// of the relevant mask. Two subsets may share a table slot only when they
/// produce the same attack set. An attack set is never empty on an 8x8
/// board, so zero serves as the unfilled-slot sentinel.
fn find_magic(sq: usize, bishop: bool, rng: &mut StdRng) -> SquareMagic {
    let mask = relevant_mask(sq, bishop);
    let bits = mask.count_ones();
    let size = 1usize << bits;
    let shift = 64 - bits;

    let mut occupancies = vec![0u64; size];
    let mut references = vec![0u64; size];
    for index in 0..size {
        occupancies[index] = occupancy_subset(index, mask);
        references[index] = slider_attacks_slow(sq, occupancies[index], bishop);
    }

    let mut table = vec![0u64; size];
    'candidates: for _ in 0..MAGIC_ATTEMPTS {
        let factor = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        // Cheap rejection: a usable factor must scatter the mask's high bits.
        if (mask.wrapping_mul(factor) >> 56).count_ones() < 6 {
            continue;
        }

        table.iter_mut().for_each(|slot| *slot = 0);
        for index in 0..size {
            let slot = (occupancies[index].wrapping_mul(factor) >> shift) as usize;
            if table[slot] == 0 {
                table[slot] = references[index];
            } else if table[slot] != references[index] {
                continue 'candidates;
            }
        }

        return SquareMagic {
            mask,
            factor,
            shift,
            table,
        };
    }

    panic!(
        "no collision-free magic factor for {} on square {sq}",
        if bishop { "bishop" } else { "rook" }
    );
}

fn build_magics(bishop: bool) -> Vec<SquareMagic> {
    // Fixed seed: the same factors are found on every run.
    let mut rng = StdRng::seed_from_u64(if bishop { 0xB15B0B } else { 0x500C } );
    let magics: Vec<SquareMagic> = (0..64).map(|sq| find_magic(sq, bishop, &mut rng)).collect();
    let entries: usize = magics.iter().map(|m| m.table.len()).sum();
    log::trace!(
        "{} magic tables built: {entries} entries",
        if bishop { "bishop" } else { "rook" }
    );
    magics
}

static ROOK_MAGICS: Lazy<Vec<SquareMagic>> = Lazy::new(|| build_magics(false));
static BISHOP_MAGICS: Lazy<Vec<SquareMagic>> = Lazy::new(|| build_magics(true));

#[inline]
pub(crate) fn rook_attacks(sq: usize, occupancy: u64) -> u64 {
    ROOK_MAGICS[sq].lookup(occupancy)
}

#[inline]
pub(crate) fn bishop_attacks(sq: usize, occupancy: u64) -> u64 {
    BISHOP_MAGICS[sq].lookup(occupancy)
}

#[inline]
pub(crate) fn queen_attacks(sq: usize, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

/// Force construction (and verification) of every table. Search triggers
/// this lazily on first move generation; callers that want the cost paid
/// up front call this once at startup.
pub fn init_tables() {
    Lazy::force(&KNIGHT_ATTACKS);
    Lazy::force(&KING_ATTACKS);
    Lazy::force(&PAWN_ATTACKS);
    Lazy::force(&ROOK_MAGICS);
    Lazy::force(&BISHOP_MAGICS);
}
