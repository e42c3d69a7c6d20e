//! Precomputed attack masks: per-direction rays, knight jumps, king steps
//! and pawn capture squares.
//!
//! The tables are built once, on first use, and never change afterwards.
//! Sliding attacks are derived from the per-direction rays at lookup time by
//! cutting each ray at its first blocker.

use crate::Bitboard;
use chess_core::{Color, Square};
use std::sync::OnceLock;

/// One of the eight compass directions a queen can slide in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    /// Rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Queen directions.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Square-index delta of one step in this direction.
    #[inline]
    pub const fn offset(self) -> i8 {
        match self {
            Direction::North => 8,
            Direction::South => -8,
            Direction::East => 1,
            Direction::West => -1,
            Direction::NorthEast => 9,
            Direction::NorthWest => 7,
            Direction::SouthEast => -7,
            Direction::SouthWest => -9,
        }
    }

    /// Returns true for the four diagonal directions.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::NorthWest | Direction::SouthEast | Direction::SouthWest
        )
    }

    /// Returns true if stepping this way increases the square index, so the
    /// nearest square on a ray is its lowest set bit.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.offset() > 0
    }
}

const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];
const KING_OFFSETS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// All precomputed masks, indexed by square.
pub struct AttackTables {
    rays: [[Bitboard; 8]; 64],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn_captures: [[Bitboard; 64]; 2],
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

impl AttackTables {
    /// Returns the process-wide tables, building them on first call.
    #[inline]
    pub fn get() -> &'static AttackTables {
        ATTACK_TABLES.get_or_init(AttackTables::new)
    }

    /// Builds every table by walking direction offsets from each square.
    pub fn new() -> Self {
        let mut tables = AttackTables {
            rays: [[Bitboard::EMPTY; 8]; 64],
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            pawn_captures: [[Bitboard::EMPTY; 64]; 2],
        };

        for index in 0..64u8 {
            let sq = Square::at(index);
            let i = index as usize;

            for dir in Direction::ALL {
                let mut ray = Bitboard::EMPTY;
                let mut current = sq;
                while let Some(next) = step(current, dir.offset(), 1) {
                    ray.set(next);
                    current = next;
                }
                tables.rays[i][dir.index()] = ray;
            }

            tables.knight[i] = jumps(sq, &KNIGHT_OFFSETS, 2);
            tables.king[i] = jumps(sq, &KING_OFFSETS, 1);

            tables.pawn_captures[Color::White.index()][i] = jumps(sq, &[7, 9], 1);
            tables.pawn_captures[Color::Black.index()][i] = jumps(sq, &[-7, -9], 1);
        }

        tables
    }

    /// Squares reachable from `sq` moving in `dir` on an empty board.
    #[inline]
    pub fn ray(&self, sq: Square, dir: Direction) -> Bitboard {
        self.rays[sq.index() as usize][dir.index()]
    }

    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index() as usize]
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index() as usize]
    }

    /// Squares a pawn of `color` on `sq` attacks.
    #[inline]
    pub fn pawn_captures(&self, sq: Square, color: Color) -> Bitboard {
        self.pawn_captures[color.index()][sq.index() as usize]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Takes one step of `offset` from `from`. Rejects the step if it leaves
/// the board or if the rank or file moved by more than `max_delta`, which
/// is how a wrap from the h-file to the a-file shows up.
fn step(from: Square, offset: i8, max_delta: i8) -> Option<Square> {
    let to = from.offset(offset)?;
    let rank_delta = (to.rank().index() as i8 - from.rank().index() as i8).abs();
    let file_delta = (to.file().index() as i8 - from.file().index() as i8).abs();
    if rank_delta <= max_delta && file_delta <= max_delta {
        Some(to)
    } else {
        None
    }
}

fn jumps(from: Square, offsets: &[i8], max_delta: i8) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&offset| step(from, offset, max_delta))
        .fold(Bitboard::EMPTY, |bb, sq| bb | Bitboard::from_square(sq))
}

/// Returns the ray from `sq` in `dir` on an empty board.
#[inline]
pub fn rays_for(sq: Square, dir: Direction) -> Bitboard {
    AttackTables::get().ray(sq, dir)
}

/// Returns the knight jump targets from `sq`.
#[inline]
pub fn knight_jumps(sq: Square) -> Bitboard {
    AttackTables::get().knight(sq)
}

/// Returns the king step targets from `sq`.
#[inline]
pub fn king_steps(sq: Square) -> Bitboard {
    AttackTables::get().king(sq)
}

/// Returns the squares a pawn of `color` standing on `sq` attacks.
#[inline]
pub fn pawn_captures(sq: Square, color: Color) -> Bitboard {
    AttackTables::get().pawn_captures(sq, color)
}

/// Returns the part of the `dir` ray from `sq` up to and including the
/// first occupied square.
#[inline]
pub fn ray_until_blocked(sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
    let tables = AttackTables::get();
    let ray = tables.ray(sq, dir);
    let blockers = ray & occupied;
    let first = if dir.is_positive() {
        blockers.lsb()
    } else {
        blockers.msb()
    };
    match first {
        Some(blocker) => ray ^ tables.ray(blocker, dir),
        None => ray,
    }
}

/// Returns the first occupied square along the `dir` ray from `sq`.
#[inline]
pub fn first_blocker(sq: Square, dir: Direction, occupied: Bitboard) -> Option<Square> {
    let blockers = rays_for(sq, dir) & occupied;
    if dir.is_positive() {
        blockers.lsb()
    } else {
        blockers.msb()
    }
}

/// Union of [`ray_until_blocked`] over several directions.
#[inline]
pub fn slider_attacks(sq: Square, dirs: &[Direction], occupied: Bitboard) -> Bitboard {
    dirs.iter().fold(Bitboard::EMPTY, |bb, &dir| {
        bb | ray_until_blocked(sq, dir, occupied)
    })
}

/// Union of every ray, knight jump and king step from `sq`: every square
/// from which a piece could possibly attack `sq`.
#[inline]
pub fn attack_lines(sq: Square) -> Bitboard {
    let tables = AttackTables::get();
    Direction::ALL
        .iter()
        .fold(tables.knight(sq) | tables.king(sq), |bb, &dir| {
            bb | tables.ray(sq, dir)
        })
}
