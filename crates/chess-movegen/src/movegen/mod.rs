//! Move generation.
//!
//! Pseudo-legal candidates come from the per-piece target functions in
//! [`pseudo`]. The legality filter then plays each candidate that could
//! matter for the mover's king, tests for check and takes it back.

pub mod attacks;
pub mod check;
pub mod make;
pub mod perft;
pub mod pseudo;

use crate::Position;
use attacks::Direction;
use check::{is_square_attacked, move_affects_king};
use chess_core::{Color, File, Move, MoveFlag, Piece, Square};
use pseudo::{castle_targets, king_targets, knight_targets, pawn_targets, slider_targets};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }

    /// Returns the move whose coordinates match `text` ("e2e4", "e7e8q").
    pub fn find_algebraic(&self, text: &str) -> Option<Move> {
        let (from, to, promotion) = Move::from_algebraic(text)?;
        self.as_slice()
            .iter()
            .copied()
            .find(|m| m.matches(from, to, promotion))
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

const PROMOTION_FLAGS: [MoveFlag; 4] = [
    MoveFlag::PromoteQueen,
    MoveFlag::PromoteRook,
    MoveFlag::PromoteBishop,
    MoveFlag::PromoteKnight,
];

/// Appends every pseudo-legal move of the side to move.
pub fn pseudo_legal_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();

    for from in position.color_occupancy(us) {
        let Some((piece, _)) = position.piece_at(from) else {
            continue;
        };
        match piece {
            Piece::Pawn => push_pawn_moves(position, from, moves),
            Piece::Knight => {
                push_moves(position, piece, from, knight_targets(position, from, us), moves)
            }
            Piece::Bishop => push_moves(
                position,
                piece,
                from,
                slider_targets(position, from, us, &Direction::DIAGONAL),
                moves,
            ),
            Piece::Rook => push_moves(
                position,
                piece,
                from,
                slider_targets(position, from, us, &Direction::ORTHOGONAL),
                moves,
            ),
            Piece::Queen => push_moves(
                position,
                piece,
                from,
                slider_targets(position, from, us, &Direction::ALL),
                moves,
            ),
            Piece::King => {
                push_moves(position, piece, from, king_targets(position, from, us), moves);
                for to in castle_targets(position, from, us) {
                    let flag = if to.file() == File::G {
                        MoveFlag::CastleKingside
                    } else {
                        MoveFlag::CastleQueenside
                    };
                    moves.push(Move::new(Piece::King, from, to, flag));
                }
            }
        }
    }
}

fn push_moves(
    position: &Position,
    piece: Piece,
    from: Square,
    targets: crate::Bitboard,
    moves: &mut MoveList,
) {
    for to in targets {
        let flag = if position.piece_at(to).is_some() {
            MoveFlag::Capture
        } else {
            MoveFlag::Normal
        };
        moves.push(Move::new(piece, from, to, flag));
    }
}

fn push_pawn_moves(position: &Position, from: Square, moves: &mut MoveList) {
    let generated = pawn_targets(position, from);
    for to in generated.targets {
        if generated.promotion {
            for flag in PROMOTION_FLAGS {
                moves.push(Move::new(Piece::Pawn, from, to, flag));
            }
            continue;
        }
        let flag = if position.en_passant() == Some(to) {
            MoveFlag::EnPassant
        } else if to.index().abs_diff(from.index()) == 16 {
            MoveFlag::DoublePush
        } else if position.piece_at(to).is_some() {
            MoveFlag::Capture
        } else {
            MoveFlag::Normal
        };
        moves.push(Move::new(Piece::Pawn, from, to, flag));
    }
}

/// Returns true if the pseudo-legal `mv` does not leave the mover's king
/// attacked. `in_check` is the mover's check status before the move.
fn is_legal(position: &mut Position, mv: Move, us: Color, in_check: bool) -> bool {
    if mv.flag().is_castling() {
        if in_check {
            return false;
        }
        // The king crosses the square next to it on the way to c/g.
        let step = if mv.flag() == MoveFlag::CastleKingside { 1 } else { -1 };
        let crossed = mv.from().offset(step);
        if crossed.is_some_and(|sq| is_square_attacked(position, sq, us.opposite())) {
            return false;
        }
    } else if !in_check && !move_affects_king(position, mv, us) {
        return true;
    }

    let history = position.make_move(mv);
    let safe = !position.is_king_in_check(us);
    position.unmake_move(mv, history);
    safe
}

/// Generates all legal moves for the side to move.
///
/// The position is used as scratch space and is unchanged on return.
pub fn legal_moves(position: &mut Position) -> MoveList {
    let us = position.side_to_move();
    let in_check = position.is_king_in_check(us);

    let mut moves = MoveList::new();
    pseudo_legal_moves(position, &mut moves);
    moves.retain(|&m| is_legal(position, m, us, in_check));
    moves
}

impl Position {
    /// Generates all legal moves for the side to move.
    pub fn legal_moves(&mut self) -> MoveList {
        legal_moves(self)
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_checkmate(&mut self) -> bool {
        self.is_king_in_check(self.side_to_move()) && legal_moves(self).is_empty()
    }

    /// Returns true if the side to move has no legal move and is not in check.
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_king_in_check(self.side_to_move()) && legal_moves(self).is_empty()
    }
}
