//! Check detection.
//!
//! Attacks are evaluated backward from the target square: each attacker
//! pattern is projected from the target and intersected with the matching
//! enemy pieces.

use super::attacks::{
    attack_lines, first_blocker, king_steps, knight_jumps, pawn_captures, Direction,
};
use crate::position::KingSafety;
use crate::Position;
use chess_core::{Color, Move, MoveFlag, Piece, Square};

/// Returns true if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacks `sq` exactly when a pawn of the other color
    // on `sq` would attack it.
    if pawn_captures(sq, by.opposite()).intersects(position.pieces_of(Piece::Pawn, by)) {
        return true;
    }

    if knight_jumps(sq).intersects(position.pieces_of(Piece::Knight, by)) {
        return true;
    }

    let occupied = position.occupied();
    for dir in Direction::ALL {
        let Some(blocker) = first_blocker(sq, dir, occupied) else {
            continue;
        };
        let Some((piece, color)) = position.piece_at(blocker) else {
            continue;
        };
        if color != by {
            continue;
        }
        let slides = if dir.is_diagonal() {
            piece.slides_diagonally()
        } else {
            piece.slides_orthogonally()
        };
        if slides {
            return true;
        }
    }

    king_steps(sq).intersects(position.pieces_of(Piece::King, by))
}

impl Position {
    /// Returns true if `color`'s king is attacked. A side without a king is
    /// never in check.
    ///
    /// The answer is memoized in the position until a placement or a move
    /// that may affect this king resets it.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        let cache = &self.king_safety[color.index()];
        match cache.get() {
            KingSafety::Safe => return false,
            KingSafety::InCheck => return true,
            KingSafety::NotCalculated => {}
        }

        let Some(king) = self.king_square(color) else {
            return false;
        };
        let attacked = is_square_attacked(self, king, color.opposite());
        cache.set(if attacked {
            KingSafety::InCheck
        } else {
            KingSafety::Safe
        });
        attacked
    }
}

/// Returns true if `mv` might change whether `color`'s king is attacked.
///
/// Over-approximates. Moves of that king, castles and en passant
/// captures always count. Any other move counts when its origin or
/// destination lies on a queen ray, knight jump or king step from the
/// king. A move for which this returns false leaves the king's attack
/// status unchanged.
pub fn move_affects_king(position: &Position, mv: Move, color: Color) -> bool {
    let Some(king) = position.king_square(color) else {
        return false;
    };
    if mv.piece() == Piece::King && mv.from() == king {
        return true;
    }
    if mv.flag().is_castling() || mv.flag() == MoveFlag::EnPassant {
        return true;
    }
    let lines = attack_lines(king);
    lines.contains(mv.from()) || lines.contains(mv.to())
}
