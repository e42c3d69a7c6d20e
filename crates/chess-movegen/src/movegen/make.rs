//! Applying and reverting moves in place.

use super::check::move_affects_king;
use crate::Position;
use chess_core::{Color, Move, Piece, Square};

/// Everything needed to revert one [`Position::make_move`] call.
///
/// Only obtainable from `make_move` and consumed by `unmake_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    mv: Move,
    snapshot: Position,
}

impl MoveHistory {
    /// The move this record was produced for.
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// Rook relocation for a king move matching a castle pattern.
fn castle_rook(color: Color, from: Square, to: Square) -> Option<(Square, Square)> {
    match (color, from, to) {
        (Color::White, Square::E1, Square::G1) => Some((Square::H1, Square::F1)),
        (Color::White, Square::E1, Square::C1) => Some((Square::A1, Square::D1)),
        (Color::Black, Square::E8, Square::G8) => Some((Square::H8, Square::F8)),
        (Color::Black, Square::E8, Square::C8) => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Position {
    /// Applies a pseudo-legal move for the side to move and returns the
    /// record that reverts it.
    ///
    /// # Panics
    ///
    /// Panics if the origin square does not hold a piece of the side to move.
    pub fn make_move(&mut self, mv: Move) -> MoveHistory {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();

        let history = MoveHistory {
            mv,
            snapshot: self.clone(),
        };
        let safety_before = [self.king_safety[0].get(), self.king_safety[1].get()];

        let piece = match self.piece_at(from) {
            Some((piece, color)) if color == us => piece,
            other => panic!("make_move: {mv:?} starts on {from} holding {other:?}"),
        };
        debug_assert_eq!(piece, mv.piece(), "move piece disagrees with board");

        let captured = self.piece_at(to);
        let placed = mv.flag().promotion_piece().unwrap_or(piece);
        self.set_piece_at(from, None);
        self.set_piece_at(to, Some((placed, us)));

        let mut en_passant = None;
        let mut captured_pawn = false;
        match piece {
            Piece::King => {
                self.castling.remove_color(us);
                if let Some((rook_from, rook_to)) = castle_rook(us, from, to) {
                    let rook = self.piece_at(rook_from);
                    self.set_piece_at(rook_from, None);
                    self.set_piece_at(rook_to, rook);
                }
            }
            Piece::Pawn => {
                if self.en_passant == Some(to) {
                    if let Some(victim) = to.offset(-us.pawn_push()) {
                        self.set_piece_at(victim, None);
                        captured_pawn = true;
                    }
                }
                if to.index().abs_diff(from.index()) == 16 {
                    en_passant = from.offset(us.pawn_push());
                }
            }
            Piece::Rook => self.castling.remove_corner(from),
            Piece::Knight | Piece::Bishop | Piece::Queen => {}
        }
        if captured.is_some() {
            self.castling.remove_corner(to);
        }
        self.en_passant = en_passant;

        if piece == Piece::Pawn || captured.is_some() || captured_pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        // Placement reset both caches; keep the ones this move cannot touch.
        for color in Color::ALL {
            if !move_affects_king(&history.snapshot, mv, color) {
                self.king_safety[color.index()].set(safety_before[color.index()]);
            }
        }

        self.side_to_move = them;
        history
    }

    /// Reverts the move recorded in `history`, restoring every field.
    ///
    /// # Panics
    ///
    /// Panics if `history` was produced for a different move.
    pub fn unmake_move(&mut self, mv: Move, history: MoveHistory) {
        assert_eq!(
            history.mv, mv,
            "unmake_move: history belongs to a different move"
        );
        *self = history.snapshot;
    }
}
