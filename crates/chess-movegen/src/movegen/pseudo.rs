//! Pseudo-legal target squares per piece.
//!
//! Targets follow piece geometry and stop at blockers. Whether the move
//! leaves the mover's own king attacked is not considered here. Castling
//! targets only check rights and empty squares between king and rook;
//! attacked squares are left to the legality filter.

use super::attacks::{king_steps, knight_jumps, pawn_captures, slider_attacks, Direction};
use crate::position::castle_homes;
use crate::{Bitboard, Position};
use chess_core::{Color, Piece, Square};

/// Pawn destinations plus whether they land on the promotion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PawnTargets {
    pub targets: Bitboard,
    pub promotion: bool,
}

/// Returns the pseudo-legal targets of the pawn on `from`.
///
/// # Panics
///
/// Panics if `from` does not hold a pawn.
pub fn pawn_targets(position: &Position, from: Square) -> PawnTargets {
    let Some((Piece::Pawn, us)) = position.piece_at(from) else {
        panic!("pawn_targets: no pawn on {from}");
    };
    let empty = position.empty_squares();
    let mut targets = Bitboard::EMPTY;

    // A blocked single step also blocks the double step.
    if let Some(single) = from.offset(us.pawn_push()) {
        if empty.contains(single) {
            targets.set(single);
            if from.rank() == us.pawn_rank() {
                if let Some(double) = single.offset(us.pawn_push()) {
                    if empty.contains(double) {
                        targets.set(double);
                    }
                }
            }
        }
    }

    let mut capturable = position.color_occupancy(us.opposite());
    if us == position.side_to_move() {
        if let Some(ep) = position.en_passant() {
            capturable.set(ep);
        }
    }
    targets |= pawn_captures(from, us) & capturable;

    PawnTargets {
        targets,
        promotion: targets.intersects(Bitboard::BACK_RANKS),
    }
}

/// Returns the knight jumps from `from` not landing on a friendly piece.
pub fn knight_targets(position: &Position, from: Square, us: Color) -> Bitboard {
    knight_jumps(from) & !position.color_occupancy(us)
}

/// Returns the king steps from `from` not landing on a friendly piece.
/// Castling is reported separately by [`castle_targets`].
pub fn king_targets(position: &Position, from: Square, us: Color) -> Bitboard {
    king_steps(from) & !position.color_occupancy(us)
}

/// Returns the sliding targets from `from` along `dirs`: empty squares up
/// to and including the first blocker, minus friendly blockers.
pub fn slider_targets(
    position: &Position,
    from: Square,
    us: Color,
    dirs: &[Direction],
) -> Bitboard {
    slider_attacks(from, dirs, position.occupied()) & !position.color_occupancy(us)
}

/// Returns the castling landing squares (c- and g-file) for a king of
/// `us` standing on `from`.
///
/// Requires the king on its home square, the matching right, and empty
/// squares strictly between king and rook.
pub fn castle_targets(position: &Position, from: Square, us: Color) -> Bitboard {
    let mut targets = Bitboard::EMPTY;
    let occupied = position.occupied();

    for kingside in [true, false] {
        let granted = if kingside {
            position.castling().can_castle_kingside(us)
        } else {
            position.castling().can_castle_queenside(us)
        };
        let (king_home, rook_home) = castle_homes(us, kingside);
        if !granted || from != king_home {
            continue;
        }
        if (between(king_home, rook_home) & occupied).is_empty() {
            // King lands two files toward the rook.
            let step = if kingside { 2 } else { -2 };
            if let Some(landing) = king_home.offset(step) {
                targets.set(landing);
            }
        }
    }

    targets
}

/// Returns the pseudo-legal targets of whatever stands on `from`,
/// excluding castling.
///
/// # Panics
///
/// Panics if `from` is empty.
pub fn targets_from(position: &Position, from: Square) -> Bitboard {
    let Some((piece, us)) = position.piece_at(from) else {
        panic!("targets_from: no piece on {from}");
    };
    match piece {
        Piece::Pawn => pawn_targets(position, from).targets,
        Piece::Knight => knight_targets(position, from, us),
        Piece::Bishop => slider_targets(position, from, us, &Direction::DIAGONAL),
        Piece::Rook => slider_targets(position, from, us, &Direction::ORTHOGONAL),
        Piece::Queen => slider_targets(position, from, us, &Direction::ALL),
        Piece::King => king_targets(position, from, us),
    }
}

/// Squares strictly between two squares on the same rank.
fn between(a: Square, b: Square) -> Bitboard {
    let (low, high) = if a.index() < b.index() { (a, b) } else { (b, a) };
    let above_low = !0u64 << (low.index() + 1);
    let below_high = (1u64 << high.index()) - 1;
    Bitboard::new(above_low & below_high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CastlingRights;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn squares(list: &[&str]) -> Bitboard {
        list.iter().fold(Bitboard::EMPTY, |bb, s| bb | Bitboard::from_square(sq(s)))
    }

    #[test]
    fn pawn_single_and_double_step() {
        let pos = Position::startpos();
        let t = pawn_targets(&pos, sq("e2"));
        assert_eq!(t.targets, squares(&["e3", "e4"]));
        assert!(!t.promotion);
    }

    #[test]
    fn blocked_single_step_blocks_double() {
        let pos = Position::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_targets(&pos, sq("e2")).targets, Bitboard::EMPTY);

        let pos = Position::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_targets(&pos, sq("e2")).targets, squares(&["e3"]));
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let pos = Position::from_fen("4k3/8/8/3p1N2/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_targets(&pos, sq("e4")).targets, squares(&["e5", "d5"]));
    }

    #[test]
    fn black_pawn_moves_down() {
        let pos = Position::from_fen("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(pawn_targets(&pos, sq("d7")).targets, squares(&["d6", "d5"]));
    }

    #[test]
    fn pawn_en_passant_target() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(pawn_targets(&pos, sq("e5")).targets, squares(&["e6", "d6"]));
    }

    #[test]
    fn promotion_flag() {
        let pos = Position::from_fen("3nk3/2P5/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let t = pawn_targets(&pos, sq("c7"));
        assert_eq!(t.targets, squares(&["c8", "d8"]));
        assert!(t.promotion);
    }

    #[test]
    fn knight_excludes_friends() {
        let pos = Position::startpos();
        assert_eq!(
            knight_targets(&pos, sq("g1"), Color::White),
            squares(&["f3", "h3"])
        );
    }

    #[test]
    fn slider_stops_at_first_blocker() {
        let pos = Position::from_fen("4k3/8/3p4/8/1P1R4/8/8/4K3 w - - 0 1").unwrap();
        let targets = slider_targets(&pos, sq("d4"), Color::White, &Direction::ORTHOGONAL);
        assert!(targets.contains(sq("d6")));
        assert!(!targets.contains(sq("d7")));
        assert!(targets.contains(sq("c4")));
        assert!(!targets.contains(sq("b4")));
        assert!(targets.contains(sq("h4")));
        assert!(targets.contains(sq("d1")));
        assert_eq!(targets.count(), 2 + 1 + 4 + 3);
    }

    #[test]
    fn castling_targets_follow_rights_and_occupancy() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            castle_targets(&pos, Square::E1, Color::White),
            squares(&["c1", "g1"])
        );

        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3KB1R w KQ - 0 1").unwrap();
        assert_eq!(castle_targets(&pos, Square::E1, Color::White), squares(&["c1"]));

        let pos = Position::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        assert_eq!(castle_targets(&pos, Square::E1, Color::White), squares(&["g1"]));

        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        pos.castling = CastlingRights::new(CastlingRights::WHITE_QUEENSIDE);
        assert_eq!(castle_targets(&pos, Square::E1, Color::White), squares(&["c1"]));
    }

    #[test]
    fn between_squares() {
        assert_eq!(between(Square::E1, Square::H1), squares(&["f1", "g1"]));
        assert_eq!(between(Square::E8, Square::A8), squares(&["b8", "c8", "d8"]));
    }

    #[test]
    #[should_panic(expected = "no piece on e4")]
    fn targets_from_empty_square_panics() {
        targets_from(&Position::startpos(), sq("e4"));
    }
}
