//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// What kind of move a [`Move`] is, beyond its origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Quiet move to an empty square.
    Normal = 0,
    /// Capture of the piece standing on the destination square.
    Capture = 1,
    /// Pawn double push from its starting rank.
    DoublePush = 2,
    /// En passant capture.
    EnPassant = 3,
    /// Kingside castling (O-O).
    CastleKingside = 4,
    /// Queenside castling (O-O-O).
    CastleQueenside = 5,
    /// Pawn promotion to knight (with or without capture).
    PromoteKnight = 6,
    /// Pawn promotion to bishop (with or without capture).
    PromoteBishop = 7,
    /// Pawn promotion to rook (with or without capture).
    PromoteRook = 8,
    /// Pawn promotion to queen (with or without capture).
    PromoteQueen = 9,
}

impl MoveFlag {
    /// Returns the promotion flag for a piece, if it is a valid promotion target.
    #[inline]
    pub const fn promotion(piece: Piece) -> Option<MoveFlag> {
        match piece {
            Piece::Knight => Some(MoveFlag::PromoteKnight),
            Piece::Bishop => Some(MoveFlag::PromoteBishop),
            Piece::Rook => Some(MoveFlag::PromoteRook),
            Piece::Queen => Some(MoveFlag::PromoteQueen),
            Piece::Pawn | Piece::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::PromoteKnight => Some(Piece::Knight),
            MoveFlag::PromoteBishop => Some(Piece::Bishop),
            MoveFlag::PromoteRook => Some(Piece::Rook),
            MoveFlag::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A move: which piece goes from where to where, and how.
///
/// Moves are produced fresh by the generator for one ply; the piece is
/// the piece standing on `from` before the move (a pawn, for promotions).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    from: Square,
    to: Square,
    flag: MoveFlag,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(piece: Piece, from: Square, to: Square, flag: MoveFlag) -> Self {
        Move {
            piece,
            from,
            to,
            flag,
        }
    }

    /// Creates a quiet move with no special flag.
    #[inline]
    pub const fn normal(piece: Piece, from: Square, to: Square) -> Self {
        Self::new(piece, from, to, MoveFlag::Normal)
    }

    /// The piece being moved.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    /// Returns coordinate notation: origin then destination, plus a
    /// lowercase promotion letter (e.g., "e2e4", "e7e8q").
    pub fn to_algebraic(self) -> String {
        match self.flag.promotion_piece() {
            Some(promo) => format!("{}{}{}", self.from, self.to, promo.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses coordinate notation into `(from, to, promotion)`.
    ///
    /// The moving piece and the full flag depend on the position, so callers
    /// resolve the result against generated moves.
    pub fn from_algebraic(s: &str) -> Option<(Square, Square, Option<Piece>)> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s.chars().nth(4) {
            None => None,
            Some(c) => match c.to_ascii_lowercase() {
                'n' => Some(Piece::Knight),
                'b' => Some(Piece::Bishop),
                'r' => Some(Piece::Rook),
                'q' => Some(Piece::Queen),
                _ => return None,
            },
        };
        Some((from, to, promotion))
    }

    /// Returns true if this move's coordinates match a parsed
    /// [`Move::from_algebraic`] triple.
    pub fn matches(self, from: Square, to: Square, promotion: Option<Piece>) -> bool {
        self.from == from && self.to == to && self.flag.promotion_piece() == promotion
    }

    /// A placeholder that is never generated as a move.
    pub const NULL: Move = Move::normal(Piece::Pawn, Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {}, {:?})", self.piece, self.to_algebraic(), self.flag)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_accessors() {
        let m = Move::new(Piece::Pawn, sq("e2"), sq("e4"), MoveFlag::DoublePush);
        assert_eq!(m.piece(), Piece::Pawn);
        assert_eq!(m.from(), Square::new(File::E, Rank::R2));
        assert_eq!(m.to(), Square::new(File::E, Rank::R4));
        assert_eq!(m.flag(), MoveFlag::DoublePush);
    }

    #[test]
    fn move_to_algebraic() {
        assert_eq!(Move::normal(Piece::Pawn, sq("e2"), sq("e4")).to_algebraic(), "e2e4");
        assert_eq!(
            Move::new(Piece::King, sq("e1"), sq("g1"), MoveFlag::CastleKingside).to_algebraic(),
            "e1g1"
        );
        for (flag, text) in [
            (MoveFlag::PromoteKnight, "e7e8n"),
            (MoveFlag::PromoteBishop, "e7e8b"),
            (MoveFlag::PromoteRook, "e7e8r"),
            (MoveFlag::PromoteQueen, "e7e8q"),
        ] {
            assert_eq!(Move::new(Piece::Pawn, sq("e7"), sq("e8"), flag).to_algebraic(), text);
        }
    }

    #[test]
    fn move_from_algebraic() {
        assert_eq!(Move::from_algebraic("e2e4"), Some((sq("e2"), sq("e4"), None)));
        assert_eq!(
            Move::from_algebraic("a2a1N"),
            Some((sq("a2"), sq("a1"), Some(Piece::Knight)))
        );
        assert!(Move::from_algebraic("e7e8k").is_none());
        assert!(Move::from_algebraic("e2e9").is_none());
        assert!(Move::from_algebraic("e2").is_none());
        assert!(Move::from_algebraic("e2e4qq").is_none());
    }

    #[test]
    fn matches_parsed_coordinates() {
        let promo = Move::new(Piece::Pawn, sq("b7"), sq("a8"), MoveFlag::PromoteRook);
        let (from, to, piece) = Move::from_algebraic("b7a8r").unwrap();
        assert!(promo.matches(from, to, piece));
        assert!(!promo.matches(from, to, Some(Piece::Queen)));
    }

    #[test]
    fn flag_classification() {
        assert_eq!(MoveFlag::promotion(Piece::Queen), Some(MoveFlag::PromoteQueen));
        assert_eq!(MoveFlag::promotion(Piece::King), None);
        assert!(MoveFlag::PromoteBishop.is_promotion());
        assert!(!MoveFlag::Capture.is_promotion());
        assert!(MoveFlag::CastleQueenside.is_castling());
        assert!(!MoveFlag::EnPassant.is_castling());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::normal(Piece::Knight, sq("g1"), sq("f3"));
        assert_eq!(format!("{}", m), "g1f3");
        assert_eq!(format!("{:?}", m), "Move(Knight g1f3, Normal)");
    }
}
