//! Chess position representation.
//!
//! A [`Position`] keeps the board twice: a square-indexed array for point
//! lookups and a set of bitboards for mask tests. Both are written only by
//! [`Position::set_piece_at`], so they cannot drift apart.

use std::cell::Cell;

use chess_core::{Color, ColoredPiece, FenParser, Piece, Rank, Square};

use crate::{Bitboard, PositionError};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses a validated FEN castling field ("KQkq", "Kq", "-").
    pub fn from_fen_field(field: &str) -> Self {
        let flags = field.chars().fold(0u8, |flags, c| {
            flags
                | match c {
                    'K' => Self::WHITE_KINGSIDE,
                    'Q' => Self::WHITE_QUEENSIDE,
                    'k' => Self::BLACK_KINGSIDE,
                    'q' => Self::BLACK_QUEENSIDE,
                    _ => 0,
                }
        });
        CastlingRights::new(flags)
    }

    /// Renders the rights as a FEN castling field.
    pub fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut field = String::with_capacity(4);
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                field.push(c);
            }
        }
        field
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let mask = match color {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        };
        self.0 &= mask;
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Removes the single right tied to a rook corner (a1, h1, a8, h8).
    /// Any other square is ignored.
    #[inline]
    pub fn remove_corner(&mut self, sq: Square) {
        match sq {
            Square::A1 => self.remove_queenside(Color::White),
            Square::H1 => self.remove_kingside(Color::White),
            Square::A8 => self.remove_queenside(Color::Black),
            Square::H8 => self.remove_kingside(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Cached answer to "is this king attacked?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KingSafety {
    /// Must be recomputed before use.
    #[default]
    NotCalculated,
    Safe,
    InCheck,
}

/// Every field needed to build a [`Position`], already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionParts {
    pub board: [Option<ColoredPiece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    /// King location per color, indexed by [`Color::index`].
    pub kings: [Option<Square>; 2],
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece on each square, indexed by square index.
    pub(crate) board: [Option<ColoredPiece>; 64],

    /// Bitboards for each piece type, indexed by Piece enum.
    pub(crate) pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub(crate) colors: [Bitboard; 2],

    /// Union of both color bitboards.
    pub(crate) occupied: Bitboard,

    /// The side to move.
    pub(crate) side_to_move: Color,

    /// Castling rights.
    pub(crate) castling: CastlingRights,

    /// En passant target square (if any).
    pub(crate) en_passant: Option<Square>,

    /// King square per color.
    pub(crate) kings: [Option<Square>; 2],

    /// Memoized check status per color.
    pub(crate) king_safety: [Cell<KingSafety>; 2],

    /// Halfmove clock for 50-move rule.
    pub(crate) halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub(crate) fullmove_number: u32,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            board: [None; 64],
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            kings: [None; 2],
            king_safety: Default::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back.into_iter().enumerate() {
            let file = file as i8;
            for (color, piece_rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let Some(sq) = Square::from_coords(piece_rank, file) {
                    position.set_piece_at(sq, Some((piece, color)));
                }
                if let Some(sq) = Square::from_coords(pawn_rank, file) {
                    position.set_piece_at(sq, Some((Piece::Pawn, color)));
                }
            }
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Builds a position from parsed fields, rejecting anything that would
    /// break the board invariants.
    pub fn new(parts: PositionParts) -> Result<Self, PositionError> {
        let mut position = Position::empty();

        for (index, piece) in parts.board.iter().enumerate() {
            let Some((piece, color)) = *piece else {
                continue;
            };
            let sq = Square::at(index as u8);
            if piece == Piece::Pawn && matches!(sq.rank(), Rank::R1 | Rank::R8) {
                return Err(PositionError::PawnOnBackRank(sq));
            }
            if piece == Piece::King && position.kings[color.index()].is_some() {
                return Err(PositionError::TooManyKings(color));
            }
            position.set_piece_at(sq, Some((piece, color)));
        }

        for color in Color::ALL {
            let location = parts.kings[color.index()];
            if position.kings[color.index()] != location {
                return Err(PositionError::KingLocationMismatch { color, location });
            }
        }

        position.side_to_move = parts.side_to_move;
        position.castling = parts.castling;
        position.en_passant = parts.en_passant;
        position.halfmove_clock = parts.halfmove_clock;
        position.fullmove_number = parts.fullmove_number;

        position.check_castling()?;
        position.check_en_passant()?;

        tracing::trace!(fen = %position.to_fen(), "position constructed");
        Ok(position)
    }

    /// Creates a position from a FEN string with four or six fields.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenParser::parse(fen)?;
        let board = parsed.board();

        let mut kings = [None; 2];
        for (index, piece) in board.iter().enumerate() {
            if let Some((Piece::King, color)) = *piece {
                if kings[color.index()].is_some() {
                    return Err(PositionError::TooManyKings(color));
                }
                kings[color.index()] = Some(Square::at(index as u8));
            }
        }

        Position::new(PositionParts {
            board,
            side_to_move: parsed.active_color,
            castling: CastlingRights::from_fen_field(&parsed.castling),
            en_passant: parsed.en_passant,
            kings,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
        })
    }

    /// Converts the position to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let fields = FenParser {
            piece_placement: FenParser::placement(&self.board),
            active_color: self.side_to_move,
            castling: self.castling.to_fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };
        fields.to_fen()
    }

    /// Places `piece` on `sq`, or empties it when `piece` is `None`.
    ///
    /// This is the only writer of the board array, the bitboards and the
    /// king locations. Both king-safety caches are reset, since any
    /// placement can change what attacks a king.
    pub fn set_piece_at(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        let index = sq.index() as usize;
        let mask = Bitboard::from_square(sq);

        if let Some((old, color)) = self.board[index] {
            self.pieces[old.index()] &= !mask;
            self.colors[color.index()] &= !mask;
            if old == Piece::King && self.kings[color.index()] == Some(sq) {
                self.kings[color.index()] = None;
            }
        }

        self.board[index] = piece;

        if let Some((new, color)) = piece {
            self.pieces[new.index()] |= mask;
            self.colors[color.index()] |= mask;
            if new == Piece::King {
                self.kings[color.index()] = Some(sq);
            }
        }

        self.occupied = self.colors[0] | self.colors[1];
        for cache in &self.king_safety {
            cache.set(KingSafety::NotCalculated);
        }
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.board[sq.index() as usize]
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied
    }

    /// Returns every square holding a piece of `color`.
    #[inline]
    pub fn color_occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns every square holding `piece`, of either color.
    #[inline]
    pub fn piece_board(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns where `color`'s king stands, if it has one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Returns the color to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the remaining castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square a pawn may capture onto en passant this ply.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the plies since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the move number, starting at 1 and bumped after Black moves.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the cached check status of `color`'s king without computing it.
    #[inline]
    pub fn king_safety(&self, color: Color) -> KingSafety {
        self.king_safety[color.index()].get()
    }

    /// Checks every board invariant, including that a filled king-safety
    /// cache agrees with a fresh attack test.
    pub fn debug_validate(&self) -> Result<(), PositionError> {
        let inconsistent = |msg: String| Err(PositionError::Inconsistent(msg));

        if self.colors[0].intersects(self.colors[1]) {
            return inconsistent("color bitboards overlap".to_string());
        }
        if self.occupied != (self.colors[0] | self.colors[1]) {
            return inconsistent("occupied is not the union of both colors".to_string());
        }

        let mut union = Bitboard::EMPTY;
        for piece in Piece::ALL {
            let board = self.pieces[piece.index()];
            if union.intersects(board) {
                return inconsistent(format!("{piece:?} bitboard overlaps another piece type"));
            }
            union |= board;
        }
        if union != self.occupied {
            return inconsistent("piece bitboards do not cover occupied".to_string());
        }

        for index in 0..64u8 {
            let sq = Square::at(index);
            let expected = self.board[index as usize];
            let from_bits = Piece::ALL.iter().find_map(|&piece| {
                if !self.pieces[piece.index()].contains(sq) {
                    return None;
                }
                let color = if self.colors[0].contains(sq) {
                    Color::White
                } else {
                    Color::Black
                };
                Some((piece, color))
            });
            if expected != from_bits {
                return inconsistent(format!(
                    "square {sq}: array has {expected:?}, bitboards have {from_bits:?}"
                ));
            }
        }

        for color in Color::ALL {
            let kings = self.pieces_of(Piece::King, color);
            if kings.count() > 1 {
                return Err(PositionError::TooManyKings(color));
            }
            let location = self.kings[color.index()];
            if kings.lsb() != location {
                return Err(PositionError::KingLocationMismatch { color, location });
            }

            let cached = self.king_safety(color);
            if cached != KingSafety::NotCalculated {
                let actual = match location {
                    Some(sq) => crate::is_square_attacked(self, sq, color.opposite()),
                    None => false,
                };
                if actual != (cached == KingSafety::InCheck) {
                    return inconsistent(format!(
                        "{color} king safety cached as {cached:?} but attacked is {actual}"
                    ));
                }
            }
        }

        if self.pieces[Piece::Pawn.index()].intersects(Bitboard::BACK_RANKS) {
            return inconsistent("pawn on a back rank".to_string());
        }

        self.check_en_passant()
    }

    fn check_en_passant(&self) -> Result<(), PositionError> {
        let Some(ep) = self.en_passant else {
            return Ok(());
        };
        let us = self.side_to_move;
        let them = us.opposite();
        // The target sits behind a pawn that just double-pushed.
        let capture_rank = match us {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        let pushed = ep.offset(them.pawn_push());
        let valid = ep.rank() == capture_rank
            && self.piece_at(ep).is_none()
            && pushed.and_then(|sq| self.piece_at(sq)) == Some((Piece::Pawn, them));
        if valid {
            Ok(())
        } else {
            Err(PositionError::InvalidEnPassant(ep))
        }
    }

    fn check_castling(&self) -> Result<(), PositionError> {
        let rights = [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ];
        for (color, kingside, c) in rights {
            let granted = if kingside {
                self.castling.can_castle_kingside(color)
            } else {
                self.castling.can_castle_queenside(color)
            };
            if !granted {
                continue;
            }
            let (king_home, rook_home) = castle_homes(color, kingside);
            if self.piece_at(king_home) != Some((Piece::King, color))
                || self.piece_at(rook_home) != Some((Piece::Rook, color))
            {
                return Err(PositionError::CastlingWithoutPieces(c));
            }
        }
        Ok(())
    }
}

/// King and rook starting squares for one castling right.
pub(crate) const fn castle_homes(color: Color, kingside: bool) -> (Square, Square) {
    match (color, kingside) {
        (Color::White, true) => (Square::E1, Square::H1),
        (Color::White, false) => (Square::E1, Square::A1),
        (Color::Black, true) => (Square::E8, Square::H8),
        (Color::Black, false) => (Square::E8, Square::A8),
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
