//! Errors raised while building or checking a position.

use chess_core::{Color, FenError, Square};
use thiserror::Error;

/// A position could not be constructed, or failed a consistency check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("{color} king location {location:?} does not match the board")]
    KingLocationMismatch {
        color: Color,
        location: Option<Square>,
    },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("en passant square {0} is not a valid target for the side to move")]
    InvalidEnPassant(Square),

    #[error("castling right '{0}' without king and rook on their home squares")]
    CastlingWithoutPieces(char),

    #[error("inconsistent board state: {0}")]
    Inconsistent(String),
}
