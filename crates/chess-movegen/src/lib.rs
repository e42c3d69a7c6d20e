//! Bitboard move generation with in-place make/unmake.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with scanning and iteration
//! - [`Position`] - board array plus redundant bitboards, kept in sync by
//!   a single placement primitive
//! - Attack tables, pseudo-legal targets and check detection
//! - [`Position::make_move`] / [`Position::unmake_move`] with [`MoveHistory`]
//! - Legal move generation and perft
//!
//! # Example
//!
//! ```
//! use chess_movegen::{perft, perft_divide, Position};
//!
//! let mut position = Position::startpos();
//! assert_eq!(position.legal_moves().len(), 20);
//! assert_eq!(perft(&mut position, 2), 400);
//!
//! let divide = perft_divide(&mut position, 2);
//! assert_eq!(divide.moves["e2e4"], 20);
//! assert_eq!(divide.total, 400);
//! ```

mod bitboard;
mod error;
pub mod movegen;
mod position;

pub use bitboard::Bitboard;
pub use error::PositionError;
pub use movegen::attacks::{
    king_steps, knight_jumps, pawn_captures, rays_for, AttackTables, Direction,
};
pub use movegen::check::{is_square_attacked, move_affects_king};
pub use movegen::make::MoveHistory;
pub use movegen::perft::{perft, perft_divide, perft_divide_parallel, PerftDivide};
pub use movegen::pseudo::{targets_from, PawnTargets};
pub use movegen::{legal_moves, pseudo_legal_moves, MoveList};
pub use position::{CastlingRights, KingSafety, Position, PositionParts};
