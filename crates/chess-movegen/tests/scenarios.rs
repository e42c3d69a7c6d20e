//! Check detection, castling and en passant scenarios.

use chess_core::{Color, Move, MoveFlag, Piece, Square};
use chess_movegen::movegen::pseudo::castle_targets;
use chess_movegen::{legal_moves, pseudo_legal_moves, Bitboard, MoveList, Position};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn has(moves: &MoveList, text: &str) -> bool {
    moves.find_algebraic(text).is_some()
}

#[test]
fn rook_on_open_file_gives_check() {
    let position = pos("3r4/8/8/8/3K4/8/8/7k w - - 0 1");
    assert!(position.is_king_in_check(Color::White));
}

#[test]
fn any_piece_between_blocks_the_rook() {
    let blockers = [
        (Piece::Pawn, Color::White),
        (Piece::Pawn, Color::Black),
        (Piece::Knight, Color::White),
        (Piece::Knight, Color::Black),
        (Piece::Bishop, Color::Black),
        (Piece::Queen, Color::White),
    ];
    for square in ["d5", "d6", "d7"] {
        for blocker in blockers {
            let mut position = pos("3r4/8/8/8/3K4/8/8/7k w - - 0 1");
            position.set_piece_at(sq(square), Some(blocker));
            assert!(
                !position.is_king_in_check(Color::White),
                "{blocker:?} on {square}"
            );
        }
    }
}

#[test]
fn bishop_on_file_or_rank_never_checks() {
    let mut position = pos("8/8/8/8/3K4/8/8/7k w - - 0 1");
    for target in ["d8", "d1", "a4", "h4", "d6", "f4"] {
        let mut probe = position.clone();
        probe.set_piece_at(sq(target), Some((Piece::Bishop, Color::Black)));
        assert!(!probe.is_king_in_check(Color::White), "bishop on {target}");
    }
    position.set_piece_at(sq("g7"), Some((Piece::Bishop, Color::Black)));
    assert!(position.is_king_in_check(Color::White));
}

#[test]
fn castling_candidates_follow_rights_and_occupancy() {
    let both = pos("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let targets = castle_targets(&both, Square::E1, Color::White);
    assert_eq!(targets, Bitboard::from_squares(&[Square::C1, Square::G1]));

    let kingside_only = pos("4k3/8/8/8/8/8/8/R3K2R w K - 0 1");
    assert_eq!(
        castle_targets(&kingside_only, Square::E1, Color::White),
        Bitboard::from_square(Square::G1)
    );

    let queenside_only = pos("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1");
    assert_eq!(
        castle_targets(&queenside_only, Square::E1, Color::White),
        Bitboard::from_square(Square::C1)
    );

    let f1_taken = pos("4k3/8/8/8/8/8/8/R3KB1R w KQ - 0 1");
    assert_eq!(
        castle_targets(&f1_taken, Square::E1, Color::White),
        Bitboard::from_square(Square::C1)
    );
}

#[test]
fn pseudo_legal_castles_are_listed_with_flags() {
    let position = pos("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    let mut moves = MoveList::new();
    pseudo_legal_moves(&position, &mut moves);
    let kingside = Move::new(Piece::King, Square::E8, Square::G8, MoveFlag::CastleKingside);
    let queenside = Move::new(Piece::King, Square::E8, Square::C8, MoveFlag::CastleQueenside);
    assert!(moves.as_slice().contains(&kingside));
    assert!(moves.as_slice().contains(&queenside));
}

#[test]
fn en_passant_only_on_the_next_ply() {
    let mut position = pos("4k3/3p4/8/4P3/8/8/8/4K2N b - - 0 1");
    position.make_move(Move::new(Piece::Pawn, sq("d7"), sq("d5"), MoveFlag::DoublePush));

    let moves = legal_moves(&mut position);
    let capture = moves.find_algebraic("e5d6").expect("en passant available");
    assert_eq!(capture.flag(), MoveFlag::EnPassant);

    // White waits, Black waits, and the chance is gone.
    let wait = moves.find_algebraic("h1g3").expect("knight move");
    position.make_move(wait);
    let black_wait = legal_moves(&mut position)
        .find_algebraic("e8f7")
        .expect("king move");
    position.make_move(black_wait);

    assert_eq!(position.en_passant(), None);
    assert!(!has(&legal_moves(&mut position), "e5d6"));
}

#[test]
fn en_passant_removes_the_pushed_pawn() {
    let mut position = pos("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1");
    let push = legal_moves(&mut position).find_algebraic("d7d5").unwrap();
    position.make_move(push);
    assert_eq!(position.en_passant(), Some(sq("d6")));

    let capture = legal_moves(&mut position).find_algebraic("e5d6").unwrap();
    position.make_move(capture);
    assert_eq!(position.piece_at(sq("d5")), None);
    assert_eq!(position.piece_at(sq("d6")), Some((Piece::Pawn, Color::White)));
    assert_eq!(position.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
}

#[test]
fn castling_through_attacked_square_is_filtered() {
    // The bishop on a6 covers f1.
    let mut position = pos("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
    let moves = legal_moves(&mut position);
    assert!(!has(&moves, "e1g1"));
    assert!(has(&moves, "e1c1"));
}

#[test]
fn promotions_list_all_four_pieces() {
    let mut position = pos("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let moves = legal_moves(&mut position);
    for text in ["a7a8q", "a7a8r", "a7a8b", "a7a8n"] {
        assert!(has(&moves, text), "{text}");
    }
}

#[test]
fn capturing_a_corner_rook_removes_that_right() {
    let mut position = pos("r3k2r/8/8/8/8/8/5n2/R3K2R b KQkq - 0 1");
    let capture = legal_moves(&mut position).find_algebraic("f2h1").unwrap();
    assert_eq!(capture.flag(), MoveFlag::Capture);
    position.make_move(capture);
    assert_eq!(position.castling().to_fen_field(), "Qkq");
}
