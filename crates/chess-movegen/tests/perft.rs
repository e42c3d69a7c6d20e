//! Perft reference counts for well-known positions.
//!
//! The deeper counts take a while in debug builds and are ignored by
//! default. Run them with: `cargo test --release -p chess-movegen --test perft -- --ignored`

use chess_movegen::{perft, perft_divide, perft_divide_parallel, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn perft_fen(fen: &str, depth: u32) -> u64 {
    let mut position = Position::from_fen(fen).expect("reference FEN parses");
    perft(&mut position, depth)
}

#[test]
fn startpos_depth_4() {
    assert_eq!(perft(&mut Position::startpos(), 4), 197_281);
}

#[test]
#[ignore = "slow in debug builds"]
fn startpos_depth_5() {
    assert_eq!(perft(&mut Position::startpos(), 5), 4_865_609);
}

#[test]
fn kiwipete_depth_1() {
    assert_eq!(perft_fen(KIWIPETE, 1), 48);
}

#[test]
fn kiwipete_depth_3() {
    assert_eq!(perft_fen(KIWIPETE, 3), 97_862);
}

#[test]
#[ignore = "slow in debug builds"]
fn kiwipete_depth_4() {
    assert_eq!(perft_fen(KIWIPETE, 4), 4_085_603);
}

#[test]
fn position_3_depth_4() {
    assert_eq!(perft_fen(POSITION_3, 4), 43_238);
}

#[test]
fn position_4_depth_3() {
    assert_eq!(perft_fen(POSITION_4, 3), 9_467);
}

#[test]
fn position_4_mirrored_depth_3() {
    let mirrored = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
    assert_eq!(perft_fen(mirrored, 3), 9_467);
}

#[test]
fn position_5_depth_3() {
    assert_eq!(perft_fen(POSITION_5, 3), 62_379);
}

#[test]
fn divide_total_matches_perft() {
    let mut position = Position::from_fen(POSITION_5).unwrap();
    let divide = perft_divide(&mut position, 3);
    assert_eq!(divide.total, 62_379);
    assert_eq!(divide.moves.values().sum::<u64>(), divide.total);
    assert_eq!(divide.moves.len(), 44);
}

#[test]
fn parallel_divide_total() {
    let position = Position::startpos();
    let divide = perft_divide_parallel(&position, 3, 4);
    assert_eq!(divide.total, 8_902);
    assert_eq!(divide.moves.len(), 20);
    assert_eq!(divide.moves["g1f3"], 440);
}
