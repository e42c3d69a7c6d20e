//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;

use super::legal_moves;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
///
/// Depth 0 counts the position itself; depth 1 counts its legal moves.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let history = position.make_move(m);
        nodes += perft(position, depth - 1);
        position.unmake_move(m, history);
    }
    nodes
}

/// Per-root-move node counts, keyed by coordinate notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerftDivide {
    pub moves: BTreeMap<String, u64>,
    pub total: u64,
}

impl PerftDivide {
    fn insert(&mut self, mv: String, nodes: u64) {
        self.total += nodes;
        self.moves.insert(mv, nodes);
    }
}

/// Counts the nodes below each root move. `total` equals
/// `perft(position, depth)`.
pub fn perft_divide(position: &mut Position, depth: u32) -> PerftDivide {
    let mut divide = PerftDivide::default();
    if depth == 0 {
        divide.total = 1;
        return divide;
    }

    let moves = legal_moves(position);
    for &m in &moves {
        let history = position.make_move(m);
        let nodes = perft(position, depth - 1);
        position.unmake_move(m, history);
        tracing::debug!(mv = %m, nodes, "root move counted");
        divide.insert(m.to_algebraic(), nodes);
    }
    divide
}

/// Like [`perft_divide`], with root moves split across `threads` scoped
/// worker threads. Each worker owns a clone of the position.
pub fn perft_divide_parallel(position: &Position, depth: u32, threads: usize) -> PerftDivide {
    let threads = threads.max(1);
    let mut root = position.clone();
    if depth == 0 || threads == 1 {
        return perft_divide(&mut root, depth);
    }

    let moves = legal_moves(&mut root);
    let chunk_size = moves.len().div_ceil(threads).max(1);

    let results: Vec<Vec<(String, u64)>> = thread::scope(|scope| {
        let workers: Vec<_> = moves
            .as_slice()
            .chunks(chunk_size)
            .enumerate()
            .map(|(worker, chunk)| {
                let mut local = position.clone();
                scope.spawn(move || {
                    tracing::debug!(worker, moves = chunk.len(), "perft worker started");
                    chunk
                        .iter()
                        .map(|&m| {
                            let history = local.make_move(m);
                            let nodes = perft(&mut local, depth - 1);
                            local.unmake_move(m, history);
                            (m.to_algebraic(), nodes)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(counts) => counts,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut divide = PerftDivide::default();
    for (mv, nodes) in results.into_iter().flatten() {
        divide.insert(mv, nodes);
    }
    divide
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn perft_fen(fen: &str, depth: u32) -> u64 {
        perft(&mut Position::from_fen(fen).unwrap(), depth)
    }

    #[test]
    fn perft_depth_zero_is_one() {
        assert_eq!(perft(&mut Position::startpos(), 0), 1);
    }

    #[test]
    fn perft_startpos_shallow() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8902);
        assert_eq!(position.to_fen(), Position::startpos().to_fen());
    }

    #[test]
    fn perft_kiwipete_shallow() {
        assert_eq!(perft_fen(KIWIPETE, 1), 48);
        assert_eq!(perft_fen(KIWIPETE, 2), 2039);
    }

    #[test]
    fn perft_position3_shallow() {
        assert_eq!(perft_fen(POSITION_3, 1), 14);
        assert_eq!(perft_fen(POSITION_3, 2), 191);
        assert_eq!(perft_fen(POSITION_3, 3), 2812);
    }

    #[test]
    fn perft_position4_shallow() {
        assert_eq!(perft_fen(POSITION_4, 1), 6);
        assert_eq!(perft_fen(POSITION_4, 2), 264);
    }

    #[test]
    fn perft_position5_shallow() {
        assert_eq!(perft_fen(POSITION_5, 1), 44);
        assert_eq!(perft_fen(POSITION_5, 2), 1486);
    }

    #[test]
    fn perft_divide_works() {
        let mut position = Position::startpos();
        let divide = perft_divide(&mut position, 1);
        assert_eq!(divide.moves.len(), 20);
        assert_eq!(divide.total, 20);
        assert!(divide.moves.values().all(|&n| n == 1));
    }

    #[test]
    fn perft_divide_matches_perft() {
        let mut position = Position::from_fen(KIWIPETE).unwrap();
        let divide = perft_divide(&mut position, 2);
        assert_eq!(divide.total, 2039);
        assert_eq!(divide.moves.len(), 48);
        assert_eq!(divide.moves.get("e1g1"), Some(&43));
    }

    #[test]
    fn parallel_divide_matches_sequential() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let sequential = perft_divide(&mut position.clone(), 2);
        for threads in [1, 3, 8, 64] {
            assert_eq!(perft_divide_parallel(&position, 2, threads), sequential);
        }
    }

    #[test]
    fn divide_keys_include_promotions() {
        let mut position = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let divide = perft_divide(&mut position, 1);
        for key in ["b7b8q", "b7b8r", "b7b8b", "b7b8n"] {
            assert_eq!(divide.moves.get(key), Some(&1), "{key}");
        }
    }
}
