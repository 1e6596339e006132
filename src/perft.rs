//! Performance test: counts leaf nodes of the legal move tree to a fixed depth.
//!
//! [Perft](https://www.chessprogramming.org/Perft) results are well known for
//! the start position, which makes this the broadest check on generation.

use crate::movegen::MoveGenerator;
use crate::position::Position;

/// Number of move paths of exactly `depth` plies from `position`.
/// The position is walked with make/undo and left as it was found.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let generator = MoveGenerator::new();
    let moves = generator.legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        position.make_move(mv);
        nodes += perft(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Node counts below each root move, in generation order. Handy for narrowing
/// down which branch a wrong total comes from.
pub fn divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let generator = MoveGenerator::new();
    generator
        .legal_moves(position)
        .into_iter()
        .map(|mv| {
            position.make_move(mv);
            let nodes = perft(position, depth - 1);
            position.undo_move();
            (mv.notation(), nodes)
        })
        .collect()
}
