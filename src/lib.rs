pub mod board;
pub mod error;
pub mod game;
pub mod movegen;
pub mod perft;
pub mod position;
pub mod shell;

pub use board::{Board, CastlingRights, Color, Piece, Square};
pub use error::{ChessError, Result};
pub use game::Game;
pub use movegen::{GameState, Move, MoveGenerator};
pub use position::Position;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn setup(pieces: &[(&str, Piece, Color)], side_to_move: Color, rights: CastlingRights) -> Position {
        let mut board = Board::empty();
        for &(name, piece, color) in pieces {
            board.set(sq(name), Some((piece, color)));
        }
        Position::from_board(board, side_to_move, rights).unwrap()
    }

    fn play(position: &mut Position, generator: &MoveGenerator, notation: &str) {
        let mv = generator
            .legal_moves(position)
            .into_iter()
            .find(|mv| mv.notation() == notation)
            .unwrap_or_else(|| panic!("{} is not legal", notation));
        position.make_move(mv);
    }

    #[test]
    fn test_initial_position() {
        let mut position = Position::new();
        let generator = MoveGenerator::new();
        let moves = generator.legal_moves(&mut position);

        // White should have 20 legal moves in the initial position
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|mv| mv.piece == Piece::Pawn).count(), 16);
        assert_eq!(moves.iter().filter(|mv| mv.piece == Piece::Knight).count(), 4);
        assert!(!generator.in_check(&position));
    }

    #[test]
    fn test_fools_mate() {
        let mut position = Position::new();
        let generator = MoveGenerator::new();
        for notation in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut position, &generator, notation);
        }

        assert!(generator.legal_moves(&mut position).is_empty());
        assert!(generator.in_check(&position));
        assert_eq!(generator.game_state(&mut position), GameState::Checkmate(Color::Black));
    }

    #[test]
    fn test_stalemate() {
        let mut position = setup(
            &[
                ("a1", Piece::King, Color::White),
                ("c2", Piece::King, Color::Black),
                ("b3", Piece::Queen, Color::Black),
            ],
            Color::White,
            CastlingRights::NONE,
        );
        let generator = MoveGenerator::new();

        assert!(!generator.in_check(&position));
        assert!(generator.legal_moves(&mut position).is_empty());
        assert_eq!(generator.game_state(&mut position), GameState::Stalemate);
    }

    #[test]
    fn test_castling_both_sides() {
        let mut position = setup(
            &[
                ("e1", Piece::King, Color::White),
                ("a1", Piece::Rook, Color::White),
                ("h1", Piece::Rook, Color::White),
                ("e8", Piece::King, Color::Black),
            ],
            Color::White,
            CastlingRights::ALL,
        );
        let moves = MoveGenerator::new().legal_moves(&mut position);
        let castles: Vec<String> = moves.iter().filter(|mv| mv.is_castling).map(Move::notation).collect();
        assert_eq!(castles, vec!["e1g1", "e1c1"]);
    }

    #[test]
    fn test_castling_blocked_by_attacked_transit() {
        let pieces = [
            ("e1", Piece::King, Color::White),
            ("a1", Piece::Rook, Color::White),
            ("h1", Piece::Rook, Color::White),
            ("e8", Piece::King, Color::Black),
            ("f8", Piece::Rook, Color::Black),
            ("b8", Piece::Rook, Color::Black),
        ];
        let mut position = setup(&pieces, Color::White, CastlingRights::ALL);
        let moves = MoveGenerator::new().legal_moves(&mut position);
        let castles: Vec<String> = moves.iter().filter(|mv| mv.is_castling).map(Move::notation).collect();

        // f1 is attacked; b1 is attacked but only has to be empty
        assert_eq!(castles, vec!["e1c1"]);
    }

    #[test]
    fn test_castling_blocked_by_attacked_destination() {
        let mut position = setup(
            &[
                ("e1", Piece::King, Color::White),
                ("a1", Piece::Rook, Color::White),
                ("h1", Piece::Rook, Color::White),
                ("e8", Piece::King, Color::Black),
                ("g8", Piece::Rook, Color::Black),
            ],
            Color::White,
            CastlingRights::ALL,
        );
        let generator = MoveGenerator::new();
        assert!(!generator.is_square_under_attack(&position, sq("f1")));
        assert!(generator.is_square_under_attack(&position, sq("g1")));

        let moves = generator.legal_moves(&mut position);
        let castles: Vec<String> = moves.iter().filter(|mv| mv.is_castling).map(Move::notation).collect();
        assert_eq!(castles, vec!["e1c1"]);
    }

    #[test]
    fn test_en_passant_cannot_expose_king_on_rank() {
        let mut position = setup(
            &[
                ("a5", Piece::King, Color::White),
                ("e5", Piece::Pawn, Color::White),
                ("d7", Piece::Pawn, Color::Black),
                ("h5", Piece::Rook, Color::Black),
                ("h8", Piece::King, Color::Black),
            ],
            Color::Black,
            CastlingRights::NONE,
        );
        let generator = MoveGenerator::new();
        play(&mut position, &generator, "d7d5");
        assert_eq!(position.en_passant(), Some(sq("d6")));

        let moves: Vec<String> = generator.legal_moves(&mut position).iter().map(Move::notation).collect();
        assert!(!moves.contains(&"e5d6".to_string()));
        assert!(moves.contains(&"e5e6".to_string()));
        assert!(generator
            .pseudo_legal_moves(&position)
            .iter()
            .any(|mv| mv.is_en_passant && mv.notation() == "e5d6"));
    }

    #[test]
    fn test_no_castling_out_of_check_or_without_rights() {
        let mut in_check = setup(
            &[
                ("e1", Piece::King, Color::White),
                ("a1", Piece::Rook, Color::White),
                ("h1", Piece::Rook, Color::White),
                ("e8", Piece::King, Color::Black),
                ("e5", Piece::Rook, Color::Black),
            ],
            Color::White,
            CastlingRights::ALL,
        );
        let generator = MoveGenerator::new();
        assert!(!generator.legal_moves(&mut in_check).iter().any(|mv| mv.is_castling));

        let mut no_rights = setup(
            &[
                ("e1", Piece::King, Color::White),
                ("a1", Piece::Rook, Color::White),
                ("h1", Piece::Rook, Color::White),
                ("e8", Piece::King, Color::Black),
            ],
            Color::White,
            CastlingRights {
                white_kingside: false,
                ..CastlingRights::ALL
            },
        );
        let castles: Vec<String> = generator
            .legal_moves(&mut no_rights)
            .iter()
            .filter(|mv| mv.is_castling)
            .map(Move::notation)
            .collect();
        assert_eq!(castles, vec!["e1c1"]);
    }

    #[test]
    fn test_queenside_needs_empty_rook_path() {
        let mut position = setup(
            &[
                ("e8", Piece::King, Color::Black),
                ("a8", Piece::Rook, Color::Black),
                ("b8", Piece::Knight, Color::Black),
                ("e1", Piece::King, Color::White),
            ],
            Color::Black,
            CastlingRights::ALL,
        );
        let moves = MoveGenerator::new().legal_moves(&mut position);
        assert!(!moves.iter().any(|mv| mv.is_castling));
    }

    #[test]
    fn test_rook_moves_forfeit_castling() {
        let mut position = Position::new();
        let generator = MoveGenerator::new();
        for notation in ["h2h4", "a7a5", "h1h3", "a8a6"] {
            play(&mut position, &generator, notation);
        }
        let rights = position.castling_rights();
        assert!(!rights.white_kingside && rights.white_queenside);
        assert!(!rights.black_queenside && rights.black_kingside);
    }

    #[test]
    fn test_en_passant_window() {
        let mut position = Position::new();
        let generator = MoveGenerator::new();
        for notation in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut position, &generator, notation);
        }
        assert_eq!(position.en_passant(), Some(sq("d6")));

        let moves = generator.legal_moves(&mut position);
        let capture = moves
            .iter()
            .find(|mv| mv.is_en_passant)
            .copied()
            .unwrap();
        assert_eq!(capture.notation(), "e5d6");

        position.make_move(capture);
        assert!(position.board().is_empty(sq("d5")));
        assert_eq!(position.board().get(sq("d6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(position.en_passant(), None);
    }

    #[test]
    fn test_en_passant_expires_after_one_ply() {
        let mut position = Position::new();
        let generator = MoveGenerator::new();
        for notation in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            play(&mut position, &generator, notation);
        }
        let moves = generator.legal_moves(&mut position);
        assert!(!moves.iter().any(|mv| mv.is_en_passant));
    }

    #[test]
    fn test_promotion_is_always_queen() {
        let mut position = setup(
            &[
                ("e1", Piece::King, Color::White),
                ("h8", Piece::King, Color::Black),
                ("a7", Piece::Pawn, Color::White),
            ],
            Color::White,
            CastlingRights::NONE,
        );
        let moves = MoveGenerator::new().legal_moves(&mut position);
        let promotions: Vec<&Move> = moves.iter().filter(|mv| mv.is_promotion).collect();
        assert_eq!(promotions.len(), 1);

        position.make_move(*promotions[0]);
        assert_eq!(position.board().get(sq("a8")), Some((Piece::Queen, Color::White)));
    }

    #[test]
    fn test_perft_initial_position() {
        let mut position = Position::new();
        assert_eq!(perft::perft(&mut position, 1), 20);
        assert_eq!(perft::perft(&mut position, 2), 400);
        assert_eq!(perft::perft(&mut position, 3), 8902);
    }

    // Random playouts checking, at every ply and for every legal move, that
    // make/undo is an exact inverse and never leaves the mover in check.
    #[test]
    fn test_random_playouts_hold_invariants() {
        let generator = MoveGenerator::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..12 {
            let mut position = Position::new();
            for _ in 0..80 {
                let snapshot = position.clone();
                let mover = position.side_to_move();
                let pseudo = generator.pseudo_legal_moves(&position);
                let moves = generator.legal_moves(&mut position);
                assert_eq!(position, snapshot);

                for mv in &moves {
                    assert!(mv.is_castling || pseudo.contains(mv));

                    position.make_move(*mv);
                    let king = position.king_square(mover);
                    assert!(generator
                        .pseudo_legal_moves(&position)
                        .iter()
                        .all(|reply| reply.to != king));
                    position.undo_move();
                    assert_eq!(position, snapshot);
                }

                if moves.is_empty() {
                    break;
                }
                let choice = moves[rng.gen_range(0..moves.len())];
                position.make_move(choice);
            }
        }
    }
}
