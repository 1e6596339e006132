use std::fmt;

use crate::board::{Color, Piece, Square};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub color: Color,
    pub captured_piece: Option<Piece>,
    pub is_promotion: bool,
    pub is_en_passant: bool,
    pub is_castling: bool,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece, color: Color, captured_piece: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            color,
            captured_piece,
            is_promotion: piece == Piece::Pawn && to.row() == color.promotion_row(),
            is_en_passant: false,
            is_castling: false,
        }
    }

    pub fn new_en_passant(from: Square, to: Square, color: Color) -> Self {
        Self {
            from,
            to,
            piece: Piece::Pawn,
            color,
            captured_piece: Some(Piece::Pawn),
            is_promotion: false,
            is_en_passant: true,
            is_castling: false,
        }
    }

    pub fn new_castling(from: Square, to: Square, color: Color) -> Self {
        Self {
            from,
            to,
            piece: Piece::King,
            color,
            captured_piece: None,
            is_promotion: false,
            is_en_passant: false,
            is_castling: true,
        }
    }

    pub fn id(&self) -> u16 {
        self.from.row() as u16 * 1000
            + self.from.col() as u16 * 100
            + self.to.row() as u16 * 10
            + self.to.col() as u16
    }

    // Same row the capturing pawn started on, same column it lands on
    pub fn en_passant_victim(&self) -> Square {
        Square::new(self.from.row(), self.to.col())
    }

    pub fn is_kingside_castle(&self) -> bool {
        self.is_castling && self.to.col() > self.from.col()
    }

    pub fn notation(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate(Color), // Color is the winner
    Stalemate,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameState::Ongoing)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameState::Ongoing => write!(f, "in progress"),
            GameState::Checkmate(winner) => write!(f, "checkmate, {:?} wins", winner),
            GameState::Stalemate => write!(f, "stalemate"),
        }
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (1, 1), (0, -1),
    (-1, 1), (0, 1), (1, -1), (1, 0),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (1, 1), (-1, 1), (1, -1)];

/// Generates pseudo-legal and legal moves for a `Position` and adjudicates
/// checkmate and stalemate.
///
/// Legality is decided by playing each candidate on the position, asking
/// whether the mover's king is attacked, and taking the move back. Attack
/// tests reuse the pseudo-legal generator for the opposing side.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Moves obeying piece movement and occupancy rules for the side to move,
    /// without regard to king safety. Castling is never included.
    pub fn pseudo_legal_moves(&self, position: &Position) -> Vec<Move> {
        self.generate_for(position, position.side_to_move())
    }

    fn generate_for(&self, position: &Position, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, piece, piece_color) in position.board().pieces() {
            if piece_color != color {
                continue;
            }
            match piece {
                Piece::Pawn => self.pawn_moves(position, from, color, &mut moves),
                Piece::Knight => self.step_moves(position, from, Piece::Knight, color, &KNIGHT_OFFSETS, &mut moves),
                Piece::Bishop => self.slide_moves(position, from, Piece::Bishop, color, &BISHOP_DIRECTIONS, &mut moves),
                Piece::Rook => self.slide_moves(position, from, Piece::Rook, color, &ROOK_DIRECTIONS, &mut moves),
                Piece::Queen => {
                    self.slide_moves(position, from, Piece::Queen, color, &BISHOP_DIRECTIONS, &mut moves);
                    self.slide_moves(position, from, Piece::Queen, color, &ROOK_DIRECTIONS, &mut moves);
                }
                Piece::King => self.step_moves(position, from, Piece::King, color, &KING_OFFSETS, &mut moves),
            }
        }
        moves
    }

    fn pawn_moves(&self, position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
        let board = position.board();
        let direction = color.pawn_direction();

        // Single and double advance
        if let Some(one_step) = from.offset(direction, 0) {
            if board.is_empty(one_step) {
                moves.push(Move::new(from, one_step, Piece::Pawn, color, None));
                if from.row() == color.pawn_start_row() {
                    if let Some(two_step) = from.offset(2 * direction, 0) {
                        if board.is_empty(two_step) {
                            moves.push(Move::new(from, two_step, Piece::Pawn, color, None));
                        }
                    }
                }
            }
        }

        // Captures, including en passant onto the empty target square
        for d_col in [-1, 1] {
            let Some(target) = from.offset(direction, d_col) else {
                continue;
            };
            match board.get(target) {
                Some((captured, target_color)) if target_color != color => {
                    moves.push(Move::new(from, target, Piece::Pawn, color, Some(captured)));
                }
                None if position.en_passant() == Some(target) => {
                    moves.push(Move::new_en_passant(from, target, color));
                }
                _ => {}
            }
        }
    }

    fn step_moves(
        &self,
        position: &Position,
        from: Square,
        piece: Piece,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in offsets {
            let Some(to) = from.offset(d_row, d_col) else {
                continue;
            };
            match position.board().get(to) {
                None => moves.push(Move::new(from, to, piece, color, None)),
                Some((captured, target_color)) if target_color != color => {
                    moves.push(Move::new(from, to, piece, color, Some(captured)));
                }
                Some(_) => {}
            }
        }
    }

    fn slide_moves(
        &self,
        position: &Position,
        from: Square,
        piece: Piece,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in directions {
            for distance in 1..8 {
                let Some(to) = from.offset(d_row * distance, d_col * distance) else {
                    break;
                };
                match position.board().get(to) {
                    None => moves.push(Move::new(from, to, piece, color, None)),
                    Some((captured, target_color)) => {
                        if target_color != color {
                            moves.push(Move::new(from, to, piece, color, Some(captured)));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// True when the opponent of the side to move can reach `square` with a
    /// pseudo-legal move.
    pub fn is_square_under_attack(&self, position: &Position, square: Square) -> bool {
        self.is_attacked_by(position, square, position.side_to_move().opposite())
    }

    fn is_attacked_by(&self, position: &Position, square: Square, attacker: Color) -> bool {
        self.generate_for(position, attacker)
            .iter()
            .any(|mv| mv.to == square)
    }

    pub fn in_check(&self, position: &Position) -> bool {
        let side = position.side_to_move();
        self.is_attacked_by(position, position.king_square(side), side.opposite())
    }

    /// All legal moves for the side to move, castling included.
    ///
    /// The position is used as a scratch area: every candidate is played and
    /// taken back. En passant target and castling rights are restored before
    /// returning, so the call is observably side-effect free.
    pub fn legal_moves(&self, position: &mut Position) -> Vec<Move> {
        let saved_en_passant = position.en_passant();
        let saved_castling = position.castling_rights();
        let mover = position.side_to_move();

        let mut moves = self.pseudo_legal_moves(position);
        moves.retain(|mv| {
            position.make_move(*mv);
            let king_exposed = self.is_attacked_by(position, position.king_square(mover), mover.opposite());
            position.undo_move();
            !king_exposed
        });

        self.castle_moves(position, &mut moves);

        position.restore_rights(saved_en_passant, saved_castling);
        moves
    }

    fn castle_moves(&self, position: &Position, moves: &mut Vec<Move>) {
        let color = position.side_to_move();
        let king = position.king_square(color);
        let rights = position.castling_rights();

        if !rights.kingside(color) && !rights.queenside(color) {
            return;
        }
        // Can't castle out of check
        if self.is_square_under_attack(position, king) {
            return;
        }
        if rights.kingside(color) {
            if let Some(mv) = self.castle_move(position, king, color, 1, 2) {
                moves.push(mv);
            }
        }
        if rights.queenside(color) {
            if let Some(mv) = self.castle_move(position, king, color, -1, 3) {
                moves.push(mv);
            }
        }
    }

    /// Castle toward `side` (+1 kingside, -1 queenside). The king transits two
    /// squares, which must be empty and unattacked; `gap` squares between king
    /// and rook must be empty.
    fn castle_move(&self, position: &Position, king: Square, color: Color, side: i8, gap: i8) -> Option<Move> {
        let board = position.board();

        let rook_square = king.offset(0, side * (gap + 1))?;
        if board.get(rook_square) != Some((Piece::Rook, color)) {
            return None;
        }
        for step in 1..=gap {
            if !board.is_empty(king.offset(0, side * step)?) {
                return None;
            }
        }
        for step in 1..=2 {
            if self.is_square_under_attack(position, king.offset(0, side * step)?) {
                return None;
            }
        }

        Some(Move::new_castling(king, king.offset(0, side * 2)?, color))
    }

    pub fn classify(&self, position: &Position, legal_moves: &[Move]) -> GameState {
        if !legal_moves.is_empty() {
            GameState::Ongoing
        } else if self.in_check(position) {
            // Checkmate - the side to move is in check and has no legal moves
            GameState::Checkmate(position.side_to_move().opposite())
        } else {
            GameState::Stalemate
        }
    }

    pub fn game_state(&self, position: &mut Position) -> GameState {
        let moves = self.legal_moves(position);
        self.classify(position, &moves)
    }
}
