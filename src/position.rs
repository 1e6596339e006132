//! Authoritative game state: the board, side to move, king squares, castling
//! rights, en passant target, and the logs that make `undo_move` exact.

use std::fmt;

use crate::board::{Board, CastlingRights, Color, Piece, Square};
use crate::error::{ChessError, Result};
use crate::movegen::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    white_king: Square,
    black_king: Square,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    move_log: Vec<Move>,
    // One snapshot per ply plus the initial state, so both are never empty.
    castling_log: Vec<CastlingRights>,
    en_passant_log: Vec<Option<Square>>,
}

impl Position {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Color::White,
            white_king: Square::new(7, 4),
            black_king: Square::new(0, 4),
            castling_rights: CastlingRights::ALL,
            en_passant: None,
            move_log: Vec::new(),
            castling_log: vec![CastlingRights::ALL],
            en_passant_log: vec![None],
        }
    }

    /// Position from an arbitrary arrangement. Each side must have exactly one king.
    pub fn from_board(board: Board, side_to_move: Color, castling_rights: CastlingRights) -> Result<Self> {
        let white_king = Self::locate_king(&board, Color::White)?;
        let black_king = Self::locate_king(&board, Color::Black)?;

        Ok(Self {
            board,
            side_to_move,
            white_king,
            black_king,
            castling_rights,
            en_passant: None,
            move_log: Vec::new(),
            castling_log: vec![castling_rights],
            en_passant_log: vec![None],
        })
    }

    fn locate_king(board: &Board, color: Color) -> Result<Square> {
        let kings: Vec<Square> = board
            .pieces()
            .filter(|&(_, piece, piece_color)| piece == Piece::King && piece_color == color)
            .map(|(square, _, _)| square)
            .collect();
        match kings.as_slice() {
            [king] => Ok(*king),
            _ => Err(ChessError::KingCount {
                color,
                found: kings.len(),
            }),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn castling_log(&self) -> &[CastlingRights] {
        &self.castling_log
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_log.last()
    }

    /// Applies `mv` without any legality check.
    ///
    /// The move must be consistent with the board; moves produced by
    /// `MoveGenerator` for this position always are. Use `try_make_move` for
    /// moves of unknown origin.
    pub fn make_move(&mut self, mv: Move) {
        self.board.set(mv.from, None);
        if mv.is_promotion {
            self.board.set(mv.to, Some((Piece::Queen, mv.color)));
        } else {
            self.board.set(mv.to, Some((mv.piece, mv.color)));
        }

        if mv.is_en_passant {
            self.board.set(mv.en_passant_victim(), None);
        }

        if let Some((rook_from, rook_to)) = Self::castle_rook_squares(&mv) {
            let rook = self.board.take(rook_from);
            self.board.set(rook_to, rook);
        }

        if mv.piece == Piece::King {
            self.set_king_square(mv.color, mv.to);
        }

        self.en_passant = if mv.piece == Piece::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            Some(Square::new((mv.from.row() + mv.to.row()) / 2, mv.from.col()))
        } else {
            None
        };

        self.castling_rights = self.castling_rights.after_move(&mv);

        self.side_to_move = self.side_to_move.opposite();
        self.move_log.push(mv);
        self.castling_log.push(self.castling_rights);
        self.en_passant_log.push(self.en_passant);
    }

    /// Validating variant of `make_move`; the position is untouched on error.
    pub fn try_make_move(&mut self, mv: Move) -> Result<()> {
        self.validate_move(&mv)?;
        self.make_move(mv);
        Ok(())
    }

    pub fn validate_move(&self, mv: &Move) -> Result<()> {
        if mv.color != self.side_to_move {
            return Err(ChessError::invalid_move(mv, format!("{:?} is not to move", mv.color)));
        }
        if self.board.get(mv.from) != Some((mv.piece, mv.color)) {
            return Err(ChessError::invalid_move(
                mv,
                format!("no {:?} {:?} on {}", mv.color, mv.piece, mv.from),
            ));
        }

        if mv.is_en_passant {
            if self.en_passant != Some(mv.to) || !self.board.is_empty(mv.to) {
                return Err(ChessError::invalid_move(mv, "en passant is not available"));
            }
            if self.board.get(mv.en_passant_victim()) != Some((Piece::Pawn, mv.color.opposite())) {
                return Err(ChessError::invalid_move(mv, "no pawn to capture en passant"));
            }
            return Ok(());
        }

        let target = self.board.get(mv.to);
        let expected = mv.captured_piece.map(|piece| (piece, mv.color.opposite()));
        if target != expected {
            return Err(ChessError::invalid_move(mv, format!("unexpected contents on {}", mv.to)));
        }
        if mv.is_castling {
            let on_back_row = mv.from.row() == mv.color.back_row() && mv.to.row() == mv.from.row();
            if !on_back_row || mv.from.col().abs_diff(mv.to.col()) != 2 {
                return Err(ChessError::invalid_move(mv, "king must move two squares along its back row"));
            }
            let rook_from = Self::castle_rook_squares(mv).map(|(rook_from, _)| rook_from);
            if rook_from.and_then(|square| self.board.get(square)) != Some((Piece::Rook, mv.color)) {
                return Err(ChessError::invalid_move(mv, "no rook to castle with"));
            }
        }
        Ok(())
    }

    /// Reverts the most recent move. Returns None, changing nothing, when no
    /// move has been played.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;

        self.board.set(mv.from, Some((mv.piece, mv.color)));
        self.board.set(mv.to, mv.captured_piece.map(|piece| (piece, mv.color.opposite())));

        if mv.is_en_passant {
            // The captured pawn stood beside the landing square, not on it
            self.board.set(mv.to, None);
            self.board.set(mv.en_passant_victim(), Some((Piece::Pawn, mv.color.opposite())));
        }

        if let Some((rook_from, rook_to)) = Self::castle_rook_squares(&mv) {
            let rook = self.board.take(rook_to);
            self.board.set(rook_from, rook);
        }

        if mv.piece == Piece::King {
            self.set_king_square(mv.color, mv.from);
        }

        self.side_to_move = self.side_to_move.opposite();

        self.castling_log.pop();
        if let Some(&rights) = self.castling_log.last() {
            self.castling_rights = rights;
        }
        self.en_passant_log.pop();
        if let Some(&target) = self.en_passant_log.last() {
            self.en_passant = target;
        }

        Some(mv)
    }

    pub(crate) fn restore_rights(&mut self, en_passant: Option<Square>, castling_rights: CastlingRights) {
        self.en_passant = en_passant;
        self.castling_rights = castling_rights;
    }

    fn set_king_square(&mut self, color: Color, square: Square) {
        match color {
            Color::White => self.white_king = square,
            Color::Black => self.black_king = square,
        }
    }

    // Rook (from, to) for a castling move; it lands beside the king on the
    // side it came from. None for non-castling moves or off-board squares.
    fn castle_rook_squares(mv: &Move) -> Option<(Square, Square)> {
        if !mv.is_castling {
            return None;
        }
        if mv.is_kingside_castle() {
            Some((mv.to.offset(0, 1)?, mv.to.offset(0, -1)?))
        } else {
            Some((mv.to.offset(0, -2)?, mv.to.offset(0, 1)?))
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{:?} to move", self.board, self.side_to_move)
    }
}
