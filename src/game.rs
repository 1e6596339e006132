//! A single game session as driven by a presentation layer: the position, the
//! legal moves for the side to move, and whether the game has ended.

use crate::board::Square;
use crate::error::{ChessError, Result};
use crate::movegen::{GameState, Move, MoveGenerator};
use crate::position::Position;

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    generator: MoveGenerator,
    legal_moves: Vec<Move>,
    state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Starts a session from an arbitrary position.
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            generator: MoveGenerator::new(),
            legal_moves: Vec::new(),
            state: GameState::Ongoing,
        };
        game.refresh();
        game
    }

    /// Discards the current game and starts over from the standard setup.
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    fn refresh(&mut self) {
        self.legal_moves = self.generator.legal_moves(&mut self.position);
        self.state = self.generator.classify(&self.position, &self.legal_moves);
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Destination squares of the legal moves starting on `from`.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.legal_moves
            .iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }

    pub fn history(&self) -> &[Move] {
        self.position.move_log()
    }

    /// Terminal flag for the current position: checkmate, stalemate, or ongoing.
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.state, GameState::Checkmate(_))
    }

    pub fn is_stalemate(&self) -> bool {
        self.state == GameState::Stalemate
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn in_check(&self) -> bool {
        self.generator.in_check(&self.position)
    }

    /// Plays `mv`, which must be one of the current legal moves.
    pub fn play(&mut self, mv: Move) -> Result<GameState> {
        if self.is_over() {
            return Err(ChessError::GameOver(self.state));
        }
        if !self.legal_moves.contains(&mv) {
            return Err(ChessError::invalid_move(mv, "not a legal move in this position"));
        }

        self.position.make_move(mv);
        self.refresh();
        Ok(self.state)
    }

    /// Plays the legal move whose coordinate text (e.g. `e2e4`) equals `notation`.
    pub fn play_notation(&mut self, notation: &str) -> Result<GameState> {
        if self.is_over() {
            return Err(ChessError::GameOver(self.state));
        }
        let mv = self
            .legal_moves
            .iter()
            .find(|mv| mv.notation() == notation)
            .copied()
            .ok_or_else(|| ChessError::invalid_move(notation, "not a legal move in this position"))?;
        self.play(mv)
    }

    /// Takes back the last move. Returns None if nothing has been played.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.position.undo_move()?;
        self.refresh();
        Some(mv)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
