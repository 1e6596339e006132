use thiserror::Error;

use crate::board::Color;
use crate::movegen::GameState;

pub type Result<T> = std::result::Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid move {notation}: {reason}")]
    InvalidMove { notation: String, reason: String },

    #[error("game is over: {0}")]
    GameOver(GameState),

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("expected exactly one {color:?} king, found {found}")]
    KingCount { color: Color, found: usize },
}

impl ChessError {
    pub(crate) fn invalid_move(notation: impl ToString, reason: impl ToString) -> Self {
        ChessError::InvalidMove {
            notation: notation.to_string(),
            reason: reason.to_string(),
        }
    }
}
