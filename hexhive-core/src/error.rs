//! Engine error types

use thiserror::Error;

use crate::hex::Hex;
use crate::pieces::{Color, Piece};

/// Why a selection or move was rejected. All variants are recoverable:
/// the caller re-presents the selection or shows a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is not active")]
    GameNotActive,

    #[error("it is {expected:?}'s turn, not {got:?}'s")]
    WrongTurn { expected: Color, got: Color },

    #[error("{piece} cannot go to {to}")]
    IllegalMove { piece: Piece, to: Hex },

    #[error("{0} has no legal moves")]
    NoLegalMoves(Piece),

    #[error("{0} is not on the board")]
    PieceNotFound(Piece),

    #[error("{0} is not in hand")]
    PieceNotInHand(Piece),

    #[error("{0} is covered by another piece")]
    PieceCovered(Piece),

    #[error("{0} cannot move this turn")]
    PieceFrozen(Piece),

    #[error("{0:?} must place the queen first")]
    QueenRequired(Color),

    #[error("queen may not be placed on the opening turn")]
    OpeningQueen,

    #[error("{0} cannot relocate other pieces")]
    NotAThrower(Piece),

    #[error("passing is only allowed when no other action exists")]
    PassNotAllowed,
}

impl GameError {
    /// Short machine-readable tag for API consumers
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::GameNotActive => "game_not_active",
            GameError::WrongTurn { .. } => "wrong_turn",
            GameError::IllegalMove { .. } => "illegal_move",
            GameError::NoLegalMoves(_) => "no_legal_moves",
            GameError::PieceNotFound(_) => "piece_not_found",
            GameError::PieceNotInHand(_) => "piece_not_in_hand",
            GameError::PieceCovered(_) => "piece_covered",
            GameError::PieceFrozen(_) => "piece_frozen",
            GameError::QueenRequired(_) => "queen_required",
            GameError::OpeningQueen => "opening_queen",
            GameError::NotAThrower(_) => "not_a_thrower",
            GameError::PassNotAllowed => "pass_not_allowed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid piece id: {0:?}")]
pub struct ParsePieceError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex key: {0:?}")]
pub struct ParseHexError(pub String);
