//! API errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexhive_core::{GameError, ParsePieceError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no game with id {0}")]
    GameNotFound(u64),

    #[error(transparent)]
    BadPiece(#[from] ParsePieceError),

    #[error("unknown rules preset: {0}")]
    UnknownRules(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Game(#[from] GameError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadPiece(_) => StatusCode::BAD_REQUEST,
            ApiError::NothingToUndo
            | ApiError::Game(GameError::GameNotActive)
            | ApiError::Game(GameError::WrongTurn { .. }) => StatusCode::CONFLICT,
            ApiError::UnknownRules(_) | ApiError::Game(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::GameNotFound(_) => "game_not_found",
            ApiError::BadPiece(_) => "bad_piece",
            ApiError::UnknownRules(_) => "unknown_rules",
            ApiError::NothingToUndo => "nothing_to_undo",
            ApiError::Game(e) => e.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
