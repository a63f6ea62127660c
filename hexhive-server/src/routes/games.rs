//! Game session endpoints
//!
//! Sessions are created with a rules preset (or a full rules object), then
//! driven by posting move descriptors. Every response carries the full
//! state so clients never have to track rules themselves.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hexhive_core::{GameRecord, GameState, Hex, Move, Piece, Rules};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::ServerState;

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// Preset name or a full rules object
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RulesChoice {
    Preset(String),
    Custom(Rules),
}

#[derive(Deserialize, Default)]
pub struct CreateGameRequest {
    pub rules: Option<RulesChoice>,
}

#[derive(Serialize)]
pub struct GameResponse {
    pub id: u64,
    pub state: GameState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_moves: Option<Vec<Move>>,
}

#[derive(Serialize)]
pub struct PlacementsResponse {
    pub pieces: Vec<Piece>,
    pub cells: BTreeSet<Hex>,
}

#[derive(Serialize)]
pub struct DestinationsResponse {
    pub piece: Piece,
    pub destinations: BTreeSet<Hex>,
}

#[derive(Serialize)]
pub struct ThrowsResponse {
    pub piece: Piece,
    pub throws: BTreeMap<Piece, BTreeSet<Hex>>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Start a new game
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    body: Option<Json<CreateGameRequest>>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let rules = match request.rules {
        None => state.default_rules.clone(),
        Some(RulesChoice::Custom(rules)) => rules,
        Some(RulesChoice::Preset(name)) => {
            Rules::preset(&name).ok_or(ApiError::UnknownRules(name))?
        }
    };

    let (id, game) = state.create(rules);
    tracing::info!(id, rules = %game.rules().name, "game created");

    Ok((
        StatusCode::CREATED,
        Json(GameResponse { id, state: game, legal_moves: None }),
    ))
}

/// Current position plus every legal action
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<GameResponse>, ApiError> {
    state.with_session(id, |session| {
        let game = session.current();
        Ok(Json(GameResponse {
            id,
            state: game.clone(),
            legal_moves: Some(game.legal_moves()),
        }))
    })
}

pub async fn get_record(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<GameRecord>, ApiError> {
    state.with_session(id, |session| Ok(Json(session.record().clone())))
}

/// Placeable pieces and cells for the player to move
pub async fn get_placements(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<PlacementsResponse>, ApiError> {
    state.with_session(id, |session| {
        let game = session.current();
        Ok(Json(PlacementsResponse {
            pieces: game.placeable_pieces(),
            cells: game.valid_placements(),
        }))
    })
}

pub async fn get_destinations(
    State(state): State<Arc<ServerState>>,
    Path((id, piece)): Path<(u64, String)>,
) -> Result<Json<DestinationsResponse>, ApiError> {
    let piece: Piece = piece.parse()?;
    state.with_session(id, |session| {
        let destinations = session.current().destinations(piece)?;
        Ok(Json(DestinationsResponse { piece, destinations }))
    })
}

pub async fn get_throws(
    State(state): State<Arc<ServerState>>,
    Path((id, piece)): Path<(u64, String)>,
) -> Result<Json<ThrowsResponse>, ApiError> {
    let piece: Piece = piece.parse()?;
    state.with_session(id, |session| {
        let throws = session.current().throws(piece)?;
        Ok(Json(ThrowsResponse { piece, throws }))
    })
}

/// Submit a move descriptor
pub async fn apply_action(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Json(mv): Json<Move>,
) -> Result<Json<GameResponse>, ApiError> {
    let result = state.with_session_mut(id, |session| session.apply(mv).cloned());

    match result {
        Ok(game) => {
            tracing::debug!(id, ?mv, turn = game.turn(), "action applied");
            if let Some(winner) = game.winner() {
                tracing::info!(id, ?winner, turns = game.turn() - 1, "game finished");
            }
            Ok(Json(GameResponse { id, state: game, legal_moves: None }))
        }
        Err(e) => {
            tracing::warn!(id, ?mv, error = %e, "action rejected");
            Err(e)
        }
    }
}

/// Step back one ply
pub async fn undo(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.with_session_mut(id, |session| session.undo().cloned())?;
    tracing::debug!(id, turn = game.turn(), "undo");
    Ok(Json(GameResponse { id, state: game, legal_moves: None }))
}
