//! HEXHIVE Server - HTTP API for hosting games
//!
//! This crate provides the web backend:
//! - REST API for creating games and submitting moves
//! - Per-piece queries (destinations, pillbug throws, placements)
//! - Undo and full game records per session

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use hexhive_core::Rules;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use state::{ServerState, Session};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Rules for games created without an explicit variant
    pub rules: Rules,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            rules: Rules::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Sessions
        .route("/api/games", post(routes::games::create_game))
        .route("/api/games/:id", get(routes::games::get_game))
        .route("/api/games/:id/record", get(routes::games::get_record))
        // Queries
        .route("/api/games/:id/placements", get(routes::games::get_placements))
        .route("/api/games/:id/moves/:piece", get(routes::games::get_destinations))
        .route("/api/games/:id/throws/:piece", get(routes::games::get_throws))
        // Actions
        .route("/api/games/:id/actions", post(routes::games::apply_action))
        .route("/api/games/:id/undo", post(routes::games::undo))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("HEXHIVE Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Default rules: {}", config.rules.name);

    let state = Arc::new(ServerState::new(config.rules));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
