//! HEXHIVE Core - Rules engine for the hex-stacking bug game
//!
//! This crate provides the core game logic for HEXHIVE:
//! - Hex geometry (unbounded grid, axial coordinates)
//! - Bug kinds, piece identity and starting hands
//! - Stacking board with one-hive connectivity checks
//! - Placement, movement and pillbug-throw generation
//! - Win detection and turn sequencing
//! - Configurable rules, game records and seeded random playouts

pub mod hex;
pub mod error;
pub mod pieces;
pub mod board;
pub mod placement;
pub mod movement;
pub mod win;
pub mod game;
pub mod rules;
pub mod record;
pub mod playout;

// Re-exports for convenient access
pub use hex::{Hex, DIRECTIONS, DIRECTION_NAMES};
pub use error::{GameError, ParseHexError, ParsePieceError};
pub use pieces::{create_initial_hand, Bug, BugInfo, Color, Expansions, Piece, BUGS};
pub use board::{Board, PlacedPiece};
pub use placement::valid_placements;
pub use movement::{valid_moves, valid_throws};
pub use win::{check_winner, is_surrounded};
pub use game::{GameResult, GameState, Move, Status, Winner};
pub use rules::Rules;
pub use record::{GameRecord, ReplayError};
pub use playout::{play_random_game, RandomPlayer};
