//! Seeded random playouts

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::game::{GameState, Move};
use crate::record::GameRecord;
use crate::rules::Rules;

/// Picks uniformly among the legal moves
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// None once the game is over
    pub fn choose(&mut self, state: &GameState) -> Option<Move> {
        state.legal_moves().choose(&mut self.rng).copied()
    }
}

/// Play until the game ends or `max_turns` plies have been made
pub fn play_random_game(rules: Rules, seed: u64, max_turns: u32) -> (GameState, GameRecord) {
    let mut player = RandomPlayer::new(seed);
    let mut record = GameRecord::new(rules.clone());
    let mut state = GameState::new(rules);

    for _ in 0..max_turns {
        let Some(mv) = player.choose(&state) else {
            break;
        };
        match state.apply(mv) {
            Ok(next) => {
                record.push(mv);
                state = next;
            }
            Err(e) => {
                // legal_moves and apply disagree; stop rather than loop
                tracing::warn!(turn = state.turn(), ?mv, error = %e, "generated move rejected");
                break;
            }
        }
    }

    (state, record)
}
