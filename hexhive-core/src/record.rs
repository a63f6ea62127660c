//! Game records: the rules plus every move, enough to rebuild any position

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GameError;
use crate::game::{GameState, Move};
use crate::rules::Rules;

/// A move in a record that the engine refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("move {index} ({mv:?}) rejected: {source}")]
pub struct ReplayError {
    pub index: usize,
    pub mv: Move,
    #[source]
    pub source: GameError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub rules: Rules,
    pub moves: Vec<Move>,
}

impl GameRecord {
    pub fn new(rules: Rules) -> Self {
        Self { rules, moves: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Drop the last move, if any
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// Every position of the game; index 0 is the empty board
    pub fn replay(&self) -> Result<Vec<GameState>, ReplayError> {
        let mut states = Vec::with_capacity(self.moves.len() + 1);
        let mut state = GameState::new(self.rules.clone());
        for (index, &mv) in self.moves.iter().enumerate() {
            let next = state
                .apply(mv)
                .map_err(|source| ReplayError { index, mv, source })?;
            states.push(state);
            state = next;
        }
        states.push(state);
        Ok(states)
    }

    /// Position after the first `n` moves (clamped to the record length)
    pub fn state_at(&self, n: usize) -> Result<GameState, ReplayError> {
        let mut state = GameState::new(self.rules.clone());
        for (index, &mv) in self.moves.iter().take(n).enumerate() {
            state = state
                .apply(mv)
                .map_err(|source| ReplayError { index, mv, source })?;
        }
        Ok(state)
    }

    pub fn final_state(&self) -> Result<GameState, ReplayError> {
        self.state_at(self.moves.len())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game record: {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game record: {}", path.display()))?;
        Ok(record)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write game record: {}", path.display()))?;
        Ok(())
    }
}
