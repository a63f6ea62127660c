//! Server state management
//!
//! Every game lives in a session holding its full history, so undo is a pop
//! and the record is always in step with the current position.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hexhive_core::{GameRecord, GameState, Move, Rules};

use crate::error::ApiError;

/// One hosted game
#[derive(Clone, Debug)]
pub struct Session {
    /// Every position so far; never empty, the last one is current
    history: Vec<GameState>,
    record: GameRecord,
}

impl Session {
    pub fn new(rules: Rules) -> Self {
        Self {
            history: vec![GameState::new(rules.clone())],
            record: GameRecord::new(rules),
        }
    }

    pub fn current(&self) -> &GameState {
        // history starts with the initial position and undo keeps it
        &self.history[self.history.len() - 1]
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn apply(&mut self, mv: Move) -> Result<&GameState, ApiError> {
        let next = self.current().apply(mv)?;
        self.history.push(next);
        self.record.push(mv);
        Ok(self.current())
    }

    pub fn undo(&mut self) -> Result<&GameState, ApiError> {
        if self.history.len() < 2 {
            return Err(ApiError::NothingToUndo);
        }
        self.history.pop();
        self.record.pop();
        Ok(self.current())
    }
}

/// Server-wide shared state
pub struct ServerState {
    sessions: RwLock<HashMap<u64, Session>>,
    next_id: AtomicU64,
    pub default_rules: Rules,
}

impl ServerState {
    pub fn new(default_rules: Rules) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            default_rules,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<u64, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<u64, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn game_count(&self) -> usize {
        self.read().len()
    }

    /// Start a new session, returning its id and opening position
    pub fn create(&self, rules: Rules) -> (u64, GameState) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(rules);
        let state = session.current().clone();
        self.write().insert(id, session);
        (id, state)
    }

    /// Run `f` against a session under the read lock
    pub fn with_session<T>(
        &self,
        id: u64,
        f: impl FnOnce(&Session) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let sessions = self.read();
        let session = sessions.get(&id).ok_or(ApiError::GameNotFound(id))?;
        f(session)
    }

    /// Run `f` against a session under the write lock
    pub fn with_session_mut<T>(
        &self,
        id: u64,
        f: impl FnOnce(&mut Session) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id).ok_or(ApiError::GameNotFound(id))?;
        f(session)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
