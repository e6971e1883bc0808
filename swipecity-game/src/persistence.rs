//! Best-effort durable snapshots of game progress.
//!
//! Storage is allowed to fail in every way a browser can make it fail
//! (private mode, quota, corrupt JSON). None of that reaches gameplay: saves
//! are fire-and-forget, and a load that fails for any reason reads as "no
//! saved game".

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::GameStorage;
use crate::constants::STORAGE_KEY;
use crate::question::QuestionBank;
use crate::state::{Answer, GamePhase, GameState, InvariantViolation};

/// Serialized form of a [`GameState`]; `timestamp` is advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub current_question_index: usize,
    pub answers: Vec<Answer>,
    pub game_phase: GamePhase,
    #[serde(default)]
    pub timestamp: u64,
}

impl SavedGame {
    #[must_use]
    pub fn capture(state: &GameState, timestamp: u64) -> Self {
        Self {
            current_question_index: state.current_question_index(),
            answers: state.answers().to_vec(),
            game_phase: state.phase(),
            timestamp,
        }
    }

    /// Rehydrate against the bank the game is being played with.
    ///
    /// # Errors
    ///
    /// Returns the invariant the snapshot violates for this bank.
    pub fn restore(self, bank: &QuestionBank) -> Result<GameState, InvariantViolation> {
        GameState::from_parts(
            self.current_question_index,
            self.answers,
            self.game_phase,
            bank,
        )
    }
}

/// Wraps a [`GameStorage`] with the never-fail semantics gameplay relies on.
#[derive(Debug, Clone)]
pub struct Persistence<S: GameStorage> {
    storage: S,
    key: String,
}

impl<S: GameStorage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, state: &GameState) {
        let snapshot = SavedGame::capture(state, self.storage.now_ms());
        if let Err(err) = self.storage.save_game(&self.key, &snapshot) {
            log::warn!("Failed to save game state under `{}`: {err}", self.key);
        }
    }

    /// Load the saved game, or `None` when absent, unreadable, or inconsistent.
    pub fn load(&self, bank: &QuestionBank) -> Option<GameState> {
        let snapshot = match self.storage.load_game(&self.key) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("Failed to load game state from `{}`: {err}", self.key);
                return None;
            }
        };
        match snapshot.restore(bank) {
            Ok(state) => Some(state),
            Err(violation) => {
                log::warn!("Discarding saved game under `{}`: {violation}", self.key);
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.delete_save(&self.key) {
            log::warn!("Failed to clear saved game `{}`: {err}", self.key);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-memory storage keeping snapshots as JSON text, like browser storage does.
///
/// Clones share the same slots so a test can hold one handle while a session
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<RefCell<bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) {
        self.slots.borrow_mut().insert(key.to_string(), raw.into());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Make every subsequent operation fail, as in a locked-down browser.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.borrow_mut() = unavailable;
    }

    fn ensure_available(&self) -> Result<(), MemoryStorageError> {
        if *self.unavailable.borrow() {
            Err(MemoryStorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl GameStorage for MemoryStorage {
    type Error = MemoryStorageError;

    fn save_game(&self, key: &str, snapshot: &SavedGame) -> Result<(), Self::Error> {
        self.ensure_available()?;
        let json = serde_json::to_string(snapshot)?;
        self.slots.borrow_mut().insert(key.to_string(), json);
        Ok(())
    }

    fn load_game(&self, key: &str) -> Result<Option<SavedGame>, Self::Error> {
        self.ensure_available()?;
        self.slots
            .borrow()
            .get(key)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(MemoryStorageError::from)
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        self.ensure_available()?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
