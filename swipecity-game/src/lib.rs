//! Swipe City Game Engine
//!
//! Platform-agnostic core of the Swipe City questionnaire: swipe direction
//! classification, the gesture lifecycle, game progression and snapshot
//! persistence. No UI or platform-specific dependencies live here.

pub mod constants;
pub mod direction;
pub mod gesture;
pub mod numbers;
pub mod persistence;
pub mod policy;
pub mod question;
pub mod recommendation;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use direction::{
    DragVector, SwipeDirection, classify_binary, classify_octant, distance, is_committable,
    octant_for_angle,
};
pub use gesture::{
    GestureError, GestureOutcome, GesturePhase, SwipeCommit, SwipeConfig, SwipeGesture,
    SwipePreview,
};
pub use persistence::{MemoryStorage, MemoryStorageError, Persistence, SavedGame};
pub use policy::{GamePolicy, RoundBreakAdvance};
pub use question::{Question, QuestionBank, QuestionBankError, QuestionKind};
pub use recommendation::{
    ErrorBody, Recommendation, RecommendationError, RecommendationRequest, RecommendationState,
    parse_recommendation, strip_code_fences,
};
pub use session::GameSession;
pub use state::{Answer, GamePhase, GameState, InvariantViolation, TransitionError};

/// The 20-question bank shipped with the game, as `{"questions": [...]}` JSON.
pub const BUNDLED_QUESTIONS_JSON: &str = include_str!("../data/questions.json");

/// Trait for abstracting question and policy loading
/// Platform-specific implementations should provide this
pub trait QuestionLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the ordered question bank
    ///
    /// # Errors
    ///
    /// Returns an error if the bank cannot be loaded or fails validation.
    fn load_questions(&self) -> Result<QuestionBank, Self::Error>;

    /// Load gameplay tunables; the defaults unless overridden
    ///
    /// # Errors
    ///
    /// Returns an error if a policy source exists but cannot be parsed.
    fn load_policy(&self) -> Result<GamePolicy, Self::Error> {
        Ok(GamePolicy::default())
    }
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a game snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be stored.
    fn save_game(&self, key: &str, snapshot: &SavedGame) -> Result<(), Self::Error>;

    /// Load a game snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unreachable or the stored data is unreadable.
    fn load_game(&self, key: &str) -> Result<Option<SavedGame>, Self::Error>;

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    fn delete_save(&self, key: &str) -> Result<(), Self::Error>;

    /// Wall-clock milliseconds used to stamp snapshots.
    fn now_ms(&self) -> u64 {
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .ok()
                .and_then(|elapsed| u64::try_from(elapsed.as_millis()).ok())
                .unwrap_or(0)
        }
        #[cfg(target_arch = "wasm32")]
        {
            0
        }
    }
}

/// Main game engine for opening playthroughs
pub struct GameEngine<L, S>
where
    L: QuestionLoader,
    S: GameStorage,
{
    loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: QuestionLoader,
    S: GameStorage + Clone,
{
    /// Create a new game engine with the provided loader and storage
    pub const fn new(loader: L, storage: S) -> Self {
        Self { loader, storage }
    }

    /// Open a session, resuming the saved playthrough when one is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the question bank or policy cannot be loaded.
    pub fn open_session(&self) -> Result<GameSession<S>, L::Error> {
        let bank = self.loader.load_questions()?;
        let policy = self.loader.load_policy()?;
        Ok(GameSession::open(
            bank,
            policy,
            Persistence::new(self.storage.clone()),
        ))
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STORAGE_KEY;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl QuestionLoader for FixtureLoader {
        type Error = QuestionBankError;

        fn load_questions(&self) -> Result<QuestionBank, Self::Error> {
            QuestionBank::from_json(BUNDLED_QUESTIONS_JSON)
        }
    }

    #[test]
    fn bundled_bank_is_valid() {
        let bank = QuestionBank::from_json(BUNDLED_QUESTIONS_JSON).unwrap();
        assert_eq!(bank.len(), 20);
        let multi = bank
            .iter()
            .filter(|question| question.kind == QuestionKind::MultiChoice)
            .count();
        assert_eq!(multi, 7);
        let ids: Vec<u32> = bank.iter().map(|question| question.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn engine_opens_and_resumes_sessions() {
        let engine = GameEngine::new(FixtureLoader, MemoryStorage::default());
        let mut session = engine.open_session().unwrap();
        assert_eq!(session.phase(), GamePhase::Intro);
        session.start().unwrap();
        session.advance_past_round_break().unwrap();
        session.submit_choice(SwipeDirection::Right).unwrap();
        session.submit_choice(SwipeDirection::UpLeft).unwrap();

        let resumed = engine.open_session().unwrap();
        assert_eq!(resumed.state(), session.state());
        assert_eq!(resumed.state().answers()[1].answer, "Only sweaters and jackets needed");
        assert!(engine.storage().raw(STORAGE_KEY).is_some());
    }

    #[test]
    fn default_clock_reports_epoch_millis() {
        let storage = MemoryStorage::new();
        assert!(storage.now_ms() > 0);
    }
}
