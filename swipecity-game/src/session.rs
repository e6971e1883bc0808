//! A playthrough: canonical state plus everything needed to advance it.
//!
//! `GameSession` is the single owner of [`GameState`]. Each operation
//! computes the next state with a pure transition, swaps it in only on
//! success, and writes a snapshot through the [`Persistence`] adapter.

use crate::GameStorage;
use crate::direction::SwipeDirection;
use crate::gesture::{SwipeCommit, SwipeGesture};
use crate::persistence::Persistence;
use crate::policy::GamePolicy;
use crate::question::{Question, QuestionBank};
use crate::state::{GamePhase, GameState, TransitionError};

#[derive(Debug, Clone)]
pub struct GameSession<S: GameStorage> {
    state: GameState,
    bank: QuestionBank,
    policy: GamePolicy,
    persistence: Persistence<S>,
}

impl<S: GameStorage> GameSession<S> {
    /// Resume the saved playthrough if one is valid for `bank`, else start fresh.
    pub fn open(bank: QuestionBank, policy: GamePolicy, persistence: Persistence<S>) -> Self {
        let state = match persistence.load(&bank) {
            Some(state) => {
                log::debug!(
                    "Resumed game at question {} in {} phase",
                    state.current_question_index(),
                    state.phase()
                );
                state
            }
            None => GameState::fresh(&policy),
        };
        Self {
            state,
            bank,
            policy,
            persistence,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub const fn policy(&self) -> &GamePolicy {
        &self.policy
    }

    #[must_use]
    pub const fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question(&self.bank)
    }

    /// A gesture controller tuned by this session's policy.
    #[must_use]
    pub fn gesture(&self) -> SwipeGesture {
        SwipeGesture::from_policy(&self.policy)
    }

    /// One-based position and total, for "Question n of total".
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.state.current_question_index() + 1, self.bank.len())
    }

    #[must_use]
    pub const fn round_number(&self) -> usize {
        self.policy.round_number(self.state.current_question_index())
    }

    #[must_use]
    pub fn total_rounds(&self) -> usize {
        self.policy.total_rounds(self.bank.len())
    }

    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside the intro.
    pub fn start(&mut self) -> Result<&GameState, TransitionError> {
        let next = self.state.start(&self.policy);
        self.commit("start", next)
    }

    /// # Errors
    ///
    /// See [`GameState::submit_answer`].
    pub fn submit_answer(&mut self, label: &str) -> Result<&GameState, TransitionError> {
        let next = self.state.submit_answer(&self.bank, label, &self.policy);
        self.commit("submit_answer", next)
    }

    /// # Errors
    ///
    /// See [`GameState::submit_choice`].
    pub fn submit_choice(
        &mut self,
        direction: SwipeDirection,
    ) -> Result<&GameState, TransitionError> {
        let next = self.state.submit_choice(&self.bank, direction, &self.policy);
        self.commit("submit_choice", next)
    }

    /// Apply a gesture commit, refusing one produced for a different card.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::QuestionMismatch`] for a stale commit, or
    /// any error [`GameState::submit_answer`] can raise.
    pub fn apply_commit(&mut self, commit: &SwipeCommit) -> Result<&GameState, TransitionError> {
        let next = self
            .state
            .expect_question(&self.bank, commit.question_id)
            .and_then(|()| {
                self.state
                    .submit_answer(&self.bank, &commit.label, &self.policy)
            });
        self.commit("apply_commit", next)
    }

    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside a round break.
    pub fn advance_past_round_break(&mut self) -> Result<&GameState, TransitionError> {
        let next = self.state.advance_past_round_break();
        self.commit("advance_past_round_break", next)
    }

    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside the loading phase.
    pub fn complete_loading(&mut self) -> Result<&GameState, TransitionError> {
        let next = self.state.complete_loading();
        self.commit("complete_loading", next)
    }

    /// Discard all progress and the saved snapshot. Valid from any phase.
    pub fn restart(&mut self) -> &GameState {
        self.persistence.clear();
        self.state = GameState::fresh(&self.policy);
        log::debug!("Game restarted in {} phase", self.state.phase());
        &self.state
    }

    fn commit(
        &mut self,
        operation: &str,
        next: Result<GameState, TransitionError>,
    ) -> Result<&GameState, TransitionError> {
        match next {
            Ok(state) => {
                log::debug!(
                    "{operation}: {} -> {} (question {}, {} answers)",
                    self.state.phase(),
                    state.phase(),
                    state.current_question_index(),
                    state.answers().len()
                );
                self.state = state;
                self.persistence.save(&self.state);
                Ok(&self.state)
            }
            Err(err) => {
                log::warn!("Rejected {operation}: {err}");
                Err(err)
            }
        }
    }
}
