//! Canonical game progress and its phase transitions.
//!
//! Every transition is a pure function from `&GameState` to a new
//! `GameState`. A rejected transition returns an error and the caller keeps
//! the old value, so no partial update is ever observable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::direction::SwipeDirection;
use crate::policy::GamePolicy;
use crate::question::{Question, QuestionBank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Intro,
    RoundBreak,
    Questions,
    Loading,
    Results,
}

impl GamePhase {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::RoundBreak => "roundBreak",
            Self::Questions => "questions",
            Self::Loading => "loading",
            Self::Results => "results",
        }
    }

    /// Phases in which the player is still working through the questions.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Questions | Self::RoundBreak)
    }

    /// Phases reached only once every question has been answered.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Loading | Self::Results)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A committed answer. Question fields are copied at answer time so later
/// edits to the bank never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub category: String,
    pub question: String,
    pub answer: String,
}

impl Answer {
    #[must_use]
    pub fn new(question: &Question, label: impl Into<String>) -> Self {
        Self {
            question_id: question.id,
            category: question.category.clone(),
            question: question.text.clone(),
            answer: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("`{operation}` is not valid during the {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("answer targets question {got} but question {expected} is active")]
    QuestionMismatch { expected: u32, got: u32 },
    #[error("no question at index {index}")]
    QuestionOutOfRange { index: usize },
    #[error("`{label}` is not an option of question {question_id}")]
    UnknownOption { question_id: u32, label: String },
    #[error("question {question_id} has no option for `{direction}`")]
    MissingOption {
        question_id: u32,
        direction: SwipeDirection,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("question index {index} outside a bank of {count}")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("{phase} phase holds {answers} answers at index {index}")]
    AnswerCount {
        phase: GamePhase,
        answers: usize,
        index: usize,
    },
    #[error("answer {position} belongs to question {got}, expected {expected}")]
    AnswerOrder {
        position: usize,
        expected: u32,
        got: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    current_question_index: usize,
    answers: Vec<Answer>,
    phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::fresh(&GamePolicy::default())
    }
}

impl GameState {
    /// A brand-new playthrough.
    #[must_use]
    pub fn fresh(policy: &GamePolicy) -> Self {
        Self {
            current_question_index: 0,
            answers: Vec::new(),
            phase: if policy.intro_screen {
                GamePhase::Intro
            } else {
                GamePhase::Questions
            },
        }
    }

    /// Rebuild a state from persisted parts, checking it against the bank.
    ///
    /// # Errors
    ///
    /// Returns the first invariant the parts violate.
    pub fn from_parts(
        current_question_index: usize,
        answers: Vec<Answer>,
        phase: GamePhase,
        bank: &QuestionBank,
    ) -> Result<Self, InvariantViolation> {
        let state = Self {
            current_question_index,
            answers,
            phase,
        };
        state.check_invariants(bank)?;
        Ok(state)
    }

    #[must_use]
    pub const fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn current_question<'a>(&self, bank: &'a QuestionBank) -> Option<&'a Question> {
        bank.get(self.current_question_index)
    }

    /// Leave the intro screen for the first round break.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside the intro phase.
    pub fn start(&self, policy: &GamePolicy) -> Result<Self, TransitionError> {
        self.expect_phase("start", GamePhase::Intro)?;
        let phase = if policy.round_size > 0 {
            GamePhase::RoundBreak
        } else {
            GamePhase::Questions
        };
        Ok(self.with_phase(phase))
    }

    /// Record `label` as the answer to the active question and advance.
    ///
    /// # Errors
    ///
    /// Fails outside the questions phase, when the index has no question, or
    /// when `label` is not one of the active question's options.
    pub fn submit_answer(
        &self,
        bank: &QuestionBank,
        label: &str,
        policy: &GamePolicy,
    ) -> Result<Self, TransitionError> {
        self.expect_phase("submit_answer", GamePhase::Questions)?;
        let question = self.active_question(bank)?;
        let known = question
            .kind
            .directions()
            .iter()
            .any(|&direction| question.option(direction) == Some(label));
        if !known {
            return Err(TransitionError::UnknownOption {
                question_id: question.id,
                label: label.to_string(),
            });
        }
        Ok(self.append_answer(Answer::new(question, label), bank.len(), policy))
    }

    /// Answer the active question with the label behind `direction`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_answer`], plus [`TransitionError::MissingOption`]
    /// when the direction has no label for this question.
    pub fn submit_choice(
        &self,
        bank: &QuestionBank,
        direction: SwipeDirection,
        policy: &GamePolicy,
    ) -> Result<Self, TransitionError> {
        self.expect_phase("submit_answer", GamePhase::Questions)?;
        let question = self.active_question(bank)?;
        let label = question
            .option(direction)
            .ok_or(TransitionError::MissingOption {
                question_id: question.id,
                direction,
            })?;
        Ok(self.append_answer(Answer::new(question, label), bank.len(), policy))
    }

    /// Check that an answer aimed at `question_id` targets the active question.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::QuestionMismatch`] for any other question.
    pub fn expect_question(
        &self,
        bank: &QuestionBank,
        question_id: u32,
    ) -> Result<(), TransitionError> {
        let active = self.active_question(bank)?;
        if active.id == question_id {
            Ok(())
        } else {
            Err(TransitionError::QuestionMismatch {
                expected: active.id,
                got: question_id,
            })
        }
    }

    /// Leave a round break and resume the questions.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside a round break.
    pub fn advance_past_round_break(&self) -> Result<Self, TransitionError> {
        self.expect_phase("advance_past_round_break", GamePhase::RoundBreak)?;
        Ok(self.with_phase(GamePhase::Questions))
    }

    /// The recommendation request settled; show results.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::WrongPhase`] outside the loading phase.
    pub fn complete_loading(&self) -> Result<Self, TransitionError> {
        self.expect_phase("complete_loading", GamePhase::Loading)?;
        Ok(self.with_phase(GamePhase::Results))
    }

    /// Verify the answer bookkeeping against the bank.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self, bank: &QuestionBank) -> Result<(), InvariantViolation> {
        let count = bank.len();
        let index = self.current_question_index;
        if index >= count {
            return Err(InvariantViolation::IndexOutOfRange { index, count });
        }
        let expected_answers = match self.phase {
            GamePhase::Intro => (index == 0).then_some(0),
            GamePhase::Questions | GamePhase::RoundBreak => Some(index),
            GamePhase::Loading | GamePhase::Results => (index + 1 == count).then_some(count),
        };
        if expected_answers != Some(self.answers.len()) {
            return Err(InvariantViolation::AnswerCount {
                phase: self.phase,
                answers: self.answers.len(),
                index,
            });
        }
        for (position, (answer, question)) in self.answers.iter().zip(bank.iter()).enumerate() {
            if answer.question_id != question.id {
                return Err(InvariantViolation::AnswerOrder {
                    position,
                    expected: question.id,
                    got: answer.question_id,
                });
            }
        }
        Ok(())
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        phase: GamePhase,
    ) -> Result<(), TransitionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TransitionError::WrongPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn active_question<'a>(&self, bank: &'a QuestionBank) -> Result<&'a Question, TransitionError> {
        bank.get(self.current_question_index)
            .ok_or(TransitionError::QuestionOutOfRange {
                index: self.current_question_index,
            })
    }

    fn append_answer(&self, answer: Answer, question_count: usize, policy: &GamePolicy) -> Self {
        let mut answers = self.answers.clone();
        answers.push(answer);

        if self.current_question_index + 1 >= question_count {
            return Self {
                current_question_index: self.current_question_index,
                answers,
                phase: GamePhase::Loading,
            };
        }

        let next_index = self.current_question_index + 1;
        let phase = if policy.is_round_boundary(next_index, question_count) {
            GamePhase::RoundBreak
        } else {
            GamePhase::Questions
        };
        Self {
            current_question_index: next_index,
            answers,
            phase,
        }
    }

    fn with_phase(&self, phase: GamePhase) -> Self {
        Self {
            current_question_index: self.current_question_index,
            answers: self.answers.clone(),
            phase,
        }
    }
}
