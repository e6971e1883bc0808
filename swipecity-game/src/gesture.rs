//! Lifecycle of a single swipe gesture.
//!
//! `Idle → Dragging → {Committing, Cancelling} → Idle`. The controller never
//! touches [`GameState`](crate::GameState); it only turns pointer motion into
//! at most one [`SwipeCommit`] per gesture, which the session then applies.

use std::fmt;

use crate::direction::{DragVector, SwipeDirection};
use crate::numbers::unit_clamp;
use crate::policy::GamePolicy;
use crate::question::{Question, QuestionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    /// An answer was emitted; the card is flying out.
    Committing,
    /// The drag fell short; the card is snapping back.
    Cancelling,
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Committing => "committing",
            Self::Cancelling => "cancelling",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("a gesture is already {0}")]
    AlreadyActive(GesturePhase),
    #[error("no drag in progress (gesture is {0})")]
    NotDragging(GesturePhase),
    #[error("question has no option for `{direction}`")]
    MissingOption { direction: SwipeDirection },
}

/// Live feedback for an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipePreview {
    pub direction: SwipeDirection,
    /// How close the drag is to committing, in `[0, 1]`.
    pub strength: f64,
}

/// A finalized answer choice, emitted exactly once per committed gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeCommit {
    pub question_id: u32,
    pub direction: SwipeDirection,
    pub label: String,
    /// Offset the card should animate to while leaving the screen.
    pub fling: DragVector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Commit(SwipeCommit),
    Cancel,
}

/// Distances the controller measures drags against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    pub commit_threshold: f64,
    pub binary_preview_threshold: f64,
    pub octant_preview_threshold: f64,
    pub exit_distance: f64,
}

impl SwipeConfig {
    #[must_use]
    pub const fn from_policy(policy: &GamePolicy) -> Self {
        Self {
            commit_threshold: policy.commit_threshold,
            binary_preview_threshold: policy.binary_preview_threshold,
            octant_preview_threshold: policy.octant_preview_threshold,
            exit_distance: policy.exit_distance,
        }
    }

    const fn preview_threshold(&self, kind: QuestionKind) -> f64 {
        match kind {
            QuestionKind::Binary => self.binary_preview_threshold,
            QuestionKind::MultiChoice => self.octant_preview_threshold,
        }
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self::from_policy(&GamePolicy::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwipeGesture {
    config: SwipeConfig,
    phase: GesturePhase,
    vector: DragVector,
}

impl SwipeGesture {
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            vector: DragVector::ORIGIN,
        }
    }

    #[must_use]
    pub fn from_policy(policy: &GamePolicy) -> Self {
        Self::new(SwipeConfig::from_policy(policy))
    }

    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub const fn vector(&self) -> DragVector {
        self.vector
    }

    #[must_use]
    pub const fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Start tracking a new drag from the origin.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::AlreadyActive`] unless the previous gesture has
    /// settled; the active gesture is left untouched.
    pub fn begin(&mut self) -> Result<(), GestureError> {
        self.expect_idle()?;
        self.vector = DragVector::ORIGIN;
        self.phase = GesturePhase::Dragging;
        Ok(())
    }

    /// Record the latest offset from the drag origin.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NotDragging`] outside a drag.
    pub fn update(&mut self, dx: f64, dy: f64) -> Result<(), GestureError> {
        self.expect_dragging()?;
        self.vector = DragVector::new(dx, dy);
        Ok(())
    }

    /// Direction the card would go if released now, once past the preview distance.
    #[must_use]
    pub fn preview(&self, kind: QuestionKind) -> Option<SwipePreview> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        let distance = self.vector.distance();
        if distance < self.config.preview_threshold(kind) {
            return None;
        }
        let direction = self.vector.classify(kind)?;
        Some(SwipePreview {
            direction,
            strength: unit_clamp(distance / self.config.commit_threshold),
        })
    }

    /// Release the drag and decide between commit and cancel.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NotDragging`] outside a drag, and
    /// [`GestureError::MissingOption`] when the classified direction has no
    /// label on `question`; the gesture is then cancelled.
    pub fn end(&mut self, question: &Question) -> Result<GestureOutcome, GestureError> {
        self.expect_dragging()?;
        let vector = self.vector;
        let direction = vector
            .is_committable(self.config.commit_threshold)
            .then(|| vector.classify(question.kind))
            .flatten();
        let Some(direction) = direction else {
            self.cancel();
            return Ok(GestureOutcome::Cancel);
        };
        let Some(label) = question.option(direction) else {
            self.cancel();
            return Err(GestureError::MissingOption { direction });
        };
        let fling = self.fling_for_drag(question.kind, direction);
        self.phase = GesturePhase::Committing;
        Ok(GestureOutcome::Commit(SwipeCommit {
            question_id: question.id,
            direction,
            label: label.to_string(),
            fling,
        }))
    }

    /// Abort the drag without evaluating it (pointer capture lost, card unmounted).
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NotDragging`] outside a drag.
    pub fn abort(&mut self) -> Result<(), GestureError> {
        self.expect_dragging()?;
        self.cancel();
        Ok(())
    }

    /// Answer by tapping an option instead of dragging.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::AlreadyActive`] while another gesture is live
    /// and [`GestureError::MissingOption`] for directions the question lacks.
    pub fn select(
        &mut self,
        question: &Question,
        direction: SwipeDirection,
    ) -> Result<SwipeCommit, GestureError> {
        self.expect_idle()?;
        let label = question
            .option(direction)
            .ok_or(GestureError::MissingOption { direction })?;
        let radians = direction.canonical_angle_deg().to_radians();
        let fling = DragVector::new(
            radians.cos() * self.config.exit_distance,
            radians.sin() * self.config.exit_distance,
        );
        self.phase = GesturePhase::Committing;
        Ok(SwipeCommit {
            question_id: question.id,
            direction,
            label: label.to_string(),
            fling,
        })
    }

    /// Return to `Idle` once the exit or snap-back animation has finished.
    pub fn settle(&mut self) {
        if matches!(
            self.phase,
            GesturePhase::Committing | GesturePhase::Cancelling
        ) {
            self.phase = GesturePhase::Idle;
            self.vector = DragVector::ORIGIN;
        }
    }

    fn cancel(&mut self) {
        self.vector = DragVector::ORIGIN;
        self.phase = GesturePhase::Cancelling;
    }

    fn fling_for_drag(&self, kind: QuestionKind, direction: SwipeDirection) -> DragVector {
        let exit = self.config.exit_distance;
        match kind {
            QuestionKind::Binary => {
                let dx = if direction == SwipeDirection::Right {
                    exit
                } else {
                    -exit
                };
                DragVector::new(dx, 0.0)
            }
            QuestionKind::MultiChoice => {
                let length = self.vector.distance();
                DragVector::new(
                    self.vector.dx / length * exit,
                    self.vector.dy / length * exit,
                )
            }
        }
    }

    const fn expect_idle(&self) -> Result<(), GestureError> {
        match self.phase {
            GesturePhase::Idle => Ok(()),
            phase => Err(GestureError::AlreadyActive(phase)),
        }
    }

    const fn expect_dragging(&self) -> Result<(), GestureError> {
        match self.phase {
            GesturePhase::Dragging => Ok(()),
            phase => Err(GestureError::NotDragging(phase)),
        }
    }
}
