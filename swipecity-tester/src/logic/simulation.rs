//! Scripted playthroughs driven by synthetic pointer drags.
//!
//! A [`SwipeBot`] turns a seeded RNG into drag paths, the same
//! begin/update/end sequence the swipe card feeds the gesture controller,
//! and [`Simulator`] plays a whole questionnaire with them against a
//! file-backed store.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::Hasher;
use twox_hash::XxHash64;

use swipecity_game::constants::STORAGE_KEY;
use swipecity_game::{
    Answer, BUNDLED_QUESTIONS_JSON, DragVector, GamePhase, GamePolicy, GameSession, GameStorage,
    GestureError, GestureOutcome, InvariantViolation, Persistence, Question, QuestionBank,
    QuestionBankError, QuestionKind, SwipeCommit, SwipeDirection, TransitionError,
    octant_for_angle,
};

use super::storage::{FileStorage, FileStorageError};

/// Sector half-width minus a margin, so jittered angles never cross a boundary.
const OCTANT_JITTER_DEG: f64 = 20.0;
const MIN_COMMIT_FACTOR: f64 = 1.05;
const MAX_COMMIT_FACTOR: f64 = 2.5;
const MAX_NOISE_FACTOR: f64 = 0.9;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("question bank: {0}")]
    Bank(#[from] QuestionBankError),
    #[error("storage: {0}")]
    Storage(#[from] FileStorageError),
    #[error("transition refused: {0}")]
    Transition(#[from] TransitionError),
    #[error("gesture refused: {0}")]
    Gesture(#[from] GestureError),
    #[error("invariant broken: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("question {question_id} has no options to swipe")]
    NoOptions { question_id: u32 },
    #[error("question {question_id}: aimed {aimed} but the gesture produced {got}")]
    WrongDirection {
        question_id: u32,
        aimed: SwipeDirection,
        got: String,
    },
    #[error("short drag on question {question_id} changed the game instead of snapping back")]
    NoiseCommitted { question_id: u32 },
    #[error("reloaded state differs after {answered} answers")]
    ReloadMismatch { answered: usize },
    #[error("snapshot still present after restart")]
    SnapshotSurvivedRestart,
    #[error("angle {angle:.2}° classified as {got}, expected {expected}")]
    Misclassified {
        angle: f64,
        expected: SwipeDirection,
        got: String,
    },
    #[error("playthrough stalled in {phase} after {steps} steps")]
    Stalled { phase: GamePhase, steps: usize },
}

/// Knobs for one playthrough.
#[derive(Debug, Clone)]
pub struct PlaythroughPlan {
    pub policy: GamePolicy,
    /// Drop the session after every answer and resume it from disk.
    pub reload_each_answer: bool,
    /// Chance of an aborted short drag before each real swipe.
    pub noise_rate: f64,
    /// Restart once after this many answers.
    pub restart_at: Option<usize>,
}

impl Default for PlaythroughPlan {
    fn default() -> Self {
        Self {
            policy: GamePolicy::default(),
            reload_each_answer: false,
            noise_rate: 0.0,
            restart_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaythroughSummary {
    pub seed: u64,
    pub answers: Vec<Answer>,
    /// Answer counts at which a round break was shown.
    pub breaks_after: Vec<usize>,
    pub gestures: usize,
    pub cancellations: usize,
    pub reloads: usize,
    pub restarts: usize,
    pub final_phase: GamePhase,
    /// Hash over the answer sequence; equal seeds give equal fingerprints.
    pub fingerprint: u64,
}

/// Synthetic pointer input.
pub struct SwipeBot {
    rng: ChaCha8Rng,
    commit_threshold: f64,
}

impl SwipeBot {
    #[must_use]
    pub fn new(seed: u64, commit_threshold: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            commit_threshold,
        }
    }

    pub fn roll(&mut self, chance: f64) -> bool {
        chance > 0.0 && self.rng.gen_bool(chance.min(1.0))
    }

    /// Pick one of the question's options and a drag path that should commit to it.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NoOptions`] when the question offers nothing to swipe.
    pub fn aimed_drag(
        &mut self,
        question: &Question,
    ) -> Result<(SwipeDirection, Vec<DragVector>), SimulationError> {
        let options: Vec<SwipeDirection> = question
            .options
            .keys()
            .copied()
            .filter(|direction| direction.applies_to(question.kind))
            .collect();
        let direction = *options.choose(&mut self.rng).ok_or(SimulationError::NoOptions {
            question_id: question.id,
        })?;
        let length = self.commit_threshold * self.rng.gen_range(MIN_COMMIT_FACTOR..MAX_COMMIT_FACTOR);
        let end = match question.kind {
            QuestionKind::Binary => {
                let sign = if direction == SwipeDirection::Right { 1.0 } else { -1.0 };
                DragVector::new(sign * length, 0.0)
            }
            QuestionKind::MultiChoice => {
                let angle = direction.canonical_angle_deg()
                    + self.rng.gen_range(-OCTANT_JITTER_DEG..OCTANT_JITTER_DEG);
                polar(angle, length)
            }
        };
        Ok((direction, self.path_to(end)))
    }

    /// A drag in any direction that stays short of the commit threshold.
    pub fn noise_drag(&mut self, kind: QuestionKind) -> Vec<DragVector> {
        let length = self.commit_threshold * self.rng.gen_range(0.05..MAX_NOISE_FACTOR);
        let angle = self.rng.gen_range(-180.0..180.0);
        let end = match kind {
            QuestionKind::Binary => DragVector::new(polar(angle, length).dx, 0.0),
            QuestionKind::MultiChoice => polar(angle, length),
        };
        self.path_to(end)
    }

    fn path_to(&mut self, end: DragVector) -> Vec<DragVector> {
        let steps: u32 = self.rng.gen_range(3..=6);
        (1..=steps)
            .map(|step| {
                let t = f64::from(step) / f64::from(steps);
                DragVector::new(end.dx * t, end.dy * t)
            })
            .collect()
    }

    pub fn angle(&mut self) -> f64 {
        self.rng.gen_range(-180.0..180.0)
    }
}

fn polar(angle_deg: f64, length: f64) -> DragVector {
    let radians = angle_deg.to_radians();
    DragVector::new(radians.cos() * length, radians.sin() * length)
}

/// Plays questionnaires over the bundled question bank.
#[derive(Debug, Clone)]
pub struct Simulator {
    bank: QuestionBank,
}

impl Simulator {
    /// # Errors
    ///
    /// Returns an error if the bundled bank fails validation.
    pub fn new() -> Result<Self, SimulationError> {
        Ok(Self::with_bank(QuestionBank::from_json(BUNDLED_QUESTIONS_JSON)?))
    }

    #[must_use]
    pub const fn with_bank(bank: QuestionBank) -> Self {
        Self { bank }
    }

    fn open(&self, plan: &PlaythroughPlan, storage: &FileStorage) -> GameSession<FileStorage> {
        GameSession::open(
            self.bank.clone(),
            plan.policy.clone(),
            Persistence::new(storage.clone()),
        )
    }

    /// Play from a fresh store to the results screen.
    ///
    /// # Errors
    ///
    /// Returns the first refused transition, misrouted gesture or broken invariant.
    pub fn run(
        &self,
        plan: &PlaythroughPlan,
        seed: u64,
        storage: &FileStorage,
    ) -> Result<PlaythroughSummary, SimulationError> {
        let mut bot = SwipeBot::new(seed, plan.policy.commit_threshold);
        let mut session = self.open(plan, storage);
        let mut summary = PlaythroughSummary {
            seed,
            answers: Vec::new(),
            breaks_after: Vec::new(),
            gestures: 0,
            cancellations: 0,
            reloads: 0,
            restarts: 0,
            final_phase: session.phase(),
            fingerprint: 0,
        };
        let mut restart_pending = plan.restart_at;
        let step_limit = (self.bank.len() + 1) * 8;

        for _ in 0..step_limit {
            session.state().check_invariants(session.bank())?;
            match session.phase() {
                GamePhase::Intro => {
                    session.start()?;
                }
                GamePhase::RoundBreak => {
                    summary.breaks_after.push(session.state().answers().len());
                    session.advance_past_round_break()?;
                }
                GamePhase::Questions => {
                    self.swipe_once(&mut session, &mut bot, plan, &mut summary)?;
                    let answered = session.state().answers().len();

                    if restart_pending == Some(answered) {
                        restart_pending = None;
                        session.restart();
                        summary.restarts += 1;
                        summary.breaks_after.clear();
                        if storage.load_game(STORAGE_KEY)?.is_some() {
                            return Err(SimulationError::SnapshotSurvivedRestart);
                        }
                        log::debug!("Seed {seed}: restarted after {answered} answers");
                    }

                    if plan.reload_each_answer {
                        let resumed = self.open(plan, &FileStorage::new(storage.dir())?);
                        if resumed.state() != session.state() {
                            return Err(SimulationError::ReloadMismatch { answered });
                        }
                        session = resumed;
                        summary.reloads += 1;
                    }
                }
                // The recommendation itself is the server's concern; resolve immediately.
                GamePhase::Loading => {
                    session.complete_loading()?;
                }
                GamePhase::Results => {
                    summary.answers = session.state().answers().to_vec();
                    summary.final_phase = GamePhase::Results;
                    summary.fingerprint = fingerprint(&summary.answers);
                    return Ok(summary);
                }
            }
        }

        Err(SimulationError::Stalled {
            phase: session.phase(),
            steps: step_limit,
        })
    }

    fn swipe_once(
        &self,
        session: &mut GameSession<FileStorage>,
        bot: &mut SwipeBot,
        plan: &PlaythroughPlan,
        summary: &mut PlaythroughSummary,
    ) -> Result<(), SimulationError> {
        let Some(question) = session.current_question().cloned() else {
            return Err(TransitionError::QuestionOutOfRange {
                index: session.state().current_question_index(),
            }
            .into());
        };
        let mut gesture = session.gesture();

        if bot.roll(plan.noise_rate) {
            let before = session.state().clone();
            gesture.begin()?;
            for step in bot.noise_drag(question.kind) {
                gesture.update(step.dx, step.dy)?;
            }
            summary.gestures += 1;
            match gesture.end(&question)? {
                GestureOutcome::Cancel => summary.cancellations += 1,
                GestureOutcome::Commit(_) => {
                    return Err(SimulationError::NoiseCommitted {
                        question_id: question.id,
                    });
                }
            }
            gesture.settle();
            if *session.state() != before {
                return Err(SimulationError::NoiseCommitted {
                    question_id: question.id,
                });
            }
        }

        let (aimed, path) = bot.aimed_drag(&question)?;
        gesture.begin()?;
        for step in path {
            gesture.update(step.dx, step.dy)?;
        }
        summary.gestures += 1;
        let commit: SwipeCommit = match gesture.end(&question)? {
            GestureOutcome::Commit(commit) if commit.direction == aimed => commit,
            GestureOutcome::Commit(commit) => {
                return Err(SimulationError::WrongDirection {
                    question_id: question.id,
                    aimed,
                    got: commit.direction.to_string(),
                });
            }
            GestureOutcome::Cancel => {
                return Err(SimulationError::WrongDirection {
                    question_id: question.id,
                    aimed,
                    got: String::from("cancel"),
                });
            }
        };
        gesture.settle();
        session.apply_commit(&commit)?;
        Ok(())
    }
}

/// Sample random angles and check the sector lookup against drags built from them.
///
/// # Errors
///
/// Returns the first angle whose drag lands in the wrong sector.
pub fn classifier_sweep(seed: u64, samples: usize) -> Result<usize, SimulationError> {
    let mut bot = SwipeBot::new(seed, GamePolicy::default().commit_threshold);
    for _ in 0..samples {
        let angle = bot.angle();
        let expected = octant_for_angle(angle);
        let got = polar(angle, 150.0).classify(QuestionKind::MultiChoice);
        // Points within float noise of a boundary may land on either side.
        let offset = (angle + 22.5).rem_euclid(45.0);
        let near_boundary = offset.min(45.0 - offset) < 1e-6;
        if got != Some(expected) && !near_boundary {
            return Err(SimulationError::Misclassified {
                angle,
                expected,
                got: got.map_or_else(|| String::from("none"), |d| d.to_string()),
            });
        }
        let binary_expected = if polar(angle, 150.0).dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        };
        let binary = polar(angle, 150.0).classify(QuestionKind::Binary);
        if binary != Some(binary_expected) {
            return Err(SimulationError::Misclassified {
                angle,
                expected: binary_expected,
                got: binary.map_or_else(|| String::from("none"), |d| d.to_string()),
            });
        }
    }

    for direction in SwipeDirection::ALL {
        let got = polar(direction.canonical_angle_deg(), 150.0).classify(QuestionKind::MultiChoice);
        if got != Some(direction) {
            return Err(SimulationError::Misclassified {
                angle: direction.canonical_angle_deg(),
                expected: direction,
                got: got.map_or_else(|| String::from("none"), |d| d.to_string()),
            });
        }
    }
    Ok(samples + SwipeDirection::ALL.len())
}

fn fingerprint(answers: &[Answer]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for answer in answers {
        hasher.write_u32(answer.question_id);
        hasher.write(answer.answer.as_bytes());
        hasher.write_u8(0);
    }
    hasher.finish()
}
