use std::rc::Rc;

use yew::Reducible;

use crate::game::{
    Answer, GameEngine, GamePhase, GameSession, GameStorage, QuestionLoader, Recommendation,
    RecommendationError, RecommendationState, SwipeCommit,
};

/// Everything the page renders from, updated only through [`AppAction`]s.
#[derive(Debug, Clone)]
pub struct AppModel<S: GameStorage> {
    session: Result<GameSession<S>, String>,
    recommendation: RecommendationState,
    /// Bumped for every request so late replies from abandoned requests are dropped.
    request_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Start,
    Answer(SwipeCommit),
    ContinueRound,
    /// The auto-advance timer fired for the break reached after `answered` answers.
    RoundBreakElapsed { answered: usize },
    RequestRecommendation,
    RecommendationResolved {
        request_id: u32,
        result: Result<Recommendation, RecommendationError>,
    },
    Restart,
}

impl<S: GameStorage + Clone> AppModel<S> {
    pub fn boot<L: QuestionLoader>(engine: &GameEngine<L, S>) -> Self {
        let session = engine.open_session().map_err(|err| {
            log::error!("Failed to load the question bank: {err}");
            err.to_string()
        });
        Self::from_session(session)
    }

    #[must_use]
    pub fn from_session(session: Result<GameSession<S>, String>) -> Self {
        Self {
            session,
            recommendation: RecommendationState::Idle,
            request_id: 0,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession<S>> {
        self.session.as_ref().ok()
    }

    #[must_use]
    pub fn boot_error(&self) -> Option<&str> {
        self.session.as_ref().err().map(String::as_str)
    }

    #[must_use]
    pub const fn recommendation(&self) -> &RecommendationState {
        &self.recommendation
    }

    #[must_use]
    pub const fn request_id(&self) -> u32 {
        self.request_id
    }

    /// Answers to send while a request is pending.
    #[must_use]
    pub fn pending_request(&self) -> Option<(u32, Vec<Answer>)> {
        let session = self.session()?;
        self.recommendation
            .is_pending()
            .then(|| (self.request_id, session.state().answers().to_vec()))
    }

    /// Every question is answered but no request has been made for this playthrough.
    #[must_use]
    pub fn needs_recommendation(&self) -> bool {
        self.session()
            .is_some_and(|session| session.phase().is_complete())
            && self.recommendation == RecommendationState::Idle
    }

    /// Apply an action, returning the model unchanged when it does not fit the current phase.
    #[must_use]
    pub fn apply(mut self, action: AppAction) -> Self {
        let Ok(session) = self.session.as_mut() else {
            return self;
        };
        match action {
            AppAction::Start => {
                let _ = session.start();
            }
            AppAction::Answer(commit) => {
                let _ = session.apply_commit(&commit);
            }
            AppAction::ContinueRound => {
                let _ = session.advance_past_round_break();
            }
            AppAction::RoundBreakElapsed { answered } => {
                if session.phase() == GamePhase::RoundBreak
                    && session.state().answers().len() == answered
                {
                    let _ = session.advance_past_round_break();
                }
            }
            AppAction::RequestRecommendation => {
                let can_request = session.phase().is_complete()
                    && matches!(
                        self.recommendation,
                        RecommendationState::Idle | RecommendationState::Failed(_)
                    );
                if can_request {
                    self.request_id = self.request_id.wrapping_add(1);
                    self.recommendation = RecommendationState::Pending;
                }
            }
            AppAction::RecommendationResolved { request_id, result } => {
                if request_id != self.request_id || !self.recommendation.is_pending() {
                    log::debug!("Dropping stale recommendation reply {request_id}");
                    return self;
                }
                self.recommendation = match result {
                    Ok(recommendation) => RecommendationState::Ready(recommendation),
                    Err(err) => {
                        log::error!("Recommendation failed: {err}");
                        RecommendationState::Failed(err.public_message().to_string())
                    }
                };
                if session.phase() == GamePhase::Loading {
                    let _ = session.complete_loading();
                }
            }
            AppAction::Restart => {
                session.restart();
                self.recommendation = RecommendationState::Idle;
                self.request_id = self.request_id.wrapping_add(1);
            }
        }
        self
    }
}

impl<S: GameStorage + Clone> Reducible for AppModel<S> {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new((*self).clone().apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MemoryStorage, SwipeDirection, WebQuestionLoader};

    fn model() -> AppModel<MemoryStorage> {
        AppModel::boot(&GameEngine::new(WebQuestionLoader, MemoryStorage::new()))
    }

    fn answer_all(mut model: AppModel<MemoryStorage>) -> AppModel<MemoryStorage> {
        model = model.apply(AppAction::Start);
        loop {
            let session = model.session().unwrap();
            match session.phase() {
                GamePhase::RoundBreak => model = model.apply(AppAction::ContinueRound),
                GamePhase::Questions => {
                    let question = session.current_question().unwrap().clone();
                    let commit = session
                        .gesture()
                        .select(&question, SwipeDirection::Right)
                        .unwrap();
                    model = model.apply(AppAction::Answer(commit));
                }
                _ => return model,
            }
        }
    }

    #[test]
    fn playthrough_requests_then_shows_results() {
        let model = answer_all(model());
        assert_eq!(model.session().unwrap().phase(), GamePhase::Loading);
        assert!(model.needs_recommendation());

        let model = model.apply(AppAction::RequestRecommendation);
        let (request_id, answers) = model.pending_request().unwrap();
        assert_eq!(answers.len(), 20);

        let model = model.apply(AppAction::RecommendationResolved {
            request_id,
            result: Ok(Recommendation {
                city: String::from("Lisbon"),
                country: String::from("Portugal"),
                explanation: String::from("Walkable and sunny."),
            }),
        });
        assert_eq!(model.session().unwrap().phase(), GamePhase::Results);
        assert_eq!(model.recommendation().recommendation().unwrap().city, "Lisbon");
        assert!(!model.needs_recommendation());
    }

    #[test]
    fn failure_keeps_answers_and_allows_retry() {
        let model = answer_all(model()).apply(AppAction::RequestRecommendation);
        let request_id = model.request_id();
        let model = model.apply(AppAction::RecommendationResolved {
            request_id,
            result: Err(RecommendationError::RateLimited),
        });
        assert_eq!(model.session().unwrap().phase(), GamePhase::Results);
        assert!(matches!(model.recommendation(), RecommendationState::Failed(_)));
        assert_eq!(model.session().unwrap().state().answers().len(), 20);

        let retried = model.apply(AppAction::RequestRecommendation);
        assert!(retried.recommendation().is_pending());
        assert_eq!(retried.request_id(), request_id + 1);
    }

    #[test]
    fn stale_replies_are_ignored_after_restart() {
        let model = answer_all(model()).apply(AppAction::RequestRecommendation);
        let request_id = model.request_id();
        let model = model.apply(AppAction::Restart);
        let model = model.apply(AppAction::RecommendationResolved {
            request_id,
            result: Err(RecommendationError::EmptyResponse),
        });
        assert_eq!(model.session().unwrap().phase(), GamePhase::Intro);
        assert_eq!(model.recommendation(), &RecommendationState::Idle);
    }

    #[test]
    fn late_round_break_timer_does_not_skip_ahead() {
        let model = model().apply(AppAction::Start);
        assert_eq!(model.session().unwrap().phase(), GamePhase::RoundBreak);
        let model = model.apply(AppAction::ContinueRound);
        let model = model.apply(AppAction::RoundBreakElapsed { answered: 0 });
        assert_eq!(model.session().unwrap().phase(), GamePhase::Questions);

        let model = model.apply(AppAction::RoundBreakElapsed { answered: 0 });
        assert_eq!(model.session().unwrap().phase(), GamePhase::Questions);
    }

    #[test]
    fn request_is_refused_mid_game() {
        let model = model().apply(AppAction::RequestRecommendation);
        assert_eq!(model.recommendation(), &RecommendationState::Idle);
        assert!(model.pending_request().is_none());
    }
}
