use yew::prelude::*;

use super::state::{AppAction, AppModel};
use crate::components::intro::Intro;
use crate::components::loading::Loading;
use crate::components::results::Results;
use crate::components::round_break::RoundBreak;
use crate::components::swipe_card::SwipeCard;
use crate::game::{GamePhase, GameStorage, SwipeConfig};

fn send(dispatch: &Callback<AppAction>, action: AppAction) -> Callback<()> {
    let dispatch = dispatch.clone();
    Callback::from(move |()| dispatch.emit(action.clone()))
}

/// Render the screen for the model's current phase.
pub fn render_app<S: GameStorage + Clone>(
    model: &AppModel<S>,
    dispatch: &Callback<AppAction>,
) -> Html {
    let Some(session) = model.session() else {
        return html! {
            <main role="main" class="error">
                <h1>{ "Swipe City is unavailable" }</h1>
                <p>{ model.boot_error().unwrap_or_default().to_string() }</p>
            </main>
        };
    };

    match session.phase() {
        GamePhase::Intro => html! {
            <Intro
                total_questions={session.bank().len()}
                on_start={send(dispatch, AppAction::Start)} />
        },
        GamePhase::RoundBreak => {
            let on_elapsed =
                dispatch.reform(|answered: usize| AppAction::RoundBreakElapsed { answered });
            html! {
                <RoundBreak
                    round={session.round_number()}
                    total_rounds={session.total_rounds()}
                    answered={session.state().answers().len()}
                    auto_advance_ms={session.policy().round_break.delay_ms()}
                    on_continue={send(dispatch, AppAction::ContinueRound)}
                    {on_elapsed} />
            }
        }
        GamePhase::Questions => {
            let Some(question) = session.current_question() else {
                return html! { <Loading /> };
            };
            let (position, total) = session.progress();
            html! {
                <SwipeCard
                    key={question.id}
                    question={question.clone()}
                    config={SwipeConfig::from_policy(session.policy())}
                    commit_delay_ms={session.policy().commit_delay_ms}
                    {position}
                    {total}
                    on_commit={dispatch.reform(AppAction::Answer)} />
            }
        }
        GamePhase::Loading => html! { <Loading /> },
        GamePhase::Results => html! {
            <Results
                recommendation={model.recommendation().clone()}
                on_retry={send(dispatch, AppAction::RequestRecommendation)}
                on_restart={send(dispatch, AppAction::Restart)} />
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, MemoryStorage, Recommendation, SwipeDirection, WebQuestionLoader};
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[derive(Properties, PartialEq, Clone)]
    struct HarnessProps {
        actions: Vec<AppAction>,
    }

    #[function_component(Harness)]
    fn harness(p: &HarnessProps) -> Html {
        let engine = GameEngine::new(WebQuestionLoader, MemoryStorage::new());
        let model = p
            .actions
            .iter()
            .cloned()
            .fold(AppModel::boot(&engine), AppModel::apply);
        render_app(&model, &Callback::noop())
    }

    fn render(actions: Vec<AppAction>) -> String {
        block_on(LocalServerRenderer::<Harness>::with_props(HarnessProps { actions }).render())
    }

    fn first_answer() -> AppAction {
        let engine = GameEngine::new(WebQuestionLoader, MemoryStorage::new());
        let session = engine.open_session().unwrap();
        let question = session.bank().get(0).unwrap().clone();
        let commit = session
            .gesture()
            .select(&question, SwipeDirection::Left)
            .unwrap();
        AppAction::Answer(commit)
    }

    #[test]
    fn fresh_game_opens_on_intro() {
        assert!(render(vec![]).contains("Find your perfect city in 20 swipes"));
    }

    #[test]
    fn start_shows_round_one() {
        assert!(render(vec![AppAction::Start]).contains("Round 1"));
    }

    #[test]
    fn continuing_shows_the_first_card() {
        let html = render(vec![AppAction::Start, AppAction::ContinueRound]);
        assert!(html.contains("1 / 20"));
        assert!(html.contains("swipe-card"));
    }

    #[test]
    fn answering_advances_the_counter() {
        let html = render(vec![
            AppAction::Start,
            AppAction::ContinueRound,
            first_answer(),
        ]);
        assert!(html.contains("2 / 20"));
    }

    #[test]
    fn results_render_only_after_a_reply() {
        let html = render(vec![AppAction::RecommendationResolved {
            request_id: 0,
            result: Ok(Recommendation {
                city: String::from("Oslo"),
                country: String::from("Norway"),
                explanation: String::from("Fjords."),
            }),
        }]);
        assert!(!html.contains("Oslo"));
        assert!(html.contains("Swipe City"));
    }
}
