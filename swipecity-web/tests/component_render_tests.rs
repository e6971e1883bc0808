use futures::executor::block_on;
use swipecity_web::components::intro::{self, Intro};
use swipecity_web::components::results::{self, Results};
use swipecity_web::components::round_break::{self, RoundBreak};
use swipecity_web::components::swipe_card::{self, SwipeCard};
use swipecity_web::game::{
    BUNDLED_QUESTIONS_JSON, QuestionBank, Recommendation, RecommendationState, SwipeConfig,
};
use yew::{Callback, LocalServerRenderer};

#[test]
fn intro_renders_start_button() {
    let props = intro::Props {
        total_questions: 12,
        on_start: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<Intro>::with_props(props).render());
    assert!(html.contains("in 12 swipes"));
    assert!(html.contains("<button"));
}

#[test]
fn manual_round_break_still_offers_continue() {
    let props = round_break::Props {
        round: 2,
        total_rounds: 4,
        answered: 5,
        auto_advance_ms: None,
        on_continue: Callback::noop(),
        on_elapsed: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<RoundBreak>::with_props(props).render());
    assert!(html.contains("Round 2"));
    assert!(html.contains("Continue"));
}

#[test]
fn every_bundled_question_renders_as_a_card() {
    let bank = QuestionBank::from_json(BUNDLED_QUESTIONS_JSON).expect("bank parses");
    for (index, question) in bank.iter().enumerate() {
        let expected = question.kind.directions().len();
        let props = swipe_card::Props {
            question: question.clone(),
            config: SwipeConfig::default(),
            commit_delay_ms: 300,
            position: index + 1,
            total: bank.len(),
            on_commit: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<SwipeCard>::with_props(props).render());
        assert_eq!(
            html.matches("swipe-hint__label").count(),
            expected,
            "question {} should show one hint per direction",
            question.id
        );
    }
}

#[test]
fn results_escape_model_text() {
    let props = results::Props {
        recommendation: RecommendationState::Ready(Recommendation {
            city: String::from("<script>Paris</script>"),
            country: String::from("France"),
            explanation: String::from("Bread."),
        }),
        on_retry: Callback::noop(),
        on_restart: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<Results>::with_props(props).render());
    assert!(!html.contains("<script>"));
    assert!(html.contains("France"));
}
