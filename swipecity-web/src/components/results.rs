use yew::prelude::*;

use crate::components::loading::Loading;
use crate::game::RecommendationState;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub recommendation: RecommendationState,
    #[prop_or_default]
    pub on_retry: Callback<()>,
    #[prop_or_default]
    pub on_restart: Callback<()>,
}

fn emit_on_click(callback: &Callback<()>) -> Callback<MouseEvent> {
    let callback = callback.clone();
    Callback::from(move |_: MouseEvent| callback.emit(()))
}

#[function_component(Results)]
pub fn results(p: &Props) -> Html {
    let on_restart = emit_on_click(&p.on_restart);
    match &p.recommendation {
        RecommendationState::Idle | RecommendationState::Pending => html! { <Loading /> },
        RecommendationState::Failed(message) => {
            let on_retry = emit_on_click(&p.on_retry);
            html! {
                <main role="main" class="results results--error" aria-labelledby="results-title">
                    <h2 id="results-title">{ "Oops! Something Went Wrong" }</h2>
                    <p role="alert" class="results__message">{ message.clone() }</p>
                    <div class="results__actions">
                        <button class="btn btn--primary" onclick={on_retry}>{ "Try Again" }</button>
                        <button class="btn" onclick={on_restart}>{ "Start Over" }</button>
                    </div>
                </main>
            }
        }
        RecommendationState::Ready(found) => html! {
            <main role="main" class="results" aria-labelledby="results-title">
                <h1 id="results-title">{ "Your Perfect Match!" }</h1>
                <p class="results__lead">
                    { "Based on your preferences, we found your ideal city" }
                </p>
                <section class="results__card">
                    <h2 class="results__city">{ found.city.clone() }</h2>
                    <p class="results__country">{ found.country.clone() }</p>
                    <h3>{ "Why This City?" }</h3>
                    <p class="results__explanation">{ found.explanation.clone() }</p>
                </section>
                <div class="results__actions">
                    <button class="btn" onclick={on_restart}>{ "Start Over" }</button>
                </div>
                <p class="results__tip">{ "Tip: Each answer shapes your perfect match!" }</p>
            </main>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Recommendation;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    fn render(recommendation: RecommendationState) -> String {
        let props = Props {
            recommendation,
            on_retry: Callback::noop(),
            on_restart: Callback::noop(),
        };
        block_on(LocalServerRenderer::<Results>::with_props(props).render())
    }

    #[test]
    fn ready_shows_city_and_reasoning() {
        let html = render(RecommendationState::Ready(Recommendation {
            city: String::from("Lisbon"),
            country: String::from("Portugal"),
            explanation: String::from("Hills, trams and sea air."),
        }));
        assert!(html.contains("Your Perfect Match!"));
        assert!(html.contains("Lisbon"));
        assert!(html.contains("Portugal"));
        assert!(html.contains("Hills, trams and sea air."));
        assert!(!html.contains("Try Again"));
    }

    #[test]
    fn failure_offers_retry() {
        let html = render(RecommendationState::Failed(String::from(
            "Failed to generate city recommendation. Please try again.",
        )));
        assert!(html.contains("Oops! Something Went Wrong"));
        assert!(html.contains("Try Again"));
        assert!(html.contains("Start Over"));
    }

    #[test]
    fn pending_falls_back_to_loading() {
        let html = render(RecommendationState::Pending);
        assert!(html.contains("Finding Your Perfect Match..."));
    }
}
