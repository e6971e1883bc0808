use yew::prelude::*;

/// Shown while the recommendation request is in flight.
#[function_component(Loading)]
pub fn loading() -> Html {
    html! {
        <main role="main" class="loading" aria-busy="true" aria-live="polite">
            <div class="loading__compass" aria-hidden="true">{ "\u{1F9ED}" }</div>
            <h2 class="loading__title">{ "Finding Your Perfect Match..." }</h2>
            <p class="loading__body">
                { "Our AI is analyzing your preferences to find the ideal city for you." }
            </p>
        </main>
    }
}
