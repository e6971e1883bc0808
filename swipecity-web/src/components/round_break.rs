use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub round: usize,
    pub total_rounds: usize,
    /// Answers recorded when the break opened; echoed back by `on_elapsed`.
    pub answered: usize,
    /// `None` waits for the player.
    #[prop_or_default]
    pub auto_advance_ms: Option<u32>,
    #[prop_or_default]
    pub on_continue: Callback<()>,
    #[prop_or_default]
    pub on_elapsed: Callback<usize>,
}

#[function_component(RoundBreak)]
pub fn round_break(p: &Props) -> Html {
    {
        let on_elapsed = p.on_elapsed.clone();
        use_effect_with((p.answered, p.auto_advance_ms), move |&(answered, delay)| {
            if let Some(delay) = delay {
                #[cfg(target_arch = "wasm32")]
                crate::dom::schedule(delay, move || on_elapsed.emit(answered));
                #[cfg(not(target_arch = "wasm32"))]
                let _ = (delay, answered, on_elapsed);
            }
        });
    }

    let on_continue = p.on_continue.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_continue.emit(()));
    html! {
        <main role="main" class="round-break" aria-labelledby="round-title">
            <p id="round-title" class="round-break__badge">
                { format!("Round {}", p.round) }
                <span class="sr-only">{ format!(" of {}", p.total_rounds) }</span>
            </p>
            <p class="round-break__banner">{ "GET READY TO SWIPE" }</p>
            <div class="round-break__compass" aria-hidden="true">{ "\u{1F9ED}" }</div>
            <button class="btn btn--primary" {onclick}>{ "Continue" }</button>
        </main>
    }
}
