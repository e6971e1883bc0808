use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub total_questions: usize,
    #[prop_or_default]
    pub on_start: Callback<()>,
}

#[function_component(Intro)]
pub fn intro(p: &Props) -> Html {
    let on_start = p.on_start.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_start.emit(()));
    html! {
        <main role="main" class="intro" aria-labelledby="intro-title">
            <h1 id="intro-title" class="intro__title">{ "Swipe City" }</h1>
            <p class="intro__subtitle">
                { format!("Find your perfect city in {} swipes", p.total_questions) }
            </p>
            <button class="btn btn--primary intro__start" {onclick}>{ "START" }</button>
        </main>
    }
}
