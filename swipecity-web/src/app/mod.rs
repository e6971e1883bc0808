#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

pub mod state;
pub mod view;

pub use state::{AppAction, AppModel};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    use crate::game::create_web_game_engine;
    use crate::recommend::{RECOMMEND_ENDPOINT, fetch_recommendation};

    let model = use_reducer(|| AppModel::boot(&create_web_game_engine()));

    {
        let dispatcher = model.dispatcher();
        use_effect_with(model.needs_recommendation(), move |needs| {
            if *needs {
                dispatcher.dispatch(AppAction::RequestRecommendation);
            }
        });
    }

    {
        let dispatcher = model.dispatcher();
        let pending = model.pending_request();
        use_effect_with(model.request_id(), move |_| {
            if let Some((request_id, answers)) = pending {
                log::info!("Requesting a recommendation for {} answers", answers.len());
                wasm_bindgen_futures::spawn_local(async move {
                    let result = fetch_recommendation(RECOMMEND_ENDPOINT, &answers).await;
                    dispatcher.dispatch(AppAction::RecommendationResolved { request_id, result });
                });
            }
        });
    }

    let dispatch = {
        let dispatcher = model.dispatcher();
        Callback::from(move |action: AppAction| dispatcher.dispatch(action))
    };
    view::render_app(&*model, &dispatch)
}
