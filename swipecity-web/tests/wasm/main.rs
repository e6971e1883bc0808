#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use yew::Renderer;

use swipecity_web::app::App;
use swipecity_web::dom;
use swipecity_web::game::constants::STORAGE_KEY;
use swipecity_web::game::{GamePhase, GameStorage, SavedGame, WebGameStorage};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

#[wasm_bindgen_test]
fn local_storage_round_trips_a_snapshot() {
    let storage = WebGameStorage;
    let snapshot = SavedGame {
        current_question_index: 3,
        answers: Vec::new(),
        game_phase: GamePhase::Questions,
        timestamp: storage.now_ms(),
    };
    storage.save_game(STORAGE_KEY, &snapshot).expect("save");
    let loaded = storage.load_game(STORAGE_KEY).expect("load");
    assert_eq!(loaded, Some(snapshot));
    storage.delete_save(STORAGE_KEY).expect("delete");
    assert_eq!(storage.load_game(STORAGE_KEY).expect("load"), None);
}

#[wasm_bindgen_test]
async fn app_boots_to_intro() {
    let _ = WebGameStorage.delete_save(STORAGE_KEY);
    Renderer::<App>::with_root(ensure_app_root()).render();
    let _ = dom::sleep_ms(0).await;
    let doc = dom::document().expect("document");
    let title = doc
        .get_element_by_id("intro-title")
        .expect("intro title rendered");
    assert_eq!(title.text_content().unwrap_or_default(), "Swipe City");
}
