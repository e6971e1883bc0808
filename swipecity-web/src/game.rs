//! Web-specific game engine implementation
//!
//! This module provides web-specific implementations of the swipecity-game traits
//! and re-exports the core game logic types.

// Re-export all types from swipecity-game
pub use swipecity_game::*;

/// Loader serving the question bank compiled into the bundle
#[derive(Debug, Clone, Copy, Default)]
pub struct WebQuestionLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("Question bank error: {0}")]
    Bank(#[from] QuestionBankError),
}

impl QuestionLoader for WebQuestionLoader {
    type Error = WebDataError;

    fn load_questions(&self) -> Result<QuestionBank, Self::Error> {
        Ok(QuestionBank::from_json(BUNDLED_QUESTIONS_JSON)?)
    }
}

/// Web-specific game storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebGameStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn storage() -> Result<web_sys::Storage, WebStorageError> {
    #[cfg(target_arch = "wasm32")]
    {
        crate::dom::local_storage().map_err(|err| storage_error(&err))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Err(WebStorageError::Storage(String::from(
            "localStorage is only available in the browser",
        )))
    }
}

fn storage_error(err: &wasm_bindgen::JsValue) -> WebStorageError {
    WebStorageError::Storage(crate::dom::js_error_message(err))
}

impl GameStorage for WebGameStorage {
    type Error = WebStorageError;

    fn save_game(&self, key: &str, snapshot: &SavedGame) -> Result<(), Self::Error> {
        let json = serde_json::to_string(snapshot)?;
        storage()?
            .set_item(key, &json)
            .map_err(|err| storage_error(&err))
    }

    fn load_game(&self, key: &str) -> Result<Option<SavedGame>, Self::Error> {
        let raw = storage()?
            .get_item(key)
            .map_err(|err| storage_error(&err))?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(WebStorageError::from)
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        storage()?
            .remove_item(key)
            .map_err(|err| storage_error(&err))
    }

    fn now_ms(&self) -> u64 {
        #[cfg(target_arch = "wasm32")]
        {
            swipecity_game::numbers::f64_millis_to_u64(crate::dom::now_ms())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            0
        }
    }
}

/// Create a web-compatible game engine with `WebQuestionLoader` and `WebGameStorage`
#[must_use]
pub const fn create_web_game_engine() -> GameEngine<WebQuestionLoader, WebGameStorage> {
    GameEngine::new(WebQuestionLoader, WebGameStorage)
}
