//! HTTP routes: recommendation endpoint, health check, optional static files.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use swipecity_game::{ErrorBody, Recommendation, RecommendationError, RecommendationRequest};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::error::ApiError;
use crate::prompt::build_prompt;
use crate::upstream::LlmClient;

pub const RECOMMEND_PATH: &str = "/api/recommend";
/// Path the first deployment served the proxy on.
pub const LEGACY_RECOMMEND_PATH: &str = "/api/gemini";

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn LlmClient>,
    pub expose_details: bool,
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method not allowed. Use POST.")),
    )
}

pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<Recommendation>, ApiError> {
    let fail = |error: RecommendationError| ApiError::new(error, state.expose_details);

    if !state.client.has_credential() {
        log::error!(
            "{} credential is not configured",
            state.client.provider()
        );
        return Err(fail(RecommendationError::MissingCredential));
    }

    let request = payload
        .map(|Json(request)| request)
        .map_err(|rejection| fail(RecommendationError::InvalidRequest(rejection.body_text())))?;
    request.validate().map_err(fail)?;

    log::info!(
        "Processing {} answers via {}",
        request.answers.len(),
        state.client.provider()
    );
    let prompt = build_prompt(&request.answers);
    let text = state.client.complete(&prompt).await.map_err(|err| {
        log::error!("Upstream request failed: {err}");
        fail(err)
    })?;
    let recommendation = swipecity_game::parse_recommendation(&text).map_err(|err| {
        log::error!("Unusable model reply ({err}): {text}");
        fail(err)
    })?;
    log::info!(
        "Recommended {}, {}",
        recommendation.city,
        recommendation.country
    );
    Ok(Json(recommendation))
}

/// Build the application router.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let endpoint = || post(recommend).fallback(method_not_allowed);
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route(RECOMMEND_PATH, endpoint())
        .route(LEGACY_RECOMMEND_PATH, endpoint())
        .layer(cors)
        .with_state(state);

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}
