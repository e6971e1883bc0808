use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use swipecity_game::{ErrorBody, RecommendationError};

/// A failed request, rendered as `{"error": ..., "details"?: ...}`.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: RecommendationError,
    /// Internal detail, only shown in development.
    pub details: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(error: RecommendationError, expose_details: bool) -> Self {
        let details = expose_details.then(|| error.to_string());
        Self { error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = ErrorBody::new(self.error.public_message());
        if let Some(details) = self.details {
            body = body.with_details(details);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_hidden_outside_development() {
        let err = ApiError::new(RecommendationError::Upstream { status: 503 }, false);
        assert_eq!(err.details, None);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::new(RecommendationError::Upstream { status: 503 }, true);
        assert_eq!(err.details.as_deref(), Some("upstream model returned HTTP 503"));
    }

    #[test]
    fn rate_limit_keeps_its_status() {
        let response = ApiError::new(RecommendationError::RateLimited, false).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
