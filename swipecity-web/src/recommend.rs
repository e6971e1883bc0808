//! Browser client for the Recommendation Service.

use crate::game::{Answer, ErrorBody, Recommendation, RecommendationError, RecommendationRequest};

/// Path the proxy serves recommendations on, relative to the page origin.
pub const RECOMMEND_ENDPOINT: &str = "/api/recommend";

/// Turn an HTTP status and body into a recommendation or a typed failure.
///
/// # Errors
///
/// Returns the failure the proxy reported, or [`RecommendationError::Malformed`]
/// / [`RecommendationError::MissingField`] when a 2xx body is unusable.
pub fn interpret_response(status: u16, body: &str) -> Result<Recommendation, RecommendationError> {
    if (200..300).contains(&status) {
        return swipecity_game::parse_recommendation(body);
    }
    let reason = serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.error)
        .unwrap_or_default();
    log::debug!("Recommendation request failed with HTTP {status}: {reason}");
    Err(match status {
        400 => RecommendationError::InvalidRequest(reason),
        429 => RecommendationError::RateLimited,
        status => RecommendationError::Upstream { status },
    })
}

/// Request a recommendation for `answers` from the proxy at `endpoint`.
///
/// # Errors
///
/// Returns [`RecommendationError::Network`] when the request cannot be made,
/// otherwise whatever [`interpret_response`] decides.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn fetch_recommendation(
    endpoint: &str,
    answers: &[Answer],
) -> Result<Recommendation, RecommendationError> {
    let request = RecommendationRequest::new(answers);
    request.validate()?;
    let body = serde_json::to_string(&request)
        .map_err(|err| RecommendationError::InvalidRequest(err.to_string()))?;

    #[cfg(target_arch = "wasm32")]
    {
        use crate::dom::{js_error_message, post_json, response_text};

        let response = post_json(endpoint, &body)
            .await
            .map_err(|err| RecommendationError::Network(js_error_message(&err)))?;
        let text = response_text(&response)
            .await
            .map_err(|err| RecommendationError::Network(js_error_message(&err)))?;
        interpret_response(response.status(), &text)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (endpoint, body);
        Err(RecommendationError::Network(String::from(
            "fetch is only available in the browser",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_validated() {
        let ok = interpret_response(
            200,
            r#"{"city":"Montreal","country":"Canada","explanation":"Snow and bagels."}"#,
        )
        .unwrap();
        assert_eq!(ok.city, "Montreal");
        assert_eq!(
            interpret_response(200, r#"{"city":"Montreal","country":"Canada"}"#),
            Err(RecommendationError::MissingField("explanation"))
        );
    }

    #[test]
    fn error_statuses_map_to_variants() {
        assert_eq!(
            interpret_response(429, r#"{"error":"busy"}"#),
            Err(RecommendationError::RateLimited)
        );
        assert_eq!(
            interpret_response(400, r#"{"error":"Invalid request."}"#),
            Err(RecommendationError::InvalidRequest(String::from(
                "Invalid request."
            )))
        );
        assert_eq!(
            interpret_response(502, "<html>bad gateway</html>"),
            Err(RecommendationError::Upstream { status: 502 })
        );
    }

    #[test]
    fn empty_answers_never_leave_the_client() {
        let result = futures::executor::block_on(fetch_recommendation(RECOMMEND_ENDPOINT, &[]));
        assert!(matches!(result, Err(RecommendationError::InvalidRequest(_))));
    }
}
