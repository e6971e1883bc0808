//! Contract with the Recommendation Service.
//!
//! Shared by the browser client and the proxy so both sides agree on the
//! wire shapes and on how an upstream reply is judged usable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::state::Answer;

/// A city match. All three fields are required and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub city: String,
    pub country: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl RecommendationRequest {
    #[must_use]
    pub fn new(answers: &[Answer]) -> Self {
        Self {
            answers: answers.to_vec(),
        }
    }

    /// # Errors
    ///
    /// Returns [`RecommendationError::InvalidRequest`] when there is nothing to recommend from.
    pub fn validate(&self) -> Result<(), RecommendationError> {
        if self.answers.is_empty() {
            return Err(RecommendationError::InvalidRequest(String::from(
                "answers must be a non-empty array",
            )));
        }
        Ok(())
    }
}

/// JSON body of every non-2xx proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendationError {
    #[error("recommendation service credential is not configured")]
    MissingCredential,
    #[error("upstream model is rate limited")]
    RateLimited,
    #[error("upstream model returned HTTP {status}")]
    Upstream { status: u16 },
    #[error("upstream model returned no content")]
    EmptyResponse,
    #[error("invalid AI response format: {0}")]
    Malformed(String),
    #[error("missing required field `{0}` in response")]
    MissingField(&'static str),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RecommendationError {
    /// HTTP status the proxy answers with for this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::RateLimited => 429,
            Self::MissingCredential => 500,
            Self::Upstream { .. }
            | Self::EmptyResponse
            | Self::Malformed(_)
            | Self::MissingField(_)
            | Self::Network(_) => 502,
        }
    }

    /// Message safe to show to the player.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid request. Please provide an array of answers.",
            Self::MissingCredential => "API configuration error. Please contact support.",
            Self::RateLimited => {
                "The recommendation service is busy right now. Please try again in a moment."
            }
            Self::Upstream { .. }
            | Self::EmptyResponse
            | Self::Malformed(_)
            | Self::MissingField(_)
            | Self::Network(_) => "Failed to generate city recommendation. Please try again.",
        }
    }
}

/// Client-side view of the outstanding request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecommendationState {
    #[default]
    Idle,
    Pending,
    Ready(Recommendation),
    Failed(String),
}

impl RecommendationState {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the request has resolved, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    #[must_use]
    pub const fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Ready(recommendation) => Some(recommendation),
            _ => None,
        }
    }
}

static FENCE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"```(?:json)?[ \t]*\r?\n?").ok());

/// Remove markdown code fences a model may wrap its JSON in.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    FENCE.as_ref().map_or_else(
        || trimmed.trim_matches('`').trim().to_string(),
        |fence| fence.replace_all(trimmed, "").trim().to_string(),
    )
}

#[derive(Deserialize)]
struct RawRecommendation {
    city: Option<serde_json::Value>,
    country: Option<serde_json::Value>,
    explanation: Option<serde_json::Value>,
}

fn required(
    value: Option<serde_json::Value>,
    field: &'static str,
) -> Result<String, RecommendationError> {
    match value {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(RecommendationError::MissingField(field)),
    }
}

/// Parse an upstream model reply into a [`Recommendation`].
///
/// # Errors
///
/// Fails on empty text, on anything that is not a JSON object after fence
/// stripping, and when any field is missing, blank or not a string.
pub fn parse_recommendation(text: &str) -> Result<Recommendation, RecommendationError> {
    let json = strip_code_fences(text);
    if json.is_empty() {
        return Err(RecommendationError::EmptyResponse);
    }
    let raw: RawRecommendation = serde_json::from_str(&json)
        .map_err(|err| RecommendationError::Malformed(err.to_string()))?;
    Ok(Recommendation {
        city: required(raw.city, "city")?,
        country: required(raw.country, "country")?,
        explanation: required(raw.explanation, "explanation")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_and_bare_fences() {
        let fenced = "```json\n{\"city\":\"Lisbon\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"city\":\"Lisbon\"}");
        let bare = "  ```\n{\"city\":\"Porto\"}```  ";
        assert_eq!(strip_code_fences(bare), "{\"city\":\"Porto\"}");
        assert_eq!(strip_code_fences(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\n  \"city\": \"Valencia\",\n  \"country\": \"Spain\",\n  \"explanation\": \"Sun and paella.\"\n}\n```";
        let recommendation = parse_recommendation(reply).unwrap();
        assert_eq!(recommendation.city, "Valencia");
        assert_eq!(recommendation.country, "Spain");
        assert_eq!(recommendation.explanation, "Sun and paella.");
    }

    #[test]
    fn missing_or_blank_fields_fail_explicitly() {
        assert_eq!(
            parse_recommendation(r#"{"city":"Oslo","country":"Norway"}"#),
            Err(RecommendationError::MissingField("explanation"))
        );
        assert_eq!(
            parse_recommendation(r#"{"city":"  ","country":"Norway","explanation":"x"}"#),
            Err(RecommendationError::MissingField("city"))
        );
        assert_eq!(
            parse_recommendation(r#"{"city":"Oslo","country":7,"explanation":"x"}"#),
            Err(RecommendationError::MissingField("country"))
        );
    }

    #[test]
    fn non_json_and_empty_replies_are_rejected() {
        assert!(matches!(
            parse_recommendation("I think you'd love Kyoto!"),
            Err(RecommendationError::Malformed(_))
        ));
        assert_eq!(
            parse_recommendation("```json\n```"),
            Err(RecommendationError::EmptyResponse)
        );
    }

    #[test]
    fn error_statuses_map_to_http() {
        assert_eq!(RecommendationError::RateLimited.status_code(), 429);
        assert_eq!(RecommendationError::MissingCredential.status_code(), 500);
        assert_eq!(RecommendationError::Upstream { status: 503 }.status_code(), 502);
        assert_eq!(
            RecommendationError::InvalidRequest(String::new()).status_code(),
            400
        );
    }

    #[test]
    fn error_body_omits_absent_details() {
        let body = serde_json::to_string(&ErrorBody::new("nope")).unwrap();
        assert_eq!(body, r#"{"error":"nope"}"#);
        let detailed = ErrorBody::new("nope").with_details("boom");
        assert_eq!(detailed.details.as_deref(), Some("boom"));
    }

    #[test]
    fn empty_request_is_invalid() {
        assert!(RecommendationRequest::new(&[]).validate().is_err());
        let request: RecommendationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.answers.is_empty());
    }
}
