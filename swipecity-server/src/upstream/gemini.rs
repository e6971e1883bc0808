use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swipecity_game::RecommendationError;

use super::{LlmClient, network_error, status_error};
use crate::config::Provider;

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Concatenated text parts of the first candidate.
///
/// # Errors
///
/// [`RecommendationError::Malformed`] for an unexpected body and
/// [`RecommendationError::EmptyResponse`] when there is no text.
pub fn extract_text(body: &str) -> Result<String, RecommendationError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| RecommendationError::Malformed(err.to_string()))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(RecommendationError::EmptyResponse);
    }
    Ok(text)
}

impl GeminiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{model}:generateContent",
                base_url.trim_end_matches('/')
            ),
            api_key,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecommendationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecommendationError::MissingCredential)?;
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|err| network_error(&err))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| network_error(&err))?;
        if !status.is_success() {
            log::error!("Gemini returned {status}: {body}");
            return Err(status_error(status));
        }
        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_joined() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"```json\n"},{"text":"{}\n```"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn no_candidates_is_empty() {
        assert_eq!(
            extract_text(r#"{"candidates":[]}"#),
            Err(RecommendationError::EmptyResponse)
        );
        assert_eq!(extract_text("{}"), Err(RecommendationError::EmptyResponse));
    }

    #[test]
    fn model_is_part_of_the_path() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://example.test/v1beta",
            Some(String::from("k")),
            "gemini-1.5-flash",
        );
        assert_eq!(
            client.endpoint,
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
