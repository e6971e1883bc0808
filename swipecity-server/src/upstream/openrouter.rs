use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swipecity_game::RecommendationError;

use super::{LlmClient, network_error, status_error};
use crate::config::Provider;

const APP_TITLE: &str = "Swipe City";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

/// OpenRouter chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Text of the first choice.
///
/// # Errors
///
/// [`RecommendationError::Malformed`] for an unexpected body and
/// [`RecommendationError::EmptyResponse`] when the first choice has no text.
pub fn extract_content(body: &str) -> Result<String, RecommendationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|err| RecommendationError::Malformed(err.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(RecommendationError::EmptyResponse)
}

impl OpenRouterClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    fn provider(&self) -> Provider {
        Provider::OpenRouter
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecommendationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecommendationError::MissingCredential)?;
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|err| network_error(&err))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| network_error(&err))?;
        if !status.is_success() {
            log::error!("OpenRouter returned {status}: {body}");
            return Err(status_error(status));
        }
        extract_content(&body)
    }
}
