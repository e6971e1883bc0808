//! Clients for the model providers behind the proxy.

use std::sync::Arc;

use async_trait::async_trait;
use swipecity_game::RecommendationError;

use crate::config::{Config, Provider};

pub mod gemini;
pub mod openrouter;

pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;

/// A text-completion endpoint.
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Whether a credential is configured; requests are refused without one.
    fn has_credential(&self) -> bool;

    /// Send `prompt` and return the raw text the model produced.
    async fn complete(&self, prompt: &str) -> Result<String, RecommendationError>;
}

/// Map a non-2xx upstream status to the failure reported to the browser.
#[must_use]
pub fn status_error(status: reqwest::StatusCode) -> RecommendationError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        RecommendationError::RateLimited
    } else {
        RecommendationError::Upstream {
            status: status.as_u16(),
        }
    }
}

pub(crate) fn network_error(err: &reqwest::Error) -> RecommendationError {
    RecommendationError::Network(err.to_string())
}

/// Build the client for the configured provider.
#[must_use]
pub fn client_for(config: &Config, http: reqwest::Client) -> Arc<dyn LlmClient> {
    match config.provider {
        Provider::OpenRouter => Arc::new(OpenRouterClient::new(
            http,
            &config.base_url,
            config.api_key.clone(),
            &config.model,
        )),
        Provider::Gemini => Arc::new(GeminiClient::new(
            http,
            &config.base_url,
            config.api_key.clone(),
            &config.model,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert_eq!(
            status_error(reqwest::StatusCode::TOO_MANY_REQUESTS),
            RecommendationError::RateLimited
        );
        assert_eq!(
            status_error(reqwest::StatusCode::SERVICE_UNAVAILABLE),
            RecommendationError::Upstream { status: 503 }
        );
    }

    #[test]
    fn client_follows_configured_provider() {
        let config = Config::from_lookup(|key| match key {
            "SWIPECITY_PROVIDER" => Some(String::from("gemini")),
            "GEMINI_API_KEY" => Some(String::from("key")),
            _ => None,
        })
        .unwrap();
        let client = client_for(&config, reqwest::Client::new());
        assert_eq!(client.provider(), Provider::Gemini);
        assert!(client.has_credential());
    }
}
