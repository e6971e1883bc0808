//! Configuration from environment variables.

use std::env;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8787;

/// Upstream model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenRouter,
    Gemini,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    #[must_use]
    pub const fn credential_var(self) -> &'static str {
        match self {
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenRouter => "openai/gpt-oss-20b:free",
            Self::Gemini => "gemini-1.5-flash",
        }
    }

    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider `{0}` (expected `openrouter` or `gemini`)")]
pub struct UnknownProvider(String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Self::OpenRouter),
            "gemini" => Ok(Self::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub provider: Provider,
    /// `None` when the provider's key variable is unset or blank; requests then fail with 500.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Include upstream error details in response bodies.
    pub development: bool,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SWIPECITY_PROVIDER` names an unknown provider.
    pub fn from_env() -> Result<Self, UnknownProvider> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `SWIPECITY_PROVIDER` names an unknown provider.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UnknownProvider> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                log::warn!("Invalid PORT value `{raw}`: {err}; using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        let provider = var("SWIPECITY_PROVIDER")
            .map(|raw| raw.parse::<Provider>())
            .transpose()?
            .unwrap_or_default();
        let api_key = var(provider.credential_var());
        if api_key.is_none() {
            log::warn!(
                "{} is not configured; recommendation requests will fail",
                provider.credential_var()
            );
        }

        Ok(Self {
            port,
            provider,
            api_key,
            model: var("SWIPECITY_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            base_url: var("SWIPECITY_UPSTREAM_URL")
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            development: var("SWIPECITY_ENV").is_some_and(|env| env == "development"),
            static_dir: var("SWIPECITY_STATIC_DIR").map(PathBuf::from),
        })
    }

    /// Socket address to bind, on all interfaces.
    #[must_use]
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
