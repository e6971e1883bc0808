//! Swipe City recommendation proxy.
//!
//! Accepts the player's answers, asks an upstream model for a city match and
//! returns `{city, country, explanation}`. The provider credential never
//! leaves this process.

use std::time::Duration;

use anyhow::Context;

pub mod config;
pub mod error;
pub mod prompt;
pub mod routes;
pub mod upstream;

pub use config::{Config, Provider};
pub use routes::{AppState, router};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Router wired to the provider named in `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn app(config: &Config) -> anyhow::Result<axum::Router> {
    let http = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .context("building upstream HTTP client")?;
    let state = AppState {
        client: upstream::client_for(config, http),
        expose_details: config.development,
    };
    Ok(router(state, config.static_dir.clone()))
}

/// Serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let app = app(&config)?;
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!(
        "Listening on {addr} (provider {}, model {})",
        config.provider,
        config.model
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
