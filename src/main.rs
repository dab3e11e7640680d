use anyhow::{Context, Result};
use birdfetcher::api::{create_skill_router, SkillAppState};
use birdfetcher::config::{self, DEFAULT_CONFIG_PATH};
use birdfetcher::intent::IntentRouter;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "birdfetcher=info,tower_http=debug".into()),
        )
        .init();

    info!("Bird Fetcher starting...");

    let config_path =
        std::env::var("BIRDFETCHER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = config::load_or_default(&config_path)?;
    config.validate()?;

    info!(
        config = %config_path,
        geocoding = %config.geocoding.base_url,
        observations = %config.observations.base_url,
        max_results = config.observations.max_results,
        "Configuration loaded"
    );

    let state = SkillAppState {
        router: Arc::new(IntentRouter::from_config(&config)?),
        body_size_limit_bytes: config.api.body_size_limit_bytes,
    };
    let app = create_skill_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Listening for skill requests");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
