// Main entry point for the interactions server

use anyhow::{Context, Result};
use interactions_core::{
    server::{build_app, build_state},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,interactions_core=debug,interactions=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting interactions server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(issuer = %config.issuer, "Configuration loaded");

    // Build application
    let state = build_state(&config).context("Failed to build interaction resolver")?;
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Authorization endpoint: http://localhost:{}/auth", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
