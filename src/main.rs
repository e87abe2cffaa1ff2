//! Glucoguard: Diabetes risk prediction API
//!
//! Main entry point for the inference server.

use std::sync::Arc;

use anyhow::{Context, Result};

use glucoguard::adapters::http;
use glucoguard::adapters::JsonArtifactStore;
use glucoguard::application::InferenceService;
use glucoguard::config::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env()?;
    let _guard = glucoguard::logging::init(&config.log).context("failed to initialize logging")?;

    tracing::info!("Starting Glucoguard...");

    // The server never starts without a usable model.
    let store = JsonArtifactStore::new(&config.model_dir);
    let service = InferenceService::load(&store).with_context(|| {
        format!(
            "failed to load model artifacts from {:?}; run train_model first",
            config.model_dir
        )
    })?;

    let app = http::router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Glucoguard shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
