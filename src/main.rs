// =============================================================================
// OHLC Indicator Service — Main Entry Point
// =============================================================================
//
// Accepts OHLC samples over HTTP, keeps a rolling window of prices, and serves
// the latest indicator snapshot.  All state is in memory; a restart starts
// from an empty window.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod indicator_set;
mod indicators;
mod ingest;
mod market_data;
mod runtime_config;
mod snapshot;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::indicator_set::IndicatorParams;
use crate::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RuntimeConfig::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());

    let params = IndicatorParams::default();
    info!(
        bind_addr = %config.bind_addr,
        origins = ?config.allowed_origins,
        "Configuration resolved"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let state = Arc::new(AppState::new(config, &params));
    info!(
        window = state.gate.series_capacity(),
        "Indicator pipeline ready"
    );

    // ── 3. HTTP server ───────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, api::rest::router(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        ingested = state.store.version(),
        "OHLC indicator service shut down"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
