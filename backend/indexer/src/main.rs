//! Fund escrow event indexer — entry point.
//!
//! Starts a background indexer task that polls Soroban `getEvents` RPC for
//! the campaign contract's events and persists them to SQLite.
//! Simultaneously exposes a small Axum REST API for frontend / refund tooling.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;
mod summary;

use std::sync::Arc;

use axum::{routing::get, Router};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use indexer::Indexer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let shutdown = CancellationToken::new();

    // ─── Background indexer ───────────────────────────────
    // A database that cannot report where the last run stopped is fatal here.
    let position = db::load_position(&pool, config.start_ledger).await?;
    let indexer = Indexer::new(pool.clone(), client, &config);
    let indexer_task = tokio::spawn(indexer.run(position, shutdown.clone()));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState { pool });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/events", get(api::get_all_events))
        .route("/summary", get(api::get_summary))
        .route(
            "/contributors/:address/events",
            get(api::get_contributor_events),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    indexer_task.await?;
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
