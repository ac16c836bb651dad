//! CharityTrust event indexer.
//!
//! Follows the contract's `getEvents` stream into SQLite and serves the
//! donation and distribution history over HTTP. Ctrl-C stops both halves:
//! the server drains in-flight requests and the indexer finishes its tick.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use indexer::IndexerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    let pool = db::init_pool(&config.database_url).await?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    let indexer_task = tokio::spawn(indexer::run(
        Arc::new(IndexerState {
            pool: pool.clone(),
            config: config.clone(),
            client,
        }),
        shutdown.clone(),
    ));

    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API listening on http://{addr}");

    axum::serve(listener, router(pool))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    indexer_task.await?;
    info!("Shutdown complete");
    Ok(())
}

fn router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/events", get(api::get_all_events))
        .route("/donations", get(api::get_donations))
        .route("/distributions", get(api::get_distributions))
        .route(
            "/beneficiaries/:address/events",
            get(api::get_beneficiary_events),
        )
        .route("/summary", get(api::get_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(api::ApiState { pool }))
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {e}");
            return;
        }
    }
    shutdown.cancel();
}
