//! Axum REST API handlers.
//!
//! Every list endpoint returns events in acceptance order (ledger, then
//! event id), which is the order the contract applied them in.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{EventKind, EventRecord, LedgerSummary};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct BeneficiaryEventsResponse {
    pub beneficiary: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(e: IndexerError) -> Response {
    error!("API query failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn events_response(result: crate::errors::Result<Vec<EventRecord>>) -> Response {
    match result {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(EventsResponse { count, events })).into_response()
        }
        Err(e) => internal_error(e),
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns every indexed event.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    events_response(db::get_all_events(&state.pool).await)
}

/// `GET /donations`
pub async fn get_donations(State(state): State<Arc<ApiState>>) -> Response {
    events_response(db::get_events_by_kind(&state.pool, &EventKind::DonationReceived).await)
}

/// `GET /distributions`
pub async fn get_distributions(State(state): State<Arc<ApiState>>) -> Response {
    events_response(db::get_events_by_kind(&state.pool, &EventKind::FundsDistributed).await)
}

/// `GET /beneficiaries/:address/events`
///
/// Registration, verification and payout history for one beneficiary.
pub async fn get_beneficiary_events(
    State(state): State<Arc<ApiState>>,
    Path(beneficiary): Path<String>,
) -> Response {
    match db::get_events_for_beneficiary(&state.pool, &beneficiary).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(BeneficiaryEventsResponse {
                    beneficiary,
                    count,
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /summary`
///
/// Donated, distributed and available totals recomputed from indexed events.
pub async fn get_summary(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => (StatusCode::OK, Json(LedgerSummary::from_events(&events))).into_response(),
        Err(e) => internal_error(e),
    }
}
