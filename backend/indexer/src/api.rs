//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::summary;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ContributorEventsResponse {
    pub address: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
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

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
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

/// `GET /contributors/:address/events`
///
/// Returns every indexed event whose actor is `address`.
pub async fn get_contributor_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<ContributorEventsResponse>, IndexerError> {
    let events = db::get_events_for_actor(&state.pool, &address).await?;
    Ok(Json(ContributorEventsResponse {
        address,
        count: events.len(),
        events,
    }))
}

/// `GET /events`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AllEventsResponse>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /summary`
///
/// Campaign totals and per-contributor amounts derived from all indexed events.
pub async fn get_summary(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<summary::CampaignSummary>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(summary::summarize(&events)))
}
