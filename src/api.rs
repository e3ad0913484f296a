// src/api.rs
//! Public HTTP surface consumed by the reading dashboard.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::rank::{sample_records, Prioritizer};
use crate::store::ArticleStore;
use crate::types::{ArchiveReport, RankingResult};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub prioritizer: Arc<Prioritizer>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/prioritization/sample", get(prioritization_sample))
        .route("/prioritization/low-priority", get(low_priority))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Batch-level failures (the store cannot be read) surface as an explicit
/// JSON error; everything below that degrades per article instead.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "batch-level failure");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

async fn prioritization_sample(
    State(state): State<AppState>,
) -> Result<Json<RankingResult>, ApiError> {
    let records = state.store.load().await?;
    let sampling = state.prioritizer.config().sampling;
    let sampled = sample_records(records, sampling.sample_size, sampling.seed);
    let result = state.prioritizer.rank(sampled, now_ms()).await;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct LowPriorityParams {
    min_age_days: Option<i64>,
}

async fn low_priority(
    State(state): State<AppState>,
    Query(params): Query<LowPriorityParams>,
) -> Result<Json<ArchiveReport>, ApiError> {
    let records = state.store.load().await?;
    let min_age_days = params
        .min_age_days
        .unwrap_or(state.prioritizer.config().low_priority.min_age_days)
        .max(0);
    let report = state
        .prioritizer
        .archive_candidates(records, now_ms(), min_age_days)
        .await;
    Ok(Json(report))
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
