use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::jobs::table::JobCounts;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` once the worker has stopped consuming.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Jobs waiting for the worker.
    pub queue_depth: usize,
    /// Job totals by status.
    pub jobs: JobCounts,
}

/// GET /health -- returns service and queue health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.queue.is_closed() { "degraded" } else { "ok" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        queue_depth: state.queue.depth(),
        jobs: state.jobs.counts().await,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
