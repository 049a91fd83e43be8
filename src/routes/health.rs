//! Aggregate dependency health endpoint.
//!
//! Unlike a liveness probe, this checks that PostgreSQL and Redis are
//! reachable. Unconfigured dependencies are skipped and still count as
//! healthy; any configured dependency that fails turns the response into a
//! 500 with the error message in the body.

use axum::{extract::State, response::IntoResponse, Json};

use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.probes.check().await;
    (report.status_code(), Json(report))
}
