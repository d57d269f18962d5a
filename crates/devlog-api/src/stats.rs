// Aggregate statistics routes

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use devlog_core::{StatsEngine, Summary};

use crate::common::status_for;

/// App state for stats routes
#[derive(Clone)]
pub struct AppState {
    pub stats: StatsEngine,
}

/// Create stats routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/stats/summary", get(summary))
        .with_state(state)
}

/// GET /stats/summary - Ledger-wide counts and breakdowns
#[utoipa::path(
    get,
    path = "/stats/summary",
    responses(
        (status = 200, description = "Aggregate summary", body = Summary),
        (status = 503, description = "Store unavailable")
    ),
    tag = "stats"
)]
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, StatusCode> {
    let summary = state.stats.summary().await.map_err(|e| {
        tracing::error!("Failed to compute summary: {}", e);
        status_for(&e)
    })?;

    Ok(Json(summary))
}
