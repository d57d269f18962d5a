// Best-effort ingestion routes for git hooks
//
// These endpoints never report failure to the caller. A hook that cannot
// reach the store should not break the commit it is reporting on, so the
// response is 202 with whatever ids were actually written.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use devlog_core::{CommitNotice, EventNotice, IngestFacade, IngestOutcome};

/// App state for ingestion routes
#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestFacade,
}

/// Create ingestion routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auto/commit", post(record_commit))
        .route("/auto/event", post(record_event))
        .with_state(state)
}

/// POST /auto/commit - Record a commit notice
#[utoipa::path(
    post,
    path = "/auto/commit",
    request_body = CommitNotice,
    responses(
        (status = 202, description = "Notice accepted; ids reflect what was written", body = IngestOutcome)
    ),
    tag = "auto"
)]
pub async fn record_commit(
    State(state): State<AppState>,
    Json(notice): Json<CommitNotice>,
) -> (StatusCode, Json<IngestOutcome>) {
    let outcome = state.ingest.record_commit(notice).await;
    (StatusCode::ACCEPTED, Json(outcome))
}

/// POST /auto/event - Record an ad-hoc event notice
#[utoipa::path(
    post,
    path = "/auto/event",
    request_body = EventNotice,
    responses(
        (status = 202, description = "Notice accepted; ids reflect what was written", body = IngestOutcome)
    ),
    tag = "auto"
)]
pub async fn record_event(
    State(state): State<AppState>,
    Json(notice): Json<EventNotice>,
) -> (StatusCode, Json<IngestOutcome>) {
    let outcome = state.ingest.record_event(notice).await;
    (StatusCode::ACCEPTED, Json(outcome))
}
