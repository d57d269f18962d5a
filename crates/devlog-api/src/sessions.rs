// Session HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use devlog_core::{Ledger, NewSession, Session, SessionFilter};

use crate::common::{status_for, ListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request to start a session
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Project the session belongs to.
    #[schema(example = 1)]
    pub project_id: i64,
}

/// Query parameters for listing sessions
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "crate::common::default_limit")]
    pub limit: i64,
    /// Only sessions for this project.
    pub project_id: Option<i64>,
}

/// App state for session routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create session routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/end", patch(end_session))
        .with_state(state)
}

/// POST /sessions - Start a new session
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session started", body = Session),
        (status = 404, description = "Project not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), StatusCode> {
    let session = state
        .ledger
        .create_session(NewSession {
            project_id: req.project_id,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /sessions - List sessions
#[utoipa::path(
    get,
    path = "/sessions",
    params(ListSessionsQuery),
    responses(
        (status = 200, description = "List of sessions", body = ListResponse<Session>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<ListResponse<Session>>, StatusCode> {
    let sessions = state
        .ledger
        .list_sessions(
            SessionFilter {
                project_id: query.project_id,
            },
            devlog_core::Page {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list sessions: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(sessions)))
}

/// GET /sessions/{id} - Get session
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(
        ("id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = Session),
        (status = 404, description = "Session not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Session>, StatusCode> {
    let session = state.ledger.get_session(id).await.map_err(|e| {
        tracing::error!("Failed to get session: {}", e);
        status_for(&e)
    })?;

    Ok(Json(session))
}

/// PATCH /sessions/{id}/end - Close an open session
#[utoipa::path(
    patch,
    path = "/sessions/{id}/end",
    params(
        ("id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session ended", body = Session),
        (status = 404, description = "Session not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "sessions"
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Session>, StatusCode> {
    let session = state.ledger.end_session(id).await.map_err(|e| {
        tracing::error!("Failed to end session: {}", e);
        status_for(&e)
    })?;

    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_request() {
        let json = r#"{"project_id": 3}"#;
        let req: CreateSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.project_id, 3);
    }

    #[test]
    fn test_create_session_request_requires_project() {
        let result: Result<CreateSessionRequest, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
