// Run lifecycle HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use devlog_core::{Ledger, NewRun, Run, RunFilter, RunPatch, RunStatus};

use crate::common::{status_for, ListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request to register a run
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRunRequest {
    /// Session the run belongs to.
    #[schema(example = 1)]
    pub session_id: i64,
    /// Snippet being executed, when known.
    #[serde(default)]
    pub snippet_id: Option<i64>,
}

/// Partial update for a run. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRunRequest {
    #[serde(default)]
    pub status: Option<RunStatus>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub return_value: Option<String>,
}

impl From<UpdateRunRequest> for RunPatch {
    fn from(req: UpdateRunRequest) -> Self {
        RunPatch {
            status: req.status,
            started_at: req.started_at,
            ended_at: req.ended_at,
            duration: req.duration,
            stdout: req.stdout,
            stderr: req.stderr,
            return_value: req.return_value,
        }
    }
}

/// Query parameters for listing runs
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListRunsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "crate::common::default_limit")]
    pub limit: i64,
    /// Only runs for this session.
    pub session_id: Option<i64>,
    /// Only runs with this status.
    pub status: Option<RunStatus>,
}

/// App state for run routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create run routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(create_run).get(list_runs))
        .route("/runs/:id", get(get_run).patch(update_run))
        .with_state(state)
}

/// POST /runs - Register a run
#[utoipa::path(
    post,
    path = "/runs",
    request_body = CreateRunRequest,
    responses(
        (status = 201, description = "Run registered", body = Run),
        (status = 404, description = "Session or snippet not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "runs"
)]
pub async fn create_run(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> Result<(StatusCode, Json<Run>), StatusCode> {
    let run = state
        .ledger
        .create_run(NewRun {
            session_id: req.session_id,
            snippet_id: req.snippet_id,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create run: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(run)))
}

/// GET /runs - List runs
#[utoipa::path(
    get,
    path = "/runs",
    params(ListRunsQuery),
    responses(
        (status = 200, description = "List of runs", body = ListResponse<Run>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "runs"
)]
pub async fn list_runs(
    State(state): State<AppState>,
    Query(query): Query<ListRunsQuery>,
) -> Result<Json<ListResponse<Run>>, StatusCode> {
    let runs = state
        .ledger
        .list_runs(
            RunFilter {
                session_id: query.session_id,
                status: query.status,
            },
            devlog_core::Page {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list runs: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(runs)))
}

/// GET /runs/{id} - Get run
#[utoipa::path(
    get,
    path = "/runs/{id}",
    params(
        ("id" = i64, Path, description = "Run ID")
    ),
    responses(
        (status = 200, description = "Run found", body = Run),
        (status = 404, description = "Run not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "runs"
)]
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Run>, StatusCode> {
    let run = state.ledger.get_run(id).await.map_err(|e| {
        tracing::error!("Failed to get run: {}", e);
        status_for(&e)
    })?;

    Ok(Json(run))
}

/// PATCH /runs/{id} - Update a run
#[utoipa::path(
    patch,
    path = "/runs/{id}",
    params(
        ("id" = i64, Path, description = "Run ID")
    ),
    request_body = UpdateRunRequest,
    responses(
        (status = 200, description = "Run updated", body = Run),
        (status = 400, description = "Transition rejected"),
        (status = 404, description = "Run not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "runs"
)]
pub async fn update_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRunRequest>,
) -> Result<Json<Run>, StatusCode> {
    let run = state
        .ledger
        .update_run(id, req.into())
        .await
        .map_err(|e| {
            tracing::error!("Failed to update run: {}", e);
            status_for(&e)
        })?;

    Ok(Json(run))
}
