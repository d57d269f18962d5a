// Code snippet HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devlog_core::{CodeSnippet, Ledger, NewSnippet, SnippetFilter};

use crate::common::{status_for, ListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request to store a code snippet
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSnippetRequest {
    /// Project the snippet belongs to.
    #[schema(example = 1)]
    pub project_id: i64,
    /// Source file the snippet came from.
    #[serde(default)]
    pub filename: Option<String>,
    /// Language tag. Defaults to "generic" when omitted.
    #[serde(default)]
    pub language: Option<String>,
    /// Snippet body. Must be non-empty.
    pub code: String,
}

/// Query parameters for listing snippets
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSnippetsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "crate::common::default_limit")]
    pub limit: i64,
    /// Only snippets for this project.
    pub project_id: Option<i64>,
    /// Only snippets with this language tag.
    pub language: Option<String>,
}

/// App state for snippet routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create snippet routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/snippets", post(create_snippet).get(list_snippets))
        .route("/snippets/:id", get(get_snippet))
        .with_state(state)
}

/// POST /snippets - Store a code snippet
#[utoipa::path(
    post,
    path = "/snippets",
    request_body = CreateSnippetRequest,
    responses(
        (status = 201, description = "Snippet stored", body = CodeSnippet),
        (status = 400, description = "Empty snippet body"),
        (status = 404, description = "Project not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "snippets"
)]
pub async fn create_snippet(
    State(state): State<AppState>,
    Json(req): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<CodeSnippet>), StatusCode> {
    let snippet = state
        .ledger
        .create_snippet(NewSnippet {
            project_id: req.project_id,
            filename: req.filename,
            language: req.language,
            code: req.code,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create snippet: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(snippet)))
}

/// GET /snippets - List snippets
#[utoipa::path(
    get,
    path = "/snippets",
    params(ListSnippetsQuery),
    responses(
        (status = 200, description = "List of snippets", body = ListResponse<CodeSnippet>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "snippets"
)]
pub async fn list_snippets(
    State(state): State<AppState>,
    Query(query): Query<ListSnippetsQuery>,
) -> Result<Json<ListResponse<CodeSnippet>>, StatusCode> {
    let snippets = state
        .ledger
        .list_snippets(
            SnippetFilter {
                project_id: query.project_id,
                language: query.language,
            },
            devlog_core::Page {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list snippets: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(snippets)))
}

/// GET /snippets/{id} - Get snippet
#[utoipa::path(
    get,
    path = "/snippets/{id}",
    params(
        ("id" = i64, Path, description = "Snippet ID")
    ),
    responses(
        (status = 200, description = "Snippet found", body = CodeSnippet),
        (status = 404, description = "Snippet not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "snippets"
)]
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CodeSnippet>, StatusCode> {
    let snippet = state.ledger.get_snippet(id).await.map_err(|e| {
        tracing::error!("Failed to get snippet: {}", e);
        status_for(&e)
    })?;

    Ok(Json(snippet))
}
