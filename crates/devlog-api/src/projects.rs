// Project CRUD HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devlog_core::{Ledger, NewProject, Project, ProjectFilter};

use crate::common::{status_for, ListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request to create a project
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    /// Name of the project.
    #[schema(example = "analytics")]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning user. Must exist when given.
    #[serde(default)]
    pub owner_id: Option<i64>,
}

/// Query parameters for listing projects
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "crate::common::default_limit")]
    pub limit: i64,
    /// Only projects owned by this user.
    pub owner_id: Option<i64>,
}

/// App state for project routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create project routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route("/projects/:id", get(get_project))
        .with_state(state)
}

/// POST /projects - Create a new project
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = Project),
        (status = 400, description = "Invalid project name"),
        (status = 404, description = "Owner not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), StatusCode> {
    let project = state
        .ledger
        .create_project(NewProject {
            name: req.name,
            description: req.description,
            owner_id: req.owner_id,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create project: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects - List projects
#[utoipa::path(
    get,
    path = "/projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "List of projects", body = ListResponse<Project>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ListResponse<Project>>, StatusCode> {
    let projects = state
        .ledger
        .list_projects(
            ProjectFilter {
                name: None,
                owner_id: query.owner_id,
            },
            devlog_core::Page {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list projects: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(projects)))
}

/// GET /projects/{id} - Get project
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 404, description = "Project not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, StatusCode> {
    let project = state.ledger.get_project(id).await.map_err(|e| {
        tracing::error!("Failed to get project: {}", e);
        status_for(&e)
    })?;

    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_minimal() {
        let json = r#"{"name": "demo"}"#;
        let req: CreateProjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "demo");
        assert_eq!(req.description, None);
        assert_eq!(req.owner_id, None);
    }

    #[test]
    fn test_create_project_request_full() {
        let json = r#"{"name": "demo", "description": "Data pipeline", "owner_id": 7}"#;
        let req: CreateProjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.description.as_deref(), Some("Data pipeline"));
        assert_eq!(req.owner_id, Some(7));
    }
}
