// User CRUD HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devlog_core::{Ledger, NewUser, User, UserFilter};

use crate::common::{status_for, ListResponse, Pagination};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Request to create a user
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Unique name of the actor.
    #[schema(example = "alice")]
    pub username: String,
}

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", get(get_user))
        .with_state(state)
}

/// POST /users - Create a new user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Invalid username"),
        (status = 409, description = "Username already exists"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let user = state
        .ledger
        .create_user(NewUser {
            username: req.username,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - List users
#[utoipa::path(
    get,
    path = "/users",
    params(Pagination),
    responses(
        (status = 200, description = "List of users", body = ListResponse<User>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<User>>, StatusCode> {
    let users = state
        .ledger
        .list_users(UserFilter::default(), page.into())
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(users)))
}

/// GET /users/{id} - Get user
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, StatusCode> {
    let user = state.ledger.get_user(id).await.map_err(|e| {
        tracing::error!("Failed to get user: {}", e);
        status_for(&e)
    })?;

    Ok(Json(user))
}
