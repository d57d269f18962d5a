// Event HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devlog_core::{Event, EventFilter, EventType, Ledger, NewEvent};

use crate::common::{status_for, ListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request to record an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Project the event belongs to.
    #[schema(example = 1)]
    pub project_id: i64,
    /// Run the event is attached to, when relevant.
    #[serde(default)]
    pub run_id: Option<i64>,
    /// Kind of event. Defaults to "info".
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub message: Option<String>,
    /// Free-form JSON payload, stored as text.
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Query parameters for listing events
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListEventsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "crate::common::default_limit")]
    pub limit: i64,
    /// Only events for this project.
    pub project_id: Option<i64>,
    /// Only events attached to this run.
    pub run_id: Option<i64>,
    /// Only events of this type.
    pub event_type: Option<EventType>,
}

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/:id", get(get_event))
        .with_state(state)
}

/// POST /events - Record an event
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = Event),
        (status = 404, description = "Project or run not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), StatusCode> {
    let event = state
        .ledger
        .create_event(NewEvent {
            project_id: req.project_id,
            run_id: req.run_id,
            event_type: req.event_type,
            message: req.message,
            metadata: req.metadata,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {}", e);
            status_for(&e)
        })?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events - List events
#[utoipa::path(
    get,
    path = "/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, StatusCode> {
    let events = state
        .ledger
        .list_events(
            EventFilter {
                project_id: query.project_id,
                run_id: query.run_id,
                event_type: query.event_type,
            },
            devlog_core::Page {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list events: {}", e);
            status_for(&e)
        })?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /events/{id} - Get event
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, StatusCode> {
    let event = state.ledger.get_event(id).await.map_err(|e| {
        tracing::error!("Failed to get event: {}", e);
        status_for(&e)
    })?;

    Ok(Json(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_request_defaults() {
        let json = r#"{"project_id": 4}"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.project_id, 4);
        assert_eq!(req.event_type, EventType::Info);
        assert_eq!(req.run_id, None);
    }

    #[test]
    fn test_create_event_request_full() {
        let json = r#"{
            "project_id": 4,
            "run_id": 9,
            "event_type": "metric",
            "message": "rows=1200",
            "metadata": "{\"rows\": 1200}"
        }"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.event_type, EventType::Metric);
        assert_eq!(req.run_id, Some(9));
        assert_eq!(req.message.as_deref(), Some("rows=1200"));
    }
}
