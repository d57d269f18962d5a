// Devlog API server
// Decision: one route module per record kind, each with its own AppState
// Decision: ingestion endpoints live under /auto and never fail the caller

mod auto;
mod common;
mod events;
mod projects;
mod runs;
mod sessions;
mod snippets;
mod stats;
mod users;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use devlog_core::{
    CodeSnippet, CommitNotice, Event, EventNotice, EventType, IngestFacade, IngestOutcome, Ledger,
    LedgerConfig, Project, Run, RunStatus, Session, StatsEngine, Store, Summary, User,
};
use devlog_storage::Database;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::ListResponse;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::list_users,
        users::get_user,
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        sessions::create_session,
        sessions::list_sessions,
        sessions::get_session,
        sessions::end_session,
        snippets::create_snippet,
        snippets::list_snippets,
        snippets::get_snippet,
        runs::create_run,
        runs::list_runs,
        runs::get_run,
        runs::update_run,
        events::create_event,
        events::list_events,
        events::get_event,
        stats::summary,
        auto::record_commit,
        auto::record_event,
    ),
    components(
        schemas(
            User, Project, Session, CodeSnippet, Run, Event,
            RunStatus, EventType,
            users::CreateUserRequest,
            projects::CreateProjectRequest,
            sessions::CreateSessionRequest,
            snippets::CreateSnippetRequest,
            runs::CreateRunRequest,
            runs::UpdateRunRequest,
            events::CreateEventRequest,
            ListResponse<User>,
            ListResponse<Project>,
            ListResponse<Session>,
            ListResponse<CodeSnippet>,
            ListResponse<Run>,
            ListResponse<Event>,
            Summary,
            CommitNotice, EventNotice, IngestOutcome,
        )
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "projects", description = "Project management endpoints"),
        (name = "sessions", description = "Working session endpoints"),
        (name = "snippets", description = "Code snippet endpoints"),
        (name = "runs", description = "Run lifecycle endpoints"),
        (name = "events", description = "Event log endpoints"),
        (name = "stats", description = "Aggregate statistics endpoints"),
        (name = "auto", description = "Best-effort ingestion endpoints for git hooks")
    ),
    info(
        title = "Devlog API",
        version = "0.1.0",
        description = "Activity ledger for projects, sessions, runs, and events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devlog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    tracing::info!("devlog-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Ledger configuration from environment
    let config = LedgerConfig::from_env();
    tracing::info!(
        strict_transitions = config.strict_transitions,
        "Ledger configured"
    );

    let store: Arc<dyn Store> = Arc::new(db);
    let ledger = Arc::new(Ledger::with_config(store.clone(), config));
    let stats_engine = StatsEngine::new(store);
    let ingest = IngestFacade::new(ledger.clone());

    // Create module-specific states
    let users_state = users::AppState {
        ledger: ledger.clone(),
    };
    let projects_state = projects::AppState {
        ledger: ledger.clone(),
    };
    let sessions_state = sessions::AppState {
        ledger: ledger.clone(),
    };
    let snippets_state = snippets::AppState {
        ledger: ledger.clone(),
    };
    let runs_state = runs::AppState {
        ledger: ledger.clone(),
    };
    let events_state = events::AppState { ledger };
    let stats_state = stats::AppState {
        stats: stats_engine,
    };
    let auto_state = auto::AppState { ingest };

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/projects
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when a dashboard is served from a different origin than the API
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(users::routes(users_state))
        .merge(projects::routes(projects_state))
        .merge(sessions::routes(sessions_state))
        .merge(snippets::routes(snippets_state))
        .merge(runs::routes(runs_state))
        .merge(events::routes(events_state))
        .merge(stats::routes(stats_state))
        .merge(auto::routes(auto_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health));

    // Apply API prefix if configured
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ]),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = "0.0.0.0:8000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
