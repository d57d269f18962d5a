// Persistence contract for ledger records
//
// The Store trait keeps the ledger DB-agnostic: the API binary plugs in the
// Postgres implementation from devlog-storage, tests use MemoryStore.
// Stores assign ids and creation timestamps; lists return insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{CodeSnippet, Event, EventType, Project, Run, RunStatus, Session, User};
use crate::error::Result;

/// Pagination window for list operations
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<i64>,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub project_id: i64,
}

/// Input for creating a code snippet
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub project_id: i64,
    pub filename: Option<String>,
    /// Defaults to "generic" when not supplied
    pub language: Option<String>,
    pub code: String,
}

/// Input for creating a run
#[derive(Debug, Clone)]
pub struct NewRun {
    pub session_id: i64,
    pub snippet_id: Option<i64>,
}

/// Merge-patch for a run. Only supplied fields mutate.
#[derive(Debug, Clone, Default)]
pub struct RunPatch {
    pub status: Option<RunStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub return_value: Option<String>,
}

/// Input for creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub project_id: i64,
    pub run_id: Option<i64>,
    pub event_type: EventType,
    pub message: Option<String>,
    pub metadata: Option<String>,
}

/// Equality filter for user lists
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
}

/// Equality filters for project lists
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub owner_id: Option<i64>,
}

/// Equality filter for session lists
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub project_id: Option<i64>,
}

/// Equality filters for snippet lists
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    pub project_id: Option<i64>,
    pub language: Option<String>,
}

/// Equality filters for run lists
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    pub session_id: Option<i64>,
    pub status: Option<RunStatus>,
}

/// Equality filters for event lists
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub project_id: Option<i64>,
    pub run_id: Option<i64>,
    pub event_type: Option<EventType>,
}

/// Persistence operations over the six record kinds
///
/// Counting is part of the contract so SQL backends can aggregate
/// without scanning whole tables.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn list_users(&self, filter: UserFilter, page: Page) -> Result<Vec<User>>;
    async fn count_users(&self) -> Result<i64>;

    async fn create_project(&self, input: NewProject) -> Result<Project>;
    async fn get_project(&self, id: i64) -> Result<Option<Project>>;
    async fn list_projects(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>>;
    async fn count_projects(&self) -> Result<i64>;

    async fn create_session(&self, input: NewSession) -> Result<Session>;
    async fn get_session(&self, id: i64) -> Result<Option<Session>>;
    async fn list_sessions(&self, filter: SessionFilter, page: Page) -> Result<Vec<Session>>;
    async fn count_sessions(&self) -> Result<i64>;
    /// Stamp the session's end time. Returns None for an unknown id.
    async fn end_session(&self, id: i64, ended_at: DateTime<Utc>) -> Result<Option<Session>>;

    async fn create_snippet(&self, input: NewSnippet) -> Result<CodeSnippet>;
    async fn get_snippet(&self, id: i64) -> Result<Option<CodeSnippet>>;
    async fn list_snippets(&self, filter: SnippetFilter, page: Page) -> Result<Vec<CodeSnippet>>;
    async fn count_snippets(&self) -> Result<i64>;

    async fn create_run(&self, input: NewRun) -> Result<Run>;
    async fn get_run(&self, id: i64) -> Result<Option<Run>>;
    async fn list_runs(&self, filter: RunFilter, page: Page) -> Result<Vec<Run>>;
    async fn count_runs(&self) -> Result<i64>;
    async fn count_runs_by_status(&self, status: RunStatus) -> Result<i64>;
    /// Apply a merge-patch. Returns None for an unknown id.
    async fn update_run(&self, id: i64, patch: RunPatch) -> Result<Option<Run>>;

    async fn create_event(&self, input: NewEvent) -> Result<Event>;
    async fn get_event(&self, id: i64) -> Result<Option<Event>>;
    async fn list_events(&self, filter: EventFilter, page: Page) -> Result<Vec<Event>>;
    async fn count_events(&self) -> Result<i64>;
    async fn count_events_by_type(&self, event_type: EventType) -> Result<i64>;
}
