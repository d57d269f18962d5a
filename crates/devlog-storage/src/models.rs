// Database models (internal, converted into core entities at the boundary)

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use devlog_core::{CodeSnippet, Event, EventType, Project, Run, RunStatus, Session, User};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<i64>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: i64,
    pub project_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            project_id: row.project_id,
            started_at: row.started_at,
            ended_at: row.ended_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SnippetRow {
    pub id: i64,
    pub project_id: i64,
    pub filename: Option<String>,
    pub language: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<SnippetRow> for CodeSnippet {
    fn from(row: SnippetRow) -> Self {
        CodeSnippet {
            id: row.id,
            project_id: row.project_id,
            filename: row.filename,
            language: row.language,
            code: row.code,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RunRow {
    pub id: i64,
    pub session_id: i64,
    pub snippet_id: Option<i64>,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub return_value: Option<String>,
}

impl From<RunRow> for Run {
    fn from(row: RunRow) -> Self {
        Run {
            id: row.id,
            session_id: row.session_id,
            snippet_id: row.snippet_id,
            status: RunStatus::from(row.status.as_str()),
            started_at: row.started_at,
            ended_at: row.ended_at,
            duration: row.duration,
            stdout: row.stdout,
            stderr: row.stderr,
            return_value: row.return_value,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub project_id: i64,
    pub run_id: Option<i64>,
    pub event_type: String,
    pub message: Option<String>,
    pub metadata: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            timestamp: row.timestamp,
            project_id: row.project_id,
            run_id: row.run_id,
            event_type: EventType::from(row.event_type.as_str()),
            message: row.message,
            metadata: row.metadata,
        }
    }
}
