// Postgres implementation of the core Store contract
//
// Queries go through sqlx prepared statements. Optional equality filters use
// the `($n IS NULL OR col = $n)` pattern so each list stays a single query.
// Lists and ids are insertion-ordered (BIGSERIAL, ORDER BY id).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use devlog_core::{
    CodeSnippet, Event, EventFilter, EventType, LedgerError, NewEvent, NewProject, NewRun,
    NewSession, NewSnippet, NewUser, Page, Project, ProjectFilter, Result, Run, RunFilter,
    RunPatch, RunStatus, Session, SessionFilter, SnippetFilter, Store, User, UserFilter,
};

use crate::models::{EventRow, ProjectRow, RunRow, SessionRow, SnippetRow, UserRow};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn store_err(err: sqlx::Error) -> LedgerError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return LedgerError::conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return LedgerError::validation(db_err.message().to_string());
        }
    }
    tracing::error!(error = %err, "database query failed");
    LedgerError::store(err)
}

#[async_trait]
impl Store for Database {
    // ============================================
    // Users
    // ============================================

    async fn create_user(&self, input: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id, username, created_at
            "#,
        )
        .bind(&input.username)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_users(&self, filter: UserFilter, page: Page) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE ($1::text IS NULL OR username = $1)
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(&filter.username)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    // ============================================
    // Projects
    // ============================================

    async fn create_project(&self, input: NewProject) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, owner_id
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_projects(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, owner_id
            FROM projects
            WHERE ($1::text IS NULL OR name = $1)
              AND ($2::bigint IS NULL OR owner_id = $2)
            ORDER BY id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(&filter.name)
        .bind(filter.owner_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_projects(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    // ============================================
    // Sessions
    // ============================================

    async fn create_session(&self, input: NewSession) -> Result<Session> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (project_id)
            VALUES ($1)
            RETURNING id, project_id, started_at, ended_at
            "#,
        )
        .bind(input.project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, project_id, started_at, ended_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_sessions(&self, filter: SessionFilter, page: Page) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, project_id, started_at, ended_at
            FROM sessions
            WHERE ($1::bigint IS NULL OR project_id = $1)
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(filter.project_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_sessions(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    async fn end_session(&self, id: i64, ended_at: DateTime<Utc>) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE sessions
            SET ended_at = $2
            WHERE id = $1
            RETURNING id, project_id, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    // ============================================
    // Code snippets
    // ============================================

    async fn create_snippet(&self, input: NewSnippet) -> Result<CodeSnippet> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            INSERT INTO code_snippets (project_id, filename, language, code)
            VALUES ($1, $2, COALESCE($3, 'generic'), $4)
            RETURNING id, project_id, filename, language, code, created_at
            "#,
        )
        .bind(input.project_id)
        .bind(&input.filename)
        .bind(&input.language)
        .bind(&input.code)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_snippet(&self, id: i64) -> Result<Option<CodeSnippet>> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            SELECT id, project_id, filename, language, code, created_at
            FROM code_snippets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_snippets(&self, filter: SnippetFilter, page: Page) -> Result<Vec<CodeSnippet>> {
        let rows = sqlx::query_as::<_, SnippetRow>(
            r#"
            SELECT id, project_id, filename, language, code, created_at
            FROM code_snippets
            WHERE ($1::bigint IS NULL OR project_id = $1)
              AND ($2::text IS NULL OR language = $2)
            ORDER BY id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.project_id)
        .bind(&filter.language)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_snippets(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM code_snippets")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    // ============================================
    // Runs
    // ============================================

    async fn create_run(&self, input: NewRun) -> Result<Run> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            INSERT INTO runs (session_id, snippet_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, session_id, snippet_id, status, started_at, ended_at,
                      duration, stdout, stderr, return_value
            "#,
        )
        .bind(input.session_id)
        .bind(input.snippet_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_run(&self, id: i64) -> Result<Option<Run>> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, session_id, snippet_id, status, started_at, ended_at,
                   duration, stdout, stderr, return_value
            FROM runs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_runs(&self, filter: RunFilter, page: Page) -> Result<Vec<Run>> {
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, session_id, snippet_id, status, started_at, ended_at,
                   duration, stdout, stderr, return_value
            FROM runs
            WHERE ($1::bigint IS NULL OR session_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.session_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_runs(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM runs")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    async fn count_runs_by_status(&self, status: RunStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM runs WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    async fn update_run(&self, id: i64, patch: RunPatch) -> Result<Option<Run>> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            UPDATE runs
            SET
                status = COALESCE($2, status),
                started_at = COALESCE($3, started_at),
                ended_at = COALESCE($4, ended_at),
                duration = COALESCE($5, duration),
                stdout = COALESCE($6, stdout),
                stderr = COALESCE($7, stderr),
                return_value = COALESCE($8, return_value)
            WHERE id = $1
            RETURNING id, session_id, snippet_id, status, started_at, ended_at,
                      duration, stdout, stderr, return_value
            "#,
        )
        .bind(id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.started_at)
        .bind(patch.ended_at)
        .bind(patch.duration)
        .bind(&patch.stdout)
        .bind(&patch.stderr)
        .bind(&patch.return_value)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    // ============================================
    // Events
    // ============================================

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (project_id, run_id, event_type, message, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, timestamp, project_id, run_id, event_type, message, metadata
            "#,
        )
        .bind(input.project_id)
        .bind(input.run_id)
        .bind(input.event_type.as_str())
        .bind(&input.message)
        .bind(&input.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timestamp, project_id, run_id, event_type, message, metadata
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_events(&self, filter: EventFilter, page: Page) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timestamp, project_id, run_id, event_type, message, metadata
            FROM events
            WHERE ($1::bigint IS NULL OR project_id = $1)
              AND ($2::bigint IS NULL OR run_id = $2)
              AND ($3::text IS NULL OR event_type = $3)
            ORDER BY id
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(filter.project_id)
        .bind(filter.run_id)
        .bind(filter.event_type.map(|t| t.as_str()))
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_events(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }

    async fn count_events_by_type(&self, event_type: EventType) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE event_type = $1")
            .bind(event_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(count)
    }
}
