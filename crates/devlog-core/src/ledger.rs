// Entity model: validated construction, lookup, and mutation of ledger records
//
// All writes go through here so that field validation and referential checks
// happen before anything reaches the store. Reads are thin pass-throughs,
// except point lookups which turn a missing row into NotFound.

use std::sync::Arc;

use chrono::Utc;

use crate::config::LedgerConfig;
use crate::entities::{CodeSnippet, Event, Project, Run, Session, User};
use crate::error::{LedgerError, RecordKind, Result};
use crate::store::{
    EventFilter, NewEvent, NewProject, NewRun, NewSession, NewSnippet, NewUser, Page,
    ProjectFilter, RunFilter, RunPatch, SessionFilter, SnippetFilter, Store, UserFilter,
};

/// Validated entry point for all ledger operations
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger with default (permissive) behavior
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create a ledger with explicit behavior flags
    pub fn with_config(store: Arc<dyn Store>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn create_user(&self, input: NewUser) -> Result<User> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(LedgerError::validation("username must not be empty"));
        }
        let existing = self
            .store
            .list_users(
                UserFilter {
                    username: Some(username.clone()),
                },
                Page::default(),
            )
            .await?;
        if !existing.is_empty() {
            return Err(LedgerError::conflict(format!(
                "username '{username}' already exists"
            )));
        }
        self.store.create_user(NewUser { username }).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::User,
                id,
            })
    }

    pub async fn list_users(&self, filter: UserFilter, page: Page) -> Result<Vec<User>> {
        self.store.list_users(filter, page).await
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn create_project(&self, input: NewProject) -> Result<Project> {
        if input.name.trim().is_empty() {
            return Err(LedgerError::validation("project name must not be empty"));
        }
        if let Some(owner_id) = input.owner_id {
            self.get_user(owner_id).await?;
        }
        self.store.create_project(input).await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        self.store
            .get_project(id)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Project,
                id,
            })
    }

    pub async fn list_projects(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>> {
        self.store.list_projects(filter, page).await
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub async fn create_session(&self, input: NewSession) -> Result<Session> {
        self.get_project(input.project_id).await?;
        self.store.create_session(input).await
    }

    pub async fn get_session(&self, id: i64) -> Result<Session> {
        self.store
            .get_session(id)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Session,
                id,
            })
    }

    pub async fn list_sessions(&self, filter: SessionFilter, page: Page) -> Result<Vec<Session>> {
        self.store.list_sessions(filter, page).await
    }

    /// Stamp the session's end time with the current instant
    pub async fn end_session(&self, id: i64) -> Result<Session> {
        self.store
            .end_session(id, Utc::now())
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Session,
                id,
            })
    }

    // ------------------------------------------------------------------
    // Snippets
    // ------------------------------------------------------------------

    pub async fn create_snippet(&self, input: NewSnippet) -> Result<CodeSnippet> {
        if input.code.trim().is_empty() {
            return Err(LedgerError::validation("snippet code must not be empty"));
        }
        self.get_project(input.project_id).await?;
        self.store.create_snippet(input).await
    }

    pub async fn get_snippet(&self, id: i64) -> Result<CodeSnippet> {
        self.store
            .get_snippet(id)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Snippet,
                id,
            })
    }

    pub async fn list_snippets(
        &self,
        filter: SnippetFilter,
        page: Page,
    ) -> Result<Vec<CodeSnippet>> {
        self.store.list_snippets(filter, page).await
    }

    // ------------------------------------------------------------------
    // Runs
    // ------------------------------------------------------------------

    pub async fn create_run(&self, input: NewRun) -> Result<Run> {
        self.get_session(input.session_id).await?;
        if let Some(snippet_id) = input.snippet_id {
            self.get_snippet(snippet_id).await?;
        }
        self.store.create_run(input).await
    }

    pub async fn get_run(&self, id: i64) -> Result<Run> {
        self.store.get_run(id).await?.ok_or(LedgerError::NotFound {
            kind: RecordKind::Run,
            id,
        })
    }

    pub async fn list_runs(&self, filter: RunFilter, page: Page) -> Result<Vec<Run>> {
        self.store.list_runs(filter, page).await
    }

    /// Merge-patch a run. Only supplied fields mutate; an empty patch
    /// returns the run unchanged.
    pub async fn update_run(&self, id: i64, patch: RunPatch) -> Result<Run> {
        if let Some(next) = patch.status {
            let current = self.get_run(id).await?;
            if !current.status.allows(next) {
                if self.config.strict_transitions {
                    return Err(LedgerError::validation(format!(
                        "run {id} cannot move from {} to {next}",
                        current.status
                    )));
                }
                tracing::warn!(
                    run_id = id,
                    from = %current.status,
                    to = %next,
                    "out-of-order run status transition"
                );
            }
        }
        if let (Some(duration), Some(started_at), Some(ended_at)) =
            (patch.duration, patch.started_at, patch.ended_at)
        {
            let derived = (ended_at - started_at).num_milliseconds() as f64 / 1000.0;
            if (derived - duration).abs() > 0.001 {
                tracing::warn!(
                    run_id = id,
                    supplied = duration,
                    derived,
                    "run duration disagrees with its timestamps"
                );
            }
        }
        self.store
            .update_run(id, patch)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Run,
                id,
            })
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub async fn create_event(&self, input: NewEvent) -> Result<Event> {
        self.get_project(input.project_id).await?;
        if let Some(run_id) = input.run_id {
            self.get_run(run_id).await?;
        }
        self.store.create_event(input).await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Event,
                id,
            })
    }

    pub async fn list_events(&self, filter: EventFilter, page: Page) -> Result<Vec<Event>> {
        self.store.list_events(filter, page).await
    }
}
