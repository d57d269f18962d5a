// In-memory Store implementation for examples and testing
//
// Keeps all records in memory behind a tokio RwLock, making it perfect for:
// - Unit and integration tests that don't need a database
// - Quick prototyping

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::entities::{CodeSnippet, Event, EventType, Project, Run, RunStatus, Session, User};
use crate::error::{LedgerError, Result};
use crate::store::{
    EventFilter, NewEvent, NewProject, NewRun, NewSession, NewSnippet, NewUser, Page,
    ProjectFilter, RunFilter, RunPatch, SessionFilter, SnippetFilter, Store, UserFilter,
};

#[derive(Debug, Default)]
struct Tables {
    seq: i64,
    users: Vec<User>,
    projects: Vec<Project>,
    sessions: Vec<Session>,
    snippets: Vec<CodeSnippet>,
    runs: Vec<Run>,
    events: Vec<Event>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }
}

/// In-memory store
///
/// Records live in insertion-ordered vectors; ids come from a single
/// monotonic sequence. Cloning shares the underlying tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|u| u.username == input.username) {
            return Err(LedgerError::conflict(format!(
                "username '{}' already exists",
                input.username
            )));
        }
        let user = User {
            id: tables.allocate_id(),
            username: input.username,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self, filter: UserFilter, page: Page) -> Result<Vec<User>> {
        let tables = self.inner.read().await;
        let matches = tables
            .users
            .iter()
            .filter(|u| match &filter.username {
                Some(username) => u.username == *username,
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn create_project(&self, input: NewProject) -> Result<Project> {
        let mut tables = self.inner.write().await;
        let project = Project {
            id: tables.allocate_id(),
            name: input.name,
            description: input.description,
            owner_id: input.owner_id,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let tables = self.inner.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>> {
        let tables = self.inner.read().await;
        let matches = tables
            .projects
            .iter()
            .filter(|p| match &filter.name {
                Some(name) => p.name == *name,
                None => true,
            })
            .filter(|p| match filter.owner_id {
                Some(owner_id) => p.owner_id == Some(owner_id),
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_projects(&self) -> Result<i64> {
        Ok(self.inner.read().await.projects.len() as i64)
    }

    async fn create_session(&self, input: NewSession) -> Result<Session> {
        let mut tables = self.inner.write().await;
        let session = Session {
            id: tables.allocate_id(),
            project_id: input.project_id,
            started_at: Utc::now(),
            ended_at: None,
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let tables = self.inner.read().await;
        Ok(tables.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sessions(&self, filter: SessionFilter, page: Page) -> Result<Vec<Session>> {
        let tables = self.inner.read().await;
        let matches = tables
            .sessions
            .iter()
            .filter(|s| match filter.project_id {
                Some(project_id) => s.project_id == project_id,
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_sessions(&self) -> Result<i64> {
        Ok(self.inner.read().await.sessions.len() as i64)
    }

    async fn end_session(&self, id: i64, ended_at: DateTime<Utc>) -> Result<Option<Session>> {
        let mut tables = self.inner.write().await;
        let Some(session) = tables.sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        session.ended_at = Some(ended_at);
        Ok(Some(session.clone()))
    }

    async fn create_snippet(&self, input: NewSnippet) -> Result<CodeSnippet> {
        let mut tables = self.inner.write().await;
        let snippet = CodeSnippet {
            id: tables.allocate_id(),
            project_id: input.project_id,
            filename: input.filename,
            language: input.language.unwrap_or_else(|| "generic".to_string()),
            code: input.code,
            created_at: Utc::now(),
        };
        tables.snippets.push(snippet.clone());
        Ok(snippet)
    }

    async fn get_snippet(&self, id: i64) -> Result<Option<CodeSnippet>> {
        let tables = self.inner.read().await;
        Ok(tables.snippets.iter().find(|s| s.id == id).cloned())
    }

    async fn list_snippets(&self, filter: SnippetFilter, page: Page) -> Result<Vec<CodeSnippet>> {
        let tables = self.inner.read().await;
        let matches = tables
            .snippets
            .iter()
            .filter(|s| match filter.project_id {
                Some(project_id) => s.project_id == project_id,
                None => true,
            })
            .filter(|s| match &filter.language {
                Some(language) => s.language == *language,
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_snippets(&self) -> Result<i64> {
        Ok(self.inner.read().await.snippets.len() as i64)
    }

    async fn create_run(&self, input: NewRun) -> Result<Run> {
        let mut tables = self.inner.write().await;
        let run = Run {
            id: tables.allocate_id(),
            session_id: input.session_id,
            snippet_id: input.snippet_id,
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
            duration: None,
            stdout: None,
            stderr: None,
            return_value: None,
        };
        tables.runs.push(run.clone());
        Ok(run)
    }

    async fn get_run(&self, id: i64) -> Result<Option<Run>> {
        let tables = self.inner.read().await;
        Ok(tables.runs.iter().find(|r| r.id == id).cloned())
    }

    async fn list_runs(&self, filter: RunFilter, page: Page) -> Result<Vec<Run>> {
        let tables = self.inner.read().await;
        let matches = tables
            .runs
            .iter()
            .filter(|r| match filter.session_id {
                Some(session_id) => r.session_id == session_id,
                None => true,
            })
            .filter(|r| match filter.status {
                Some(status) => r.status == status,
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_runs(&self) -> Result<i64> {
        Ok(self.inner.read().await.runs.len() as i64)
    }

    async fn count_runs_by_status(&self, status: RunStatus) -> Result<i64> {
        let tables = self.inner.read().await;
        Ok(tables.runs.iter().filter(|r| r.status == status).count() as i64)
    }

    async fn update_run(&self, id: i64, patch: RunPatch) -> Result<Option<Run>> {
        let mut tables = self.inner.write().await;
        let Some(run) = tables.runs.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            run.status = status;
        }
        if let Some(started_at) = patch.started_at {
            run.started_at = Some(started_at);
        }
        if let Some(ended_at) = patch.ended_at {
            run.ended_at = Some(ended_at);
        }
        if let Some(duration) = patch.duration {
            run.duration = Some(duration);
        }
        if let Some(stdout) = patch.stdout {
            run.stdout = Some(stdout);
        }
        if let Some(stderr) = patch.stderr {
            run.stderr = Some(stderr);
        }
        if let Some(return_value) = patch.return_value {
            run.return_value = Some(return_value);
        }
        Ok(Some(run.clone()))
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let mut tables = self.inner.write().await;
        let event = Event {
            id: tables.allocate_id(),
            timestamp: Utc::now(),
            project_id: input.project_id,
            run_id: input.run_id,
            event_type: input.event_type,
            message: input.message,
            metadata: input.metadata,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        let tables = self.inner.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self, filter: EventFilter, page: Page) -> Result<Vec<Event>> {
        let tables = self.inner.read().await;
        let matches = tables
            .events
            .iter()
            .filter(|e| match filter.project_id {
                Some(project_id) => e.project_id == project_id,
                None => true,
            })
            .filter(|e| match filter.run_id {
                Some(run_id) => e.run_id == Some(run_id),
                None => true,
            })
            .filter(|e| match filter.event_type {
                Some(event_type) => e.event_type == event_type,
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matches, page))
    }

    async fn count_events(&self) -> Result<i64> {
        Ok(self.inner.read().await.events.len() as i64)
    }

    async fn count_events_by_type(&self, event_type: EventType) -> Result<i64> {
        let tables = self.inner.read().await;
        Ok(tables
            .events
            .iter()
            .filter(|e| e.event_type == event_type)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        let alice = store
            .create_user(NewUser {
                username: "alice".to_string(),
            })
            .await
            .unwrap();
        let bob = store
            .create_user(NewUser {
                username: "bob".to_string(),
            })
            .await
            .unwrap();
        assert!(bob.id > alice.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                username: "alice".to_string(),
            })
            .await
            .unwrap();
        let err = store
            .create_user(NewUser {
                username: "alice".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lists_preserve_insertion_order() {
        let store = MemoryStore::new();
        for name in ["one", "two", "three"] {
            store
                .create_project(NewProject {
                    name: name.to_string(),
                    description: None,
                    owner_id: None,
                })
                .await
                .unwrap();
        }
        let projects = store
            .list_projects(ProjectFilter::default(), Page::default())
            .await
            .unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .create_project(NewProject {
                    name: format!("p{i}"),
                    description: None,
                    owner_id: None,
                })
                .await
                .unwrap();
        }
        let page = store
            .list_projects(ProjectFilter::default(), Page { skip: 1, limit: 2 })
            .await
            .unwrap();
        let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_snippet_language_defaults() {
        let store = MemoryStore::new();
        let snippet = store
            .create_snippet(NewSnippet {
                project_id: 1,
                filename: None,
                language: None,
                code: "print(1)".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(snippet.language, "generic");
    }

    #[tokio::test]
    async fn test_count_runs_by_status() {
        let store = MemoryStore::new();
        let first = store
            .create_run(NewRun {
                session_id: 1,
                snippet_id: None,
            })
            .await
            .unwrap();
        store
            .create_run(NewRun {
                session_id: 1,
                snippet_id: None,
            })
            .await
            .unwrap();
        store
            .update_run(
                first.id,
                RunPatch {
                    status: Some(RunStatus::Running),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            store.count_runs_by_status(RunStatus::Pending).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_runs_by_status(RunStatus::Running).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_runs_by_status(RunStatus::Success).await.unwrap(),
            0
        );
    }
}
