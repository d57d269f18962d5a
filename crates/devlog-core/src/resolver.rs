// Find-or-create resolution of actors and projects
//
// Git hooks send names, not ids. The resolver turns a username or project
// name into a record, creating one on miss. Resolution is best-effort:
// storage failures are logged and absorbed so hook traffic never fails.

use std::sync::Arc;

use crate::entities::{Project, User};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::store::{NewProject, NewUser, Page, ProjectFilter, UserFilter};

/// Resolves usernames and project names, creating records on miss
#[derive(Clone)]
pub struct Resolver {
    ledger: Arc<Ledger>,
}

impl Resolver {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Resolve a user by exact username. Returns None on failure.
    pub async fn resolve_user(&self, username: &str) -> Option<User> {
        match self.try_resolve_user(username).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(username, error = %err, "user resolution failed");
                None
            }
        }
    }

    /// Resolve a project by exact name. A fresh project gets an auto-created
    /// description and the owner, when one was resolved. Returns None on
    /// failure.
    pub async fn resolve_project(
        &self,
        name: &str,
        actor: &str,
        owner: Option<&User>,
    ) -> Option<Project> {
        match self.try_resolve_project(name, actor, owner).await {
            Ok(project) => Some(project),
            Err(err) => {
                tracing::warn!(project = name, error = %err, "project resolution failed");
                None
            }
        }
    }

    async fn try_resolve_user(&self, username: &str) -> crate::error::Result<User> {
        let filter = UserFilter {
            username: Some(username.to_string()),
        };
        if let Some(user) = self
            .ledger
            .list_users(filter.clone(), Page::default())
            .await?
            .into_iter()
            .next()
        {
            return Ok(user);
        }
        match self
            .ledger
            .create_user(NewUser {
                username: username.to_string(),
            })
            .await
        {
            Ok(user) => Ok(user),
            // Lost the create race: the row exists now, re-read and reuse it
            Err(LedgerError::Conflict(_)) => self
                .ledger
                .list_users(filter, Page::default())
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    LedgerError::conflict(format!("user '{username}' vanished after conflict"))
                }),
            Err(err) => Err(err),
        }
    }

    async fn try_resolve_project(
        &self,
        name: &str,
        actor: &str,
        owner: Option<&User>,
    ) -> crate::error::Result<Project> {
        if let Some(project) = self
            .ledger
            .list_projects(
                ProjectFilter {
                    name: Some(name.to_string()),
                    owner_id: None,
                },
                Page::default(),
            )
            .await?
            .into_iter()
            .next()
        {
            return Ok(project);
        }
        self.ledger
            .create_project(NewProject {
                name: name.to_string(),
                description: Some(format!("Auto-created for {actor}")),
                owner_id: owner.map(|u| u.id),
            })
            .await
    }
}
