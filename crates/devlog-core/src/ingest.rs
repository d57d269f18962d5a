// Best-effort ingestion of git hook notifications
//
// Each step runs independently and downgrades its own failure to a warning,
// so a broken ledger never fails the git operation that triggered the hook.
// The outcome struct records how far ingestion got for logging and tests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entities::EventType;
use crate::ledger::Ledger;
use crate::resolver::Resolver;
use crate::store::NewEvent;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Actor name used when the hook cannot determine the git user
pub const FALLBACK_ACTOR: &str = "unknown";

/// Commit notification from a post-commit hook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CommitNotice {
    pub project: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_user: Option<String>,
}

/// Generic event notification from automation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventNotice {
    pub project: String,
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_user: Option<String>,
}

/// What each ingestion step produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct IngestOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
}

/// Turns commit and automation notices into ledger events
#[derive(Clone)]
pub struct IngestFacade {
    ledger: Arc<Ledger>,
    resolver: Resolver,
}

impl IngestFacade {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        let resolver = Resolver::new(ledger.clone());
        Self { ledger, resolver }
    }

    /// Record a commit as an info event against the named project
    pub async fn record_commit(&self, notice: CommitNotice) -> IngestOutcome {
        let actor = notice.git_user.as_deref().unwrap_or(FALLBACK_ACTOR);
        let mut metadata = serde_json::Map::new();
        if let Some(hash) = &notice.commit_hash {
            metadata.insert("commit_hash".to_string(), json!(hash));
        }
        metadata.insert("git_user".to_string(), json!(actor));
        self.record(
            &notice.project,
            actor,
            EventType::Info,
            Some(format!("Commit: {}", notice.message)),
            serde_json::Value::Object(metadata).to_string(),
        )
        .await
    }

    /// Record an automation event verbatim against the named project
    pub async fn record_event(&self, notice: EventNotice) -> IngestOutcome {
        let actor = notice.git_user.as_deref().unwrap_or(FALLBACK_ACTOR);
        let metadata = json!({ "git_user": actor }).to_string();
        self.record(
            &notice.project,
            actor,
            notice.event_type,
            notice.message.clone(),
            metadata,
        )
        .await
    }

    async fn record(
        &self,
        project_name: &str,
        actor: &str,
        event_type: EventType,
        message: Option<String>,
        metadata: String,
    ) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        let user = self.resolver.resolve_user(actor).await;
        outcome.user_id = user.as_ref().map(|u| u.id);

        let Some(project) = self
            .resolver
            .resolve_project(project_name, actor, user.as_ref())
            .await
        else {
            tracing::warn!(
                project = project_name,
                actor,
                "ingestion stopped, project could not be resolved"
            );
            return outcome;
        };
        outcome.project_id = Some(project.id);

        match self
            .ledger
            .create_event(NewEvent {
                project_id: project.id,
                run_id: None,
                event_type,
                message,
                metadata: Some(metadata),
            })
            .await
        {
            Ok(event) => outcome.event_id = Some(event.id),
            Err(err) => {
                tracing::warn!(
                    project_id = project.id,
                    error = %err,
                    "ingestion event submission failed"
                );
            }
        }
        outcome
    }
}
