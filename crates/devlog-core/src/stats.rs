// Point-in-time statistics over the ledger

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entities::{EventType, RunStatus};
use crate::error::Result;
use crate::store::Store;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Snapshot of ledger totals with per-status and per-type breakdowns
///
/// Breakdown maps always carry every enum value, zero-filled, so consumers
/// never have to special-case a missing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Summary {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_sessions: i64,
    pub total_snippets: i64,
    pub total_runs: i64,
    pub total_events: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub runs_by_status: BTreeMap<RunStatus, i64>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub events_by_type: BTreeMap<EventType, i64>,
}

/// Computes [`Summary`] snapshots from store counts
#[derive(Clone)]
pub struct StatsEngine {
    store: Arc<dyn Store>,
}

impl StatsEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Read-only snapshot of the whole ledger
    pub async fn summary(&self) -> Result<Summary> {
        let mut runs_by_status = BTreeMap::new();
        for status in RunStatus::ALL {
            runs_by_status.insert(status, self.store.count_runs_by_status(status).await?);
        }
        let mut events_by_type = BTreeMap::new();
        for event_type in EventType::ALL {
            events_by_type.insert(event_type, self.store.count_events_by_type(event_type).await?);
        }
        Ok(Summary {
            total_users: self.store.count_users().await?,
            total_projects: self.store.count_projects().await?,
            total_sessions: self.store.count_sessions().await?,
            total_snippets: self.store.count_snippets().await?,
            total_runs: self.store.count_runs().await?,
            total_events: self.store.count_events().await?,
            runs_by_status,
            events_by_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::memory::MemoryStore;
    use crate::store::{NewEvent, NewProject, NewRun, NewSession, NewUser, RunPatch};

    #[tokio::test]
    async fn test_empty_store_summary_is_zero_filled() {
        let stats = StatsEngine::new(Arc::new(MemoryStore::new()));
        let summary = stats.summary().await.unwrap();
        assert_eq!(summary.total_users, 0);
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.runs_by_status.len(), 4);
        assert_eq!(summary.events_by_type.len(), 5);
        assert!(summary.runs_by_status.values().all(|&n| n == 0));
        assert!(summary.events_by_type.values().all(|&n| n == 0));
    }

    #[tokio::test]
    async fn test_breakdowns_sum_to_totals() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Ledger::new(store.clone());
        let user = ledger
            .create_user(NewUser {
                username: "alice".to_string(),
            })
            .await
            .unwrap();
        let project = ledger
            .create_project(NewProject {
                name: "demo".to_string(),
                description: None,
                owner_id: Some(user.id),
            })
            .await
            .unwrap();
        let session = ledger
            .create_session(NewSession {
                project_id: project.id,
            })
            .await
            .unwrap();
        for _ in 0..3 {
            ledger
                .create_run(NewRun {
                    session_id: session.id,
                    snippet_id: None,
                })
                .await
                .unwrap();
        }
        let runs = ledger
            .list_runs(Default::default(), Default::default())
            .await
            .unwrap();
        ledger
            .update_run(
                runs[0].id,
                RunPatch {
                    status: Some(RunStatus::Running),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        for event_type in [EventType::Info, EventType::Info, EventType::Error] {
            ledger
                .create_event(NewEvent {
                    project_id: project.id,
                    run_id: None,
                    event_type,
                    message: None,
                    metadata: None,
                })
                .await
                .unwrap();
        }

        let summary = StatsEngine::new(store).summary().await.unwrap();
        assert_eq!(summary.total_runs, 3);
        assert_eq!(summary.runs_by_status.values().sum::<i64>(), 3);
        assert_eq!(summary.runs_by_status[&RunStatus::Pending], 2);
        assert_eq!(summary.runs_by_status[&RunStatus::Running], 1);
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.events_by_type.values().sum::<i64>(), 3);
        assert_eq!(summary.events_by_type[&EventType::Info], 2);
        assert_eq!(summary.events_by_type[&EventType::Error], 1);
    }

    #[test]
    fn test_summary_serializes_enum_keys_as_strings() {
        let mut runs_by_status = BTreeMap::new();
        for status in RunStatus::ALL {
            runs_by_status.insert(status, 0);
        }
        let mut events_by_type = BTreeMap::new();
        for event_type in EventType::ALL {
            events_by_type.insert(event_type, 0);
        }
        let summary = Summary {
            total_users: 0,
            total_projects: 0,
            total_sessions: 0,
            total_snippets: 0,
            total_runs: 0,
            total_events: 0,
            runs_by_status,
            events_by_type,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["runs_by_status"]["pending"].is_i64());
        assert!(json["events_by_type"]["metric"].is_i64());
    }
}
