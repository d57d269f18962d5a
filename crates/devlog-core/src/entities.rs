// Ledger domain types
//
// These types represent the six record kinds tracked by the ledger.
// Used by the API, storage, and CLI crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Lifecycle status of a run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
}

impl RunStatus {
    /// Every status, in lifecycle order
    pub const ALL: [RunStatus; 4] = [
        RunStatus::Pending,
        RunStatus::Running,
        RunStatus::Success,
        RunStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
        }
    }

    /// Whether moving from `self` to `next` follows the normal lifecycle
    /// (pending -> running -> success | failed). Re-asserting the current
    /// status always counts as in-order.
    pub fn allows(&self, next: RunStatus) -> bool {
        *self == next
            || matches!(
                (self, next),
                (RunStatus::Pending, RunStatus::Running)
                    | (RunStatus::Running, RunStatus::Success)
                    | (RunStatus::Running, RunStatus::Failed)
            )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "running" => RunStatus::Running,
            "success" => RunStatus::Success,
            "failed" => RunStatus::Failed,
            _ => RunStatus::Pending,
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RunStatus::Pending),
            "running" => Ok(RunStatus::Running),
            "success" => Ok(RunStatus::Success),
            "failed" => Ok(RunStatus::Failed),
            other => Err(format!("unknown run status '{other}'")),
        }
    }
}

/// Category of a logged event
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Info,
    Warning,
    Error,
    Run,
    Metric,
}

impl EventType {
    /// Every event type
    pub const ALL: [EventType; 5] = [
        EventType::Info,
        EventType::Warning,
        EventType::Error,
        EventType::Run,
        EventType::Metric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Info => "info",
            EventType::Warning => "warning",
            EventType::Error => "error",
            EventType::Run => "run",
            EventType::Metric => "metric",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "warning" => EventType::Warning,
            "error" => EventType::Error,
            "run" => EventType::Run,
            "metric" => EventType::Metric,
            _ => EventType::Info,
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(EventType::Info),
            "warning" => Ok(EventType::Warning),
            "error" => Ok(EventType::Error),
            "run" => Ok(EventType::Run),
            "metric" => Ok(EventType::Metric),
            other => Err(format!("unknown event type '{other}'")),
        }
    }
}

/// User - an actor recorded against projects and commits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Project - the top-level grouping for sessions, snippets, and events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

/// Session - a bounded working period within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Session {
    pub id: i64,
    pub project_id: i64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// CodeSnippet - a stored piece of code belonging to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CodeSnippet {
    pub id: i64,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub language: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Run - one execution attempt within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Run {
    pub id: i64,
    pub session_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_id: Option<i64>,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
}

/// Event - an append-only log entry attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<i64>,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Opaque JSON payload, stored verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_serde() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Pending).unwrap(),
            r#""pending""#
        );
        let status: RunStatus = serde_json::from_str(r#""failed""#).unwrap();
        assert_eq!(status, RunStatus::Failed);
    }

    #[test]
    fn test_run_status_rejects_unknown_at_serde_boundary() {
        let result: Result<RunStatus, _> = serde_json::from_str(r#""cancelled""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_status_parse() {
        assert_eq!("running".parse::<RunStatus>().unwrap(), RunStatus::Running);
        assert!("bogus".parse::<RunStatus>().is_err());
    }

    #[test]
    fn test_run_status_lifecycle() {
        assert!(RunStatus::Pending.allows(RunStatus::Running));
        assert!(RunStatus::Running.allows(RunStatus::Success));
        assert!(RunStatus::Running.allows(RunStatus::Failed));
        assert!(RunStatus::Running.allows(RunStatus::Running));
        assert!(!RunStatus::Pending.allows(RunStatus::Success));
        assert!(!RunStatus::Success.allows(RunStatus::Running));
        assert!(!RunStatus::Failed.allows(RunStatus::Pending));
    }

    #[test]
    fn test_event_type_serde() {
        assert_eq!(
            serde_json::to_string(&EventType::Metric).unwrap(),
            r#""metric""#
        );
        let ty: EventType = serde_json::from_str(r#""warning""#).unwrap();
        assert_eq!(ty, EventType::Warning);
        let result: Result<EventType, _> = serde_json::from_str(r#""debug""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_enum_domains_are_complete() {
        assert_eq!(RunStatus::ALL.len(), 4);
        assert_eq!(EventType::ALL.len(), 5);
        for status in RunStatus::ALL {
            assert_eq!(status.as_str().parse::<RunStatus>().unwrap(), status);
        }
        for ty in EventType::ALL {
            assert_eq!(ty.as_str().parse::<EventType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let project = Project {
            id: 1,
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        };
        let json = serde_json::to_string(&project).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("owner_id"));
    }
}
