// Ledger behavior tests against the in-memory store

use std::sync::Arc;

use devlog_core::{
    Ledger, LedgerConfig, LedgerError, MemoryStore, NewEvent, NewProject, NewRun, NewSession,
    NewSnippet, NewUser, RecordKind, RunPatch, RunStatus, SessionFilter,
};

fn ledger() -> Ledger {
    Ledger::new(Arc::new(MemoryStore::new()))
}

fn strict_ledger() -> Ledger {
    Ledger::with_config(
        Arc::new(MemoryStore::new()),
        LedgerConfig {
            strict_transitions: true,
        },
    )
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let ledger = ledger();
    ledger
        .create_user(NewUser {
            username: "alice".to_string(),
        })
        .await
        .unwrap();
    let err = ledger
        .create_user(NewUser {
            username: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
}

#[tokio::test]
async fn test_empty_username_is_rejected() {
    let err = ledger()
        .create_user(NewUser {
            username: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn test_dangling_references_are_not_found() {
    let ledger = ledger();

    let err = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: Some(999),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::User,
            id: 999
        }
    ));

    let err = ledger
        .create_session(NewSession { project_id: 42 })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::Project,
            ..
        }
    ));

    let err = ledger
        .create_event(NewEvent {
            project_id: 42,
            run_id: None,
            event_type: devlog_core::EventType::Info,
            message: None,
            metadata: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[tokio::test]
async fn test_empty_snippet_code_is_rejected() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let err = ledger
        .create_snippet(NewSnippet {
            project_id: project.id,
            filename: None,
            language: None,
            code: "".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn test_new_run_starts_pending() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: None,
        })
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Pending);
    assert!(run.started_at.is_none());
}

#[tokio::test]
async fn test_empty_patch_is_identity() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: None,
        })
        .await
        .unwrap();

    let updated = ledger
        .update_run(run.id, RunPatch::default())
        .await
        .unwrap();
    assert_eq!(updated.id, run.id);
    assert_eq!(updated.status, run.status);
    assert_eq!(updated.started_at, run.started_at);
    assert_eq!(updated.ended_at, run.ended_at);
    assert_eq!(updated.duration, run.duration);
    assert_eq!(updated.stdout, run.stdout);
    assert_eq!(updated.stderr, run.stderr);
    assert_eq!(updated.return_value, run.return_value);
}

#[tokio::test]
async fn test_patch_touches_only_supplied_fields() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: None,
        })
        .await
        .unwrap();

    let started = chrono::Utc::now();
    ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Running),
                started_at: Some(started),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // stdout-only patch must not disturb status or timestamps
    let updated = ledger
        .update_run(
            run.id,
            RunPatch {
                stdout: Some("hello\n".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, RunStatus::Running);
    assert_eq!(updated.started_at, Some(started));
    assert_eq!(updated.stdout.as_deref(), Some("hello\n"));
    assert!(updated.ended_at.is_none());
}

#[tokio::test]
async fn test_permissive_mode_accepts_out_of_order_transition() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: None,
        })
        .await
        .unwrap();

    // pending -> success skips running, still accepted by default
    let updated = ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Success),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, RunStatus::Success);
}

#[tokio::test]
async fn test_strict_mode_rejects_out_of_order_transition() {
    let ledger = strict_ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: None,
        })
        .await
        .unwrap();

    let err = ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Success),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // the normal lifecycle still goes through
    let running = ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Running),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(running.status, RunStatus::Running);
    let failed = ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(failed.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_update_unknown_run_is_not_found() {
    let err = ledger()
        .update_run(777, RunPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::Run,
            id: 777
        }
    ));
}

#[tokio::test]
async fn test_end_session_stamps_ended_at() {
    let ledger = ledger();
    let project = ledger
        .create_project(NewProject {
            name: "demo".to_string(),
            description: None,
            owner_id: None,
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    assert!(session.ended_at.is_none());

    let ended = ledger.end_session(session.id).await.unwrap();
    assert!(ended.ended_at.is_some());
    assert!(ended.ended_at.unwrap() >= ended.started_at);

    let err = ledger.end_session(999).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: RecordKind::Session,
            ..
        }
    ));
}

// Full workflow: user -> project -> session -> snippet -> run lifecycle -> event
#[tokio::test]
async fn test_recorded_working_session_scenario() {
    let ledger = ledger();

    let alice = ledger
        .create_user(NewUser {
            username: "alice".to_string(),
        })
        .await
        .unwrap();
    let project = ledger
        .create_project(NewProject {
            name: "analytics".to_string(),
            description: Some("Data pipeline".to_string()),
            owner_id: Some(alice.id),
        })
        .await
        .unwrap();
    let session = ledger
        .create_session(NewSession {
            project_id: project.id,
        })
        .await
        .unwrap();
    let snippet = ledger
        .create_snippet(NewSnippet {
            project_id: project.id,
            filename: Some("etl.py".to_string()),
            language: Some("python".to_string()),
            code: "load()".to_string(),
        })
        .await
        .unwrap();
    let run = ledger
        .create_run(NewRun {
            session_id: session.id,
            snippet_id: Some(snippet.id),
        })
        .await
        .unwrap();

    let started = chrono::Utc::now();
    ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Running),
                started_at: Some(started),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let finished = ledger
        .update_run(
            run.id,
            RunPatch {
                status: Some(RunStatus::Success),
                ended_at: Some(started + chrono::Duration::seconds(2)),
                duration: Some(2.0),
                stdout: Some("rows=10".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(finished.status, RunStatus::Success);
    assert_eq!(finished.duration, Some(2.0));

    let event = ledger
        .create_event(NewEvent {
            project_id: project.id,
            run_id: Some(run.id),
            event_type: devlog_core::EventType::Run,
            message: Some("pipeline finished".to_string()),
            metadata: None,
        })
        .await
        .unwrap();
    assert_eq!(event.run_id, Some(run.id));

    let ended = ledger.end_session(session.id).await.unwrap();
    assert!(ended.ended_at.is_some());

    let sessions = ledger
        .list_sessions(
            SessionFilter {
                project_id: Some(project.id),
            },
            Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
}
