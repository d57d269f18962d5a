// Integration tests for Devlog API
// Run with: cargo test --test integration_test -- --ignored
//
// Requires a running server (DATABASE_URL set, `cargo run -p devlog-api`).

use devlog_core::{Event, IngestOutcome, Project, Run, RunStatus, Session, Summary, User};
use serde_json::{json, Value};

const API_BASE_URL: &str = "http://localhost:8000";

fn unwrap_data<T: serde::de::DeserializeOwned>(body: Value) -> Vec<T> {
    serde_json::from_value(body["data"].clone()).expect("Failed to parse data array")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_full_ledger_workflow() {
    let client = reqwest::Client::new();

    println!("🧪 Testing full ledger workflow...");

    // Step 1: Create a user
    println!("\n📝 Step 1: Creating user...");
    let suffix = chrono::Utc::now().timestamp_millis();
    let username = format!("it-user-{suffix}");
    let create_user_response = client
        .post(format!("{}/users", API_BASE_URL))
        .json(&json!({ "username": username }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(
        create_user_response.status(),
        201,
        "Expected 201 Created, got {}",
        create_user_response.status()
    );

    let user: User = create_user_response
        .json()
        .await
        .expect("Failed to parse user response");
    println!("✅ Created user: {}", user.id);
    assert_eq!(user.username, username);

    // Duplicate usernames are rejected
    let dup_response = client
        .post(format!("{}/users", API_BASE_URL))
        .json(&json!({ "username": username }))
        .send()
        .await
        .expect("Failed to re-create user");
    assert_eq!(dup_response.status(), 409);

    // Step 2: Create a project owned by that user
    println!("\n📝 Step 2: Creating project...");
    let create_project_response = client
        .post(format!("{}/projects", API_BASE_URL))
        .json(&json!({
            "name": format!("it-project-{suffix}"),
            "description": "Integration test project",
            "owner_id": user.id
        }))
        .send()
        .await
        .expect("Failed to create project");

    assert_eq!(create_project_response.status(), 201);
    let project: Project = create_project_response
        .json()
        .await
        .expect("Failed to parse project response");
    println!("✅ Created project: {}", project.id);
    assert_eq!(project.owner_id, Some(user.id));

    // Step 3: Start a session
    println!("\n📝 Step 3: Starting session...");
    let session: Session = client
        .post(format!("{}/sessions", API_BASE_URL))
        .json(&json!({ "project_id": project.id }))
        .send()
        .await
        .expect("Failed to create session")
        .json()
        .await
        .expect("Failed to parse session response");
    println!("✅ Started session: {}", session.id);
    assert!(session.ended_at.is_none());

    // Step 4: Register a run and walk it through its lifecycle
    println!("\n📝 Step 4: Running...");
    let run: Run = client
        .post(format!("{}/runs", API_BASE_URL))
        .json(&json!({ "session_id": session.id }))
        .send()
        .await
        .expect("Failed to create run")
        .json()
        .await
        .expect("Failed to parse run response");
    assert_eq!(run.status, RunStatus::Pending);

    let run: Run = client
        .patch(format!("{}/runs/{}", API_BASE_URL, run.id))
        .json(&json!({ "status": "running" }))
        .send()
        .await
        .expect("Failed to start run")
        .json()
        .await
        .expect("Failed to parse run response");
    assert_eq!(run.status, RunStatus::Running);

    let run: Run = client
        .patch(format!("{}/runs/{}", API_BASE_URL, run.id))
        .json(&json!({
            "status": "success",
            "stdout": "42\n",
            "duration": 0.5
        }))
        .send()
        .await
        .expect("Failed to finish run")
        .json()
        .await
        .expect("Failed to parse run response");
    println!("✅ Run {} finished: {}", run.id, run.status);
    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.stdout.as_deref(), Some("42\n"));

    // Step 5: Attach an event to the run
    println!("\n📝 Step 5: Recording event...");
    let event: Event = client
        .post(format!("{}/events", API_BASE_URL))
        .json(&json!({
            "project_id": project.id,
            "run_id": run.id,
            "event_type": "run",
            "message": "run finished"
        }))
        .send()
        .await
        .expect("Failed to create event")
        .json()
        .await
        .expect("Failed to parse event response");
    println!("✅ Recorded event: {}", event.id);

    // Step 6: Listing runs for the session includes ours
    let list_response = client
        .get(format!("{}/runs?session_id={}", API_BASE_URL, session.id))
        .send()
        .await
        .expect("Failed to list runs");
    assert_eq!(list_response.status(), 200);
    let runs: Vec<Run> = unwrap_data(list_response.json().await.expect("Failed to parse body"));
    assert!(runs.iter().any(|r| r.id == run.id));

    // Step 7: End the session
    println!("\n📝 Step 7: Ending session...");
    let session: Session = client
        .patch(format!("{}/sessions/{}/end", API_BASE_URL, session.id))
        .send()
        .await
        .expect("Failed to end session")
        .json()
        .await
        .expect("Failed to parse session response");
    assert!(session.ended_at.is_some());

    // Step 8: Summary reflects the new records
    println!("\n📊 Step 8: Checking summary...");
    let summary: Summary = client
        .get(format!("{}/stats/summary", API_BASE_URL))
        .send()
        .await
        .expect("Failed to get summary")
        .json()
        .await
        .expect("Failed to parse summary");
    println!("✅ Summary: {} run(s) total", summary.total_runs);
    assert!(summary.total_users >= 1);
    assert!(summary.total_runs >= 1);
    assert!(summary.runs_by_status.values().sum::<i64>() == summary.total_runs);
}

#[tokio::test]
#[ignore]
async fn test_auto_ingestion_is_idempotent() {
    let client = reqwest::Client::new();

    let suffix = chrono::Utc::now().timestamp_millis();
    let notice = json!({
        "project": format!("it-hook-{suffix}"),
        "message": "wip",
        "commit_hash": "abc123",
        "git_user": format!("it-hooker-{suffix}")
    });

    let first: IngestOutcome = client
        .post(format!("{}/auto/commit", API_BASE_URL))
        .json(&notice)
        .send()
        .await
        .expect("Failed to post commit notice")
        .json()
        .await
        .expect("Failed to parse outcome");
    assert!(first.event_id.is_some());

    // Same actor and project resolve to the same rows on repeat
    let second: IngestOutcome = client
        .post(format!("{}/auto/commit", API_BASE_URL))
        .json(&notice)
        .send()
        .await
        .expect("Failed to post commit notice")
        .json()
        .await
        .expect("Failed to parse outcome");
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.project_id, first.project_id);
    assert_ne!(second.event_id, first.event_id);
}
