// Git hook entry points
//
// These commands swallow every error and exit 0: a broken or unreachable
// ledger must never fail the git operation that triggered the hook.

use crate::client::Client;
use crate::output::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CommitNotice {
    project: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_user: Option<String>,
}

#[derive(Debug, Serialize)]
struct EventNotice {
    project: String,
    event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_user: Option<String>,
}

/// Outcome response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub event_id: Option<i64>,
}

pub async fn commit(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    project: String,
    message: String,
    commit_hash: Option<String>,
    git_user: Option<String>,
) -> Result<()> {
    let notice = CommitNotice {
        project,
        message,
        commit_hash,
        git_user,
    };

    match client.post::<IngestOutcome, _>("/auto/commit", &notice).await {
        Ok(outcome) => report(output, quiet, &outcome),
        Err(e) => {
            eprintln!("devlog: commit not recorded: {}", e);
        }
    }

    Ok(())
}

pub async fn event(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    project: String,
    event_type: String,
    message: Option<String>,
    git_user: Option<String>,
) -> Result<()> {
    let notice = EventNotice {
        project,
        event_type,
        message,
        git_user,
    };

    match client.post::<IngestOutcome, _>("/auto/event", &notice).await {
        Ok(outcome) => report(output, quiet, &outcome),
        Err(e) => {
            eprintln!("devlog: event not recorded: {}", e);
        }
    }

    Ok(())
}

fn report(output: OutputFormat, quiet: bool, outcome: &IngestOutcome) {
    if quiet {
        return;
    }
    if output.is_text() {
        match outcome.event_id {
            Some(id) => println!("Recorded event: {}", id),
            None => println!("Nothing recorded"),
        }
    } else {
        output.print_value(outcome);
    }
}
