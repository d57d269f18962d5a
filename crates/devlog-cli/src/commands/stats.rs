// Ledger-wide statistics command

use std::collections::BTreeMap;

use crate::client::Client;
use crate::output::{print_field, OutputFormat};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Summary response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_sessions: i64,
    pub total_snippets: i64,
    pub total_runs: i64,
    pub total_events: i64,
    pub runs_by_status: BTreeMap<String, i64>,
    pub events_by_type: BTreeMap<String, i64>,
}

pub async fn run(client: &Client, output: OutputFormat) -> Result<()> {
    let summary: Summary = client.get("/stats/summary").await?;

    if output.is_text() {
        print_field("Users", &summary.total_users.to_string());
        print_field("Projects", &summary.total_projects.to_string());
        print_field("Sessions", &summary.total_sessions.to_string());
        print_field("Snippets", &summary.total_snippets.to_string());
        print_field("Runs", &summary.total_runs.to_string());
        print_field("Events", &summary.total_events.to_string());

        println!();
        println!("Runs by status:");
        for (status, count) in &summary.runs_by_status {
            print_field(status, &count.to_string());
        }

        println!();
        println!("Events by type:");
        for (event_type, count) in &summary.events_by_type {
            print_field(event_type, &count.to_string());
        }
    } else {
        output.print_value(&summary);
    }

    Ok(())
}
