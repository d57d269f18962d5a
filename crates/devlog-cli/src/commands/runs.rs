// Run lifecycle commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum RunCommand {
    /// Register a new run
    Create {
        /// Session ID
        #[arg(long, short)]
        session: i64,

        /// Snippet ID being executed
        #[arg(long)]
        snippet: Option<i64>,
    },

    /// List runs
    List {
        /// Only runs for this session
        #[arg(long, short)]
        session: Option<i64>,

        /// Only runs with this status
        #[arg(long, value_parser = ["pending", "running", "success", "failed"])]
        status: Option<String>,
    },

    /// Get run by ID
    Get {
        /// Run ID
        id: i64,
    },

    /// Update a run
    Update {
        /// Run ID
        id: i64,

        /// New status
        #[arg(long, value_parser = ["pending", "running", "success", "failed"])]
        status: Option<String>,

        /// Wall-clock duration in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Captured standard output
        #[arg(long)]
        stdout: Option<String>,

        /// Captured standard error
        #[arg(long)]
        stderr: Option<String>,

        /// Stringified return value
        #[arg(long)]
        return_value: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct CreateRunRequest {
    session_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct UpdateRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_value: Option<String>,
}

/// Run response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    pub session_id: i64,
    #[serde(default)]
    pub snippet_id: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub return_value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: RunCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        RunCommand::Create { session, snippet } => {
            create(client, output, quiet, session, snippet).await
        }
        RunCommand::List { session, status } => list(client, output, session, status).await,
        RunCommand::Get { id } => get(client, output, id).await,
        RunCommand::Update {
            id,
            status,
            duration,
            stdout,
            stderr,
            return_value,
        } => {
            update(
                client,
                output,
                quiet,
                id,
                UpdateRunRequest {
                    status,
                    duration,
                    stdout,
                    stderr,
                    return_value,
                },
            )
            .await
        }
    }
}

async fn create(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    session_id: i64,
    snippet_id: Option<i64>,
) -> Result<()> {
    let run: Run = client
        .post(
            "/runs",
            &CreateRunRequest {
                session_id,
                snippet_id,
            },
        )
        .await?;

    if output.is_text() {
        if quiet {
            println!("{}", run.id);
        } else {
            println!("Registered run: {}", run.id);
            print_field("Session", &run.session_id.to_string());
            print_field("Status", &run.status);
        }
    } else {
        output.print_value(&run);
    }

    Ok(())
}

async fn list(
    client: &Client,
    output: OutputFormat,
    session: Option<i64>,
    status: Option<String>,
) -> Result<()> {
    let mut params = Vec::new();
    if let Some(session) = session {
        params.push(format!("session_id={}", session));
    }
    if let Some(status) = &status {
        params.push(format!("status={}", status));
    }
    let path = if params.is_empty() {
        "/runs".to_string()
    } else {
        format!("/runs?{}", params.join("&"))
    };

    let response: ListResponse<Run> = client.get(&path).await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No runs found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("SESSION", 8), ("STATUS", 9), ("DURATION", 10)]);

        for run in &response.data {
            let duration = run
                .duration
                .map(|d| format!("{:.3}s", d))
                .unwrap_or_else(|| "-".to_string());
            print_table_row(&[
                (&run.id.to_string(), 6),
                (&run.session_id.to_string(), 8),
                (&run.status, 9),
                (&duration, 10),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let run: Run = client
        .get(&format!("/runs/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Run not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &run.id.to_string());
        print_field("Session", &run.session_id.to_string());
        if let Some(snippet) = run.snippet_id {
            print_field("Snippet", &snippet.to_string());
        }
        print_field("Status", &run.status);
        if let Some(duration) = run.duration {
            print_field("Duration", &format!("{:.3}s", duration));
        }
        if let Some(stdout) = &run.stdout {
            println!();
            println!("{}", stdout);
        }
        if let Some(stderr) = &run.stderr {
            eprintln!("{}", stderr);
        }
    } else {
        output.print_value(&run);
    }

    Ok(())
}

async fn update(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    id: i64,
    request: UpdateRunRequest,
) -> Result<()> {
    let run: Run = client
        .patch(&format!("/runs/{}", id), &request)
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Run not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        if quiet {
            println!("{}", run.id);
        } else {
            println!("Updated run: {}", run.id);
            print_field("Status", &run.status);
        }
    } else {
        output.print_value(&run);
    }

    Ok(())
}
