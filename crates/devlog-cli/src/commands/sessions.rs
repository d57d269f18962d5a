// Working session commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Start a new session
    Start {
        /// Project ID
        #[arg(long, short)]
        project: i64,
    },

    /// List sessions
    List {
        /// Only sessions for this project
        #[arg(long, short)]
        project: Option<i64>,
    },

    /// Get session by ID
    Get {
        /// Session ID
        id: i64,
    },

    /// End an open session
    End {
        /// Session ID
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest {
    project_id: i64,
}

/// Session response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub project_id: i64,
    pub started_at: String,
    #[serde(default)]
    pub ended_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: SessionCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        SessionCommand::Start { project } => start(client, output, quiet, project).await,
        SessionCommand::List { project } => list(client, output, project).await,
        SessionCommand::Get { id } => get(client, output, id).await,
        SessionCommand::End { id } => end(client, output, quiet, id).await,
    }
}

async fn start(client: &Client, output: OutputFormat, quiet: bool, project_id: i64) -> Result<()> {
    let session: Session = client
        .post("/sessions", &CreateSessionRequest { project_id })
        .await?;

    if output.is_text() {
        if quiet {
            println!("{}", session.id);
        } else {
            println!("Started session: {}", session.id);
            print_field("Project", &session.project_id.to_string());
            print_field("Started", &session.started_at);
        }
    } else {
        output.print_value(&session);
    }

    Ok(())
}

async fn list(client: &Client, output: OutputFormat, project: Option<i64>) -> Result<()> {
    let path = match project {
        Some(project) => format!("/sessions?project_id={}", project),
        None => "/sessions".to_string(),
    };
    let response: ListResponse<Session> = client.get(&path).await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No sessions found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("PROJECT", 8), ("STARTED", 25), ("ENDED", 25)]);

        for session in &response.data {
            let ended = session.ended_at.as_deref().unwrap_or("-");
            print_table_row(&[
                (&session.id.to_string(), 6),
                (&session.project_id.to_string(), 8),
                (&session.started_at, 25),
                (ended, 25),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let session: Session = client
        .get(&format!("/sessions/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Session not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &session.id.to_string());
        print_field("Project", &session.project_id.to_string());
        print_field("Started", &session.started_at);
        if let Some(ended) = &session.ended_at {
            print_field("Ended", ended);
        }
    } else {
        output.print_value(&session);
    }

    Ok(())
}

async fn end(client: &Client, output: OutputFormat, quiet: bool, id: i64) -> Result<()> {
    let session: Session = client
        .patch(&format!("/sessions/{}/end", id), &serde_json::json!({}))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Session not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        if quiet {
            println!("{}", session.id);
        } else {
            println!("Ended session: {}", session.id);
            if let Some(ended) = &session.ended_at {
                print_field("Ended", ended);
            }
        }
    } else {
        output.print_value(&session);
    }

    Ok(())
}
