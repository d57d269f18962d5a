// Event log commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum EventCommand {
    /// Record an event
    Log {
        /// Project ID
        #[arg(long, short)]
        project: i64,

        /// Run the event is attached to
        #[arg(long)]
        run: Option<i64>,

        /// Event type
        #[arg(long, default_value = "info", value_parser = ["info", "warning", "error", "run", "metric"])]
        event_type: String,

        /// Event message
        #[arg(long, short)]
        message: Option<String>,

        /// Free-form JSON metadata
        #[arg(long)]
        metadata: Option<String>,
    },

    /// List events
    List {
        /// Only events for this project
        #[arg(long, short)]
        project: Option<i64>,

        /// Only events attached to this run
        #[arg(long)]
        run: Option<i64>,

        /// Only events of this type
        #[arg(long, value_parser = ["info", "warning", "error", "run", "metric"])]
        event_type: Option<String>,
    },

    /// Get event by ID
    Get {
        /// Event ID
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct CreateEventRequest {
    project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<i64>,
    event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
}

/// Event response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub timestamp: String,
    pub project_id: i64,
    #[serde(default)]
    pub run_id: Option<i64>,
    pub event_type: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: EventCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        EventCommand::Log {
            project,
            run,
            event_type,
            message,
            metadata,
        } => {
            log(
                client,
                output,
                quiet,
                CreateEventRequest {
                    project_id: project,
                    run_id: run,
                    event_type,
                    message,
                    metadata,
                },
            )
            .await
        }
        EventCommand::List {
            project,
            run,
            event_type,
        } => list(client, output, project, run, event_type).await,
        EventCommand::Get { id } => get(client, output, id).await,
    }
}

async fn log(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    request: CreateEventRequest,
) -> Result<()> {
    let event: Event = client.post("/events", &request).await?;

    if output.is_text() {
        if quiet {
            println!("{}", event.id);
        } else {
            println!("Recorded event: {}", event.id);
            print_field("Project", &event.project_id.to_string());
            print_field("Type", &event.event_type);
        }
    } else {
        output.print_value(&event);
    }

    Ok(())
}

async fn list(
    client: &Client,
    output: OutputFormat,
    project: Option<i64>,
    run: Option<i64>,
    event_type: Option<String>,
) -> Result<()> {
    let mut params = Vec::new();
    if let Some(project) = project {
        params.push(format!("project_id={}", project));
    }
    if let Some(run) = run {
        params.push(format!("run_id={}", run));
    }
    if let Some(event_type) = &event_type {
        params.push(format!("event_type={}", event_type));
    }
    let path = if params.is_empty() {
        "/events".to_string()
    } else {
        format!("/events?{}", params.join("&"))
    };

    let response: ListResponse<Event> = client.get(&path).await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No events found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("PROJECT", 8), ("TYPE", 8), ("MESSAGE", 40)]);

        for event in &response.data {
            let message = event.message.as_deref().unwrap_or("-");
            print_table_row(&[
                (&event.id.to_string(), 6),
                (&event.project_id.to_string(), 8),
                (&event.event_type, 8),
                (message, 40),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let event: Event = client
        .get(&format!("/events/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Event not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &event.id.to_string());
        print_field("Project", &event.project_id.to_string());
        if let Some(run) = event.run_id {
            print_field("Run", &run.to_string());
        }
        print_field("Type", &event.event_type);
        print_field("Timestamp", &event.timestamp);
        if let Some(message) = &event.message {
            print_field("Message", message);
        }
        if let Some(metadata) = &event.metadata {
            print_field("Metadata", metadata);
        }
    } else {
        output.print_value(&event);
    }

    Ok(())
}
