// Project management commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a new project
    Create {
        /// Project name
        name: String,

        /// Free-form description
        #[arg(long, short)]
        description: Option<String>,

        /// Owning user ID
        #[arg(long)]
        owner: Option<i64>,
    },

    /// List projects
    List {
        /// Only projects owned by this user
        #[arg(long)]
        owner: Option<i64>,
    },

    /// Get project by ID
    Get {
        /// Project ID
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct CreateProjectRequest {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_id: Option<i64>,
}

/// Project response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: ProjectCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        ProjectCommand::Create {
            name,
            description,
            owner,
        } => create(client, output, quiet, name, description, owner).await,
        ProjectCommand::List { owner } => list(client, output, owner).await,
        ProjectCommand::Get { id } => get(client, output, id).await,
    }
}

async fn create(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    name: String,
    description: Option<String>,
    owner_id: Option<i64>,
) -> Result<()> {
    let request = CreateProjectRequest {
        name,
        description,
        owner_id,
    };

    let project: Project = client.post("/projects", &request).await?;

    if output.is_text() {
        if quiet {
            println!("{}", project.id);
        } else {
            println!("Created project: {}", project.id);
            print_field("Name", &project.name);
            if let Some(owner) = project.owner_id {
                print_field("Owner", &owner.to_string());
            }
        }
    } else {
        output.print_value(&project);
    }

    Ok(())
}

async fn list(client: &Client, output: OutputFormat, owner: Option<i64>) -> Result<()> {
    let path = match owner {
        Some(owner) => format!("/projects?owner_id={}", owner),
        None => "/projects".to_string(),
    };
    let response: ListResponse<Project> = client.get(&path).await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No projects found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("NAME", 25), ("OWNER", 8), ("DESCRIPTION", 30)]);

        for project in &response.data {
            let owner = project
                .owner_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let description = project.description.as_deref().unwrap_or("-");
            print_table_row(&[
                (&project.id.to_string(), 6),
                (&project.name, 25),
                (&owner, 8),
                (description, 30),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let project: Project = client
        .get(&format!("/projects/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Project not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &project.id.to_string());
        print_field("Name", &project.name);
        if let Some(description) = &project.description {
            print_field("Description", description);
        }
        if let Some(owner) = project.owner_id {
            print_field("Owner", &owner.to_string());
        }
    } else {
        output.print_value(&project);
    }

    Ok(())
}
