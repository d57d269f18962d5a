// User management commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a new user
    Create {
        /// Unique username
        username: String,
    },

    /// List users
    List,

    /// Get user by ID
    Get {
        /// User ID
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct CreateUserRequest {
    username: String,
}

/// User response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: UserCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        UserCommand::Create { username } => create(client, output, quiet, username).await,
        UserCommand::List => list(client, output).await,
        UserCommand::Get { id } => get(client, output, id).await,
    }
}

async fn create(client: &Client, output: OutputFormat, quiet: bool, username: String) -> Result<()> {
    let user: User = client
        .post("/users", &CreateUserRequest { username })
        .await?;

    if output.is_text() {
        if quiet {
            println!("{}", user.id);
        } else {
            println!("Created user: {}", user.id);
            print_field("Username", &user.username);
        }
    } else {
        output.print_value(&user);
    }

    Ok(())
}

async fn list(client: &Client, output: OutputFormat) -> Result<()> {
    let response: ListResponse<User> = client.get("/users").await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No users found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("USERNAME", 25), ("CREATED", 25)]);

        for user in &response.data {
            print_table_row(&[
                (&user.id.to_string(), 6),
                (&user.username, 25),
                (&user.created_at, 25),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let user: User = client
        .get(&format!("/users/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("User not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &user.id.to_string());
        print_field("Username", &user.username);
        print_field("Created", &user.created_at);
    } else {
        output.print_value(&user);
    }

    Ok(())
}
