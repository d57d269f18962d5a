// Code snippet commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum SnippetCommand {
    /// Store a code snippet
    Create {
        /// Project ID
        #[arg(long, short)]
        project: i64,

        /// Read the snippet body from this file
        #[arg(long, short)]
        file: Option<String>,

        /// Snippet body given inline
        #[arg(long)]
        code: Option<String>,

        /// Language tag (defaults to "generic" server-side)
        #[arg(long, short)]
        language: Option<String>,
    },

    /// List snippets
    List {
        /// Only snippets for this project
        #[arg(long, short)]
        project: Option<i64>,

        /// Only snippets with this language tag
        #[arg(long, short)]
        language: Option<String>,
    },

    /// Get snippet by ID
    Get {
        /// Snippet ID
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct CreateSnippetRequest {
    project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    code: String,
}

/// Snippet response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub filename: Option<String>,
    pub language: String,
    pub code: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

pub async fn run(
    command: SnippetCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        SnippetCommand::Create {
            project,
            file,
            code,
            language,
        } => create(client, output, quiet, project, file, code, language).await,
        SnippetCommand::List { project, language } => list(client, output, project, language).await,
        SnippetCommand::Get { id } => get(client, output, id).await,
    }
}

async fn create(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    project_id: i64,
    file: Option<String>,
    code: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let (code, filename) = match (code, file) {
        (Some(code), file) => (code, file),
        (None, Some(file)) => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file))?;
            (code, Some(file))
        }
        (None, None) => anyhow::bail!("Either --code or --file is required"),
    };

    let request = CreateSnippetRequest {
        project_id,
        filename,
        language,
        code,
    };

    let snippet: CodeSnippet = client.post("/snippets", &request).await?;

    if output.is_text() {
        if quiet {
            println!("{}", snippet.id);
        } else {
            println!("Stored snippet: {}", snippet.id);
            print_field("Project", &snippet.project_id.to_string());
            print_field("Language", &snippet.language);
            if let Some(filename) = &snippet.filename {
                print_field("Filename", filename);
            }
        }
    } else {
        output.print_value(&snippet);
    }

    Ok(())
}

async fn list(
    client: &Client,
    output: OutputFormat,
    project: Option<i64>,
    language: Option<String>,
) -> Result<()> {
    let mut params = Vec::new();
    if let Some(project) = project {
        params.push(format!("project_id={}", project));
    }
    if let Some(language) = &language {
        params.push(format!("language={}", language));
    }
    let path = if params.is_empty() {
        "/snippets".to_string()
    } else {
        format!("/snippets?{}", params.join("&"))
    };

    let response: ListResponse<CodeSnippet> = client.get(&path).await?;

    if output.is_text() {
        if response.data.is_empty() {
            println!("No snippets found");
            return Ok(());
        }

        print_table_header(&[("ID", 6), ("PROJECT", 8), ("LANGUAGE", 10), ("FILENAME", 30)]);

        for snippet in &response.data {
            let filename = snippet.filename.as_deref().unwrap_or("-");
            print_table_row(&[
                (&snippet.id.to_string(), 6),
                (&snippet.project_id.to_string(), 8),
                (&snippet.language, 10),
                (filename, 30),
            ]);
        }
    } else {
        output.print_value(&response);
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: i64) -> Result<()> {
    let snippet: CodeSnippet = client
        .get(&format!("/snippets/{}", id))
        .await
        .map_err(|e| match e {
            ClientError::NotFound => anyhow::anyhow!("Snippet not found: {}", id),
            e => e.into(),
        })?;

    if output.is_text() {
        print_field("ID", &snippet.id.to_string());
        print_field("Project", &snippet.project_id.to_string());
        print_field("Language", &snippet.language);
        if let Some(filename) = &snippet.filename {
            print_field("Filename", filename);
        }
        print_field("Created", &snippet.created_at);
        println!();
        println!("{}", snippet.code);
    } else {
        output.print_value(&snippet);
    }

    Ok(())
}
