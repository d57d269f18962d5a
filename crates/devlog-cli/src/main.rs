// Devlog CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json output formats for scripting.
// Design Decision: Use reqwest for HTTP client (already in workspace).

mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devlog")]
#[command(about = "Devlog CLI - Record projects, sessions, runs, and events")]
#[command(version)]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "DEVLOG_API_URL", default_value = "http://127.0.0.1:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: commands::users::UserCommand,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        command: commands::projects::ProjectCommand,
    },

    /// Manage working sessions
    Session {
        #[command(subcommand)]
        command: commands::sessions::SessionCommand,
    },

    /// Manage code snippets
    Snippet {
        #[command(subcommand)]
        command: commands::snippets::SnippetCommand,
    },

    /// Manage runs
    Run {
        #[command(subcommand)]
        command: commands::runs::RunCommand,
    },

    /// Manage events
    Event {
        #[command(subcommand)]
        command: commands::events::EventCommand,
    },

    /// Show ledger-wide statistics
    Stats,

    /// Record a commit from a git hook (always exits 0)
    AutoCommit {
        /// Project name
        #[arg(long)]
        project: String,

        /// Commit message
        #[arg(long, short)]
        message: String,

        /// Commit hash
        #[arg(long)]
        commit_hash: Option<String>,

        /// Git user name
        #[arg(long)]
        git_user: Option<String>,
    },

    /// Record an ad-hoc event from automation (always exits 0)
    AutoEvent {
        /// Project name
        #[arg(long)]
        project: String,

        /// Event type
        #[arg(long, default_value = "info")]
        event_type: String,

        /// Event message
        #[arg(long, short)]
        message: Option<String>,

        /// Git user name
        #[arg(long)]
        git_user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = client::Client::new(&cli.api_url);
    let output_format = output::OutputFormat::from_str(&cli.output);

    match cli.command {
        Commands::User { command } => {
            commands::users::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Project { command } => {
            commands::projects::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Session { command } => {
            commands::sessions::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Snippet { command } => {
            commands::snippets::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Run { command } => {
            commands::runs::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Event { command } => {
            commands::events::run(command, &client, output_format, cli.quiet).await
        }
        Commands::Stats => commands::stats::run(&client, output_format).await,
        Commands::AutoCommit {
            project,
            message,
            commit_hash,
            git_user,
        } => {
            commands::auto::commit(
                &client,
                output_format,
                cli.quiet,
                project,
                message,
                commit_hash,
                git_user,
            )
            .await
        }
        Commands::AutoEvent {
            project,
            event_type,
            message,
            git_user,
        } => {
            commands::auto::event(
                &client,
                output_format,
                cli.quiet,
                project,
                event_type,
                message,
                git_user,
            )
            .await
        }
    }
}
