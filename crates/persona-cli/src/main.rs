use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::AppContext;

#[derive(Parser)]
#[command(name = "persona")]
#[command(about = "PersonaChat RAG - chat with your documents", long_about = None)]
struct Cli {
    /// Keep config and data under this directory instead of the platform defaults
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add files to the knowledge base (.txt, .md, .csv, .pdf, .docx)
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Inspect or remove uploaded documents
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Print a link that carries a session and the documents
    Share { session_id: String },
    /// Open a route or link (/admin, /chat/<id>, .../#/share/<token>)
    Open { target: String },
    /// Chat in a session
    Chat { session_id: String },
}

#[derive(Subcommand)]
enum DocsAction {
    /// List uploaded documents
    List,
    /// Print a document's extracted text
    Show { id: String },
    /// Remove a document
    Remove { id: String },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// List sessions, newest first
    List,
    /// Create a session
    New {
        #[arg(long)]
        title: Option<String>,
    },
    /// Rename a session
    Rename { id: String, title: String },
    /// Set the wait after each answer, in seconds
    Delay { id: String, seconds: u32 },
    /// Delete a session
    Delete { id: String },
    /// Show dashboard numbers
    Stats,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::load(cli.home.as_deref())?;

    match cli.command {
        Commands::Upload { files } => commands::docs::upload(&ctx, &files),
        Commands::Docs { action } => match action {
            DocsAction::List => commands::docs::list(&ctx),
            DocsAction::Show { id } => commands::docs::show(&ctx, &id)?,
            DocsAction::Remove { id } => commands::docs::remove(&ctx, &id)?,
        },
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::sessions::list(&ctx),
            SessionsAction::New { title } => commands::sessions::create(&ctx, title.as_deref()),
            SessionsAction::Rename { id, title } => commands::sessions::rename(&ctx, &id, &title)?,
            SessionsAction::Delay { id, seconds } => {
                commands::sessions::set_delay(&ctx, &id, seconds)?
            }
            SessionsAction::Delete { id } => commands::sessions::delete(&ctx, &id)?,
            SessionsAction::Stats => commands::sessions::stats(&ctx),
        },
        Commands::Share { session_id } => commands::share::share(&ctx, &session_id)?,
        Commands::Open { target } => commands::share::open(&ctx, &target).await?,
        Commands::Chat { session_id } => commands::chat::run(&ctx, &session_id).await?,
    }

    Ok(())
}
