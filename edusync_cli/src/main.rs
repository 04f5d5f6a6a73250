mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edusync_lib::{Client, MemoryCredentials};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "edusync")]
#[command(about = "Query and manage EduSync school data from the command line")]
struct Cli {
    /// Output format: table, json or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Backend base URL (overrides EDUSYNC_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attendance records
    Attendances(commands::attendances::AttendancesArgs),
    /// List class sessions
    Sessions(commands::sessions::SessionsArgs),
    /// List library books
    Books(commands::books::BooksArgs),
    /// List library borrowings
    Borrowings(commands::borrowings::BorrowingsArgs),
    /// Show aggregate statistics
    Stats(commands::stats::StatsArgs),
    /// Export the attendance list to a file
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edusync=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    };

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("EDUSYNC_BASE_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let credentials = match std::env::var("EDUSYNC_SESSION_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Arc::new(MemoryCredentials::with_token(&token)),
        _ => {
            eprintln!("Note: EDUSYNC_SESSION_TOKEN is not set; requests will be unauthenticated.");
            Arc::new(MemoryCredentials::new())
        }
    };
    let client = Client::new(&base_url, credentials);

    match &cli.command {
        Commands::Attendances(args) => commands::attendances::run(args, &client, &format).await?,
        Commands::Sessions(args) => commands::sessions::run(args, &client, &format).await?,
        Commands::Books(args) => commands::books::run(args, &client, &format).await?,
        Commands::Borrowings(args) => commands::borrowings::run(args, &client, &format).await?,
        Commands::Stats(args) => commands::stats::run(args, &client, &format).await?,
        Commands::Export(args) => commands::export::run(args, &client).await?,
    }

    Ok(())
}
