//! Placement CLI - report generation and token tooling
//!
//! Runs the same report pipeline as the server, against a local database,
//! and mints bearer tokens for exercising the HTTP API.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "placement")]
#[command(author, version, about = "Placement report CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override database path (or set PLACEMENT_DB_PATH env var)
    #[arg(long, env = "PLACEMENT_DB_PATH", global = true)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and preview placement reports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },

    /// Issue bearer tokens for the report API
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        // Token commands never touch the database
        Commands::Token { action } => commands::token::execute(action, cli.quiet),
        Commands::Report { action } => {
            // Set up database path if provided
            if let Some(db_path) = &cli.db {
                std::env::set_var("PLACEMENT_DB_PATH", shellexpand::tilde(db_path).to_string());
            }

            let db = placement_core::Database::new().await?;

            let ctx = commands::Context {
                db,
                format: cli.format,
                quiet: cli.quiet,
            };

            commands::report::execute(&ctx, action).await
        }
    }
}
