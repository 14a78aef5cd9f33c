//! Pantry CLI - Database migrations.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! pantry-cli migrate run
//!
//! # Show migration state
//! pantry-cli migrate status
//!
//! # Target an explicit database
//! pantry-cli migrate run --database-url postgres://localhost/pantry
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,

        /// Database URL (defaults to `PANTRY_DATABASE_URL`, then `DATABASE_URL`)
        #[arg(long, global = true)]
        database_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply pending migrations
    Run,
    /// List migrations and whether they are applied
    Status,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate {
            action,
            database_url,
        } => match action {
            MigrateAction::Run => commands::migrate::run(database_url).await?,
            MigrateAction::Status => commands::migrate::status(database_url).await?,
        },
    }
    Ok(())
}
