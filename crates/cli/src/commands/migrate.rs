//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! pantry-cli migrate run
//!
//! # List migrations and whether they are applied
//! pantry-cli migrate status
//! ```
//!
//! # Environment Variables
//!
//! - `PANTRY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded in the
//! `pantry-api` crate, so the server and this tool always agree on them.

use std::collections::HashSet;

use pantry_api::store::{MIGRATOR, create_pool};
use secrecy::SecretString;
use thiserror::Error;

/// Errors raised by migration commands.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from the flag or the environment.
fn database_url(explicit: Option<String>) -> Result<SecretString, MigrationError> {
    dotenvy::dotenv().ok();

    explicit
        .or_else(|| std::env::var("PANTRY_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingEnvVar("PANTRY_DATABASE_URL"))
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run(explicit_url: Option<String>) -> Result<(), MigrationError> {
    let url = database_url(explicit_url)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

/// Log every embedded migration with its applied state.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable.
pub async fn status(explicit_url: Option<String>) -> Result<(), MigrationError> {
    let url = database_url(explicit_url)?;
    let pool = create_pool(&url).await?;

    let applied = applied_versions(
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(&pool)
            .await,
    )?;

    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        tracing::info!(
            version = migration.version,
            description = %migration.description,
            state,
            "migration"
        );
    }
    Ok(())
}

/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Collect applied versions, treating a missing bookkeeping table as none.
///
/// The table does not exist before the first `migrate run`; any other
/// failure is reported rather than shown as all pending.
fn applied_versions(
    result: Result<Vec<i64>, sqlx::Error>,
) -> Result<HashSet<i64>, MigrationError> {
    match result {
        Ok(versions) => Ok(versions.into_iter().collect()),
        Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some(UNDEFINED_TABLE) => {
            Ok(HashSet::new())
        }
        Err(err) => Err(err.into()),
    }
}
