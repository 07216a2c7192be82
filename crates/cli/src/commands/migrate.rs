//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ff-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FOOTFLEX_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! Migration files live in `crates/api/migrations/` and are embedded at
//! compile time; the API binary never runs them on startup.

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("FOOTFLEX_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("FOOTFLEX_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url)
        .await
        .map_err(MigrationError::Database)?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .map_err(MigrationError::Migration)?;

    tracing::info!("Migrations complete!");
    Ok(())
}
