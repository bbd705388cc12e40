//! # Gradebook DB
//!
//! Database pool and utilities for the Gradebook API.
//!
//! The relational schema lives in the workspace `migrations/` directory and
//! is embedded into the binary through [`MIGRATOR`]. Referential integrity,
//! cascade deletes (curso → nucleo_pedagogico → nota), the unique course
//! name and the grade range are all declared there, so they hold even when
//! two requests race.
//!
//! # Example
//!
//! ```ignore
//! use gradebook_config::DatabaseConfig;
//! use gradebook_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool(&DatabaseConfig::from_env()).await;
//!     // Use pool for database operations
//! }
//! ```

use gradebook_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a PostgreSQL connection pool using `config`.
#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    info!("Database pool established");
    Ok(pool)
}

/// Applies every pending migration.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Initializes the pool and, when enabled, migrates the schema.
///
/// This function should typically be called once during application startup.
/// The returned pool is cheaply cloneable and is stored in the application
/// state for use in request handlers.
///
/// # Panics
///
/// Panics if the connection cannot be established or a migration fails.
pub async fn init_db_pool(config: &DatabaseConfig) -> PgPool {
    let pool = connect(config)
        .await
        .expect("Failed to connect to database");

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
    }

    pool
}

/// Returns `true` when `err` is a unique or primary-key violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Returns `true` when `err` is a foreign-key violation, e.g. inserting a
/// child row whose parent was deleted concurrently.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
